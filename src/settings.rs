use serde::{Deserialize, Serialize};

/// Global, persisted application settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Include "3rd age" items in totals and in the item list
    #[serde(default = "default_count_third_age")]
    pub count_third_age: bool,
}

fn default_count_third_age() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            count_third_age: default_count_third_age(),
        }
    }
}

impl AppSettings {
    pub fn toggled_third_age(&self) -> Self {
        AppSettings {
            count_third_age: !self.count_third_age,
        }
    }

    /// Whether items matching the 3rd age pattern are excluded
    pub fn excludes_third_age(&self) -> bool {
        !self.count_third_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts_third_age() {
        assert!(AppSettings::default().count_third_age);
    }

    #[test]
    fn test_storage_shape() {
        let json = serde_json::to_string(&AppSettings { count_third_age: false }).unwrap();
        assert_eq!(json, r#"{"countThirdAge":false}"#);

        let parsed: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, AppSettings::default());
    }

    #[test]
    fn test_toggle() {
        let settings = AppSettings::default().toggled_third_age();
        assert!(settings.excludes_third_age());
        assert!(!settings.toggled_third_age().excludes_third_age());
    }
}
