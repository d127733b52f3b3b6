use crate::catalog::{Catalog, ChecklistCategory, ChecklistItem};
use crate::checklist::CompletedSet;

/// Label fragment of items that can be left out of totals
pub const THIRD_AGE_PATTERN: &str = "3rd age";

pub fn is_third_age(item: &ChecklistItem) -> bool {
    item.label.to_lowercase().contains(THIRD_AGE_PATTERN)
}

/// Whether an item takes part in counting and listing.
/// Headers never count; 3rd age items drop out when excluded.
pub fn is_counted(item: &ChecklistItem, exclude_third_age: bool) -> bool {
    !item.is_header && !(exclude_third_age && is_third_age(item))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// 0.0 - 100.0; an empty total is 0%
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }

    pub fn ratio(&self) -> f64 {
        self.percent() / 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl std::ops::Add for Progress {
    type Output = Progress;

    fn add(self, other: Progress) -> Progress {
        Progress {
            completed: self.completed + other.completed,
            total: self.total + other.total,
        }
    }
}

impl std::iter::Sum for Progress {
    fn sum<I: Iterator<Item = Progress>>(iter: I) -> Progress {
        iter.fold(Progress::default(), |acc, p| acc + p)
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({:.2}%)", self.completed, self.total, self.percent())
    }
}

/// Counts for one category. Completion ids that are not in the category
/// are never looked at, so stale ids cannot inflate the result.
pub fn category_progress(
    category: &ChecklistCategory,
    completed: &CompletedSet,
    exclude_third_age: bool,
) -> Progress {
    category
        .items
        .iter()
        .filter(|item| is_counted(item, exclude_third_age))
        .fold(Progress::default(), |mut acc, item| {
            acc.total += 1;
            if completed.contains(&item.id) {
                acc.completed += 1;
            }
            acc
        })
}

/// Counts across every category of a catalog
pub fn overall_progress(
    catalog: &Catalog,
    completed: &CompletedSet,
    exclude_third_age: bool,
) -> Progress {
    catalog
        .categories()
        .iter()
        .map(|category| category_progress(category, completed, exclude_third_age))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Membership;

    fn clog() -> ChecklistCategory {
        ChecklistCategory {
            id: "clog".to_string(),
            title: "Collection Log".to_string(),
            icon_url: None,
            items: vec![
                ChecklistItem::header("h1", "Hard Clue Scrolls"),
                ChecklistItem::new("helm", "3rd age full helmet"),
                ChecklistItem::new("ring", "Ring of 3rd Age"),
                ChecklistItem::new("bow", "Magic comp bow"),
                ChecklistItem::header("h2", "Other"),
                ChecklistItem::new("torso", "Fighter torso"),
            ],
        }
    }

    #[test]
    fn test_headers_never_counted() {
        let completed: CompletedSet = ["h1", "h2", "bow"].into_iter().collect();

        let progress = category_progress(&clog(), &completed, false);

        assert_eq!(progress, Progress { completed: 1, total: 4 });
    }

    #[test]
    fn test_third_age_exclusion() {
        let completed: CompletedSet = ["helm", "bow"].into_iter().collect();

        let counted = category_progress(&clog(), &completed, false);
        let excluded = category_progress(&clog(), &completed, true);

        assert_eq!(counted, Progress { completed: 2, total: 4 });
        assert_eq!(excluded, Progress { completed: 1, total: 2 });

        // Flipping the setting back restores the original counts
        assert_eq!(category_progress(&clog(), &completed, false), counted);
    }

    #[test]
    fn test_stale_ids_ignored() {
        let completed: CompletedSet = ["bow", "removed_from_catalog"].into_iter().collect();

        let progress = category_progress(&clog(), &completed, false);

        assert_eq!(progress.completed, 1);
    }

    #[test]
    fn test_percent_of_empty_total_is_zero() {
        let empty = Progress::default();

        assert_eq!(empty.percent(), 0.0);
        assert!(!empty.is_complete());
        assert_eq!(Progress { completed: 1, total: 4 }.percent(), 25.0);
    }

    #[test]
    fn test_completed_never_exceeds_total() {
        let catalog = Catalog::for_membership(Membership::Members).unwrap();
        let everything: CompletedSet = catalog
            .categories()
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.id.as_str()))
            .chain(["stale_a", "stale_b"])
            .collect();

        for exclude in [false, true] {
            for category in catalog.categories() {
                let p = category_progress(category, &everything, exclude);
                assert!(p.completed <= p.total);
                assert!(p.is_complete());
            }
            let overall = overall_progress(&catalog, &everything, exclude);
            assert_eq!(overall.completed, overall.total);
        }
    }

    #[test]
    fn test_overall_sums_categories() {
        let catalog = Catalog::for_membership(Membership::F2p).unwrap();
        let completed: CompletedSet =
            ["f2p_skill_attack", "f2p_gear_coif", "clog_beginner_bear_feet"].into_iter().collect();

        let overall = overall_progress(&catalog, &completed, false);
        let summed: usize = catalog
            .categories()
            .iter()
            .map(|c| c.trackable_items().count())
            .sum();

        assert_eq!(overall.completed, 3);
        assert_eq!(overall.total, summed);
    }

    #[test]
    fn test_display() {
        let p = Progress { completed: 1, total: 3 };
        assert_eq!(p.to_string(), "1/3 (33.33%)");
    }
}
