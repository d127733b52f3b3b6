// 📚 Static Catalog - Checklist datasets per membership tier
// Catalogs are data, not code: JSON files embedded at build time

use crate::entities::Membership;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};

const MEMBERS_CATALOG: &str = include_str!("../data/members.json");
const F2P_CATALOG: &str = include_str!("../data/f2p.json");

/// Category holding the tiered achievement diaries
pub const DIARY_CATEGORY_ID: &str = "mem_diaries";

// ============================================================================
// CATALOG TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Unique within its dataset
    pub id: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Drop rate annotation, e.g. "1/1024"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,

    /// Where the item comes from, e.g. "Zulrah"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Section divider rather than a trackable item
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

impl ChecklistItem {
    pub fn new(id: &str, label: &str) -> Self {
        ChecklistItem {
            id: id.to_string(),
            label: label.to_string(),
            description: None,
            rate: None,
            source: None,
            is_header: false,
        }
    }

    pub fn header(id: &str, label: &str) -> Self {
        ChecklistItem {
            is_header: true,
            ..ChecklistItem::new(id, label)
        }
    }

    /// Case-insensitive substring match on the label.
    /// `query` must already be lower-cased.
    pub fn label_matches(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(query)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistCategory {
    pub id: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    pub items: Vec<ChecklistItem>,
}

impl ChecklistCategory {
    pub fn has_headers(&self) -> bool {
        self.items.iter().any(|item| item.is_header)
    }

    pub fn is_diary(&self) -> bool {
        self.id == DIARY_CATEGORY_ID
    }

    /// Non-header items, in catalog order
    pub fn trackable_items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(|item| !item.is_header)
    }

    pub fn find_item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Immutable, ordered list of categories for one membership tier
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<ChecklistCategory>,
}

impl Catalog {
    /// Parse a catalog from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let categories: Vec<ChecklistCategory> =
            serde_json::from_str(json).context("Failed to parse catalog JSON")?;
        Ok(Catalog { categories })
    }

    /// Load the embedded catalog for a membership tier
    pub fn for_membership(membership: Membership) -> Result<Self> {
        let json = match membership {
            Membership::Members => MEMBERS_CATALOG,
            Membership::F2p => F2P_CATALOG,
        };
        Catalog::from_json(json)
            .with_context(|| format!("Embedded {} catalog is invalid", membership.as_str()))
    }

    pub fn categories(&self) -> &[ChecklistCategory] {
        &self.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&ChecklistCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn first_category(&self) -> Option<&ChecklistCategory> {
        self.categories.first()
    }

    /// Look up a trackable item anywhere in the catalog
    pub fn find_item(&self, item_id: &str) -> Option<(&ChecklistCategory, &ChecklistItem)> {
        self.categories.iter().find_map(|category| {
            category
                .find_item(item_id)
                .filter(|item| !item.is_header)
                .map(|item| (category, item))
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
