// 🗺️ Achievement Diaries - Regions with four cascading tiers
//
// Labels look like "Kandarin (Hard)". Completing a tier implies the
// easier ones; clearing a tier clears the harder ones.

use serde::{Deserialize, Serialize};

use crate::catalog::ChecklistItem;
use crate::checklist::view::{compare_labels, SortMode};
use crate::checklist::CompletedSet;

// ============================================================================
// TIERS
// ============================================================================

/// Diary difficulty, declared in ascending rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
    Elite,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Easy, Tier::Medium, Tier::Hard, Tier::Elite];

    pub fn rank(&self) -> usize {
        match self {
            Tier::Easy => 0,
            Tier::Medium => 1,
            Tier::Hard => 2,
            Tier::Elite => 3,
        }
    }

    pub fn from_rank(rank: usize) -> Option<Tier> {
        Tier::ALL.get(rank).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
            Tier::Elite => "Elite",
        }
    }

    /// Compact label for the tier checkbox
    pub fn short_name(&self) -> &'static str {
        match self {
            Tier::Easy => "E",
            Tier::Medium => "M",
            Tier::Hard => "H",
            Tier::Elite => "El",
        }
    }

    fn parse(name: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|tier| tier.name() == name)
    }
}

/// Split "Region (Tier)" into its parts. Labels without a known tier
/// suffix are not diary entries.
pub fn parse_diary_label(label: &str) -> Option<(&str, Tier)> {
    let inner = label.strip_suffix(')')?;
    let (region, tier) = inner.rsplit_once(" (")?;
    Tier::parse(tier).map(|tier| (region, tier))
}

// ============================================================================
// REGIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DiaryTier<'a> {
    pub tier: Tier,
    pub item: &'a ChecklistItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiaryRegion<'a> {
    pub name: &'a str,
    /// Sorted by ascending rank
    pub tiers: Vec<DiaryTier<'a>>,
}

impl<'a> DiaryRegion<'a> {
    pub fn is_complete(&self, completed: &CompletedSet) -> bool {
        self.tiers.iter().all(|t| completed.contains(&t.item.id))
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.tiers.iter().any(|t| t.item.id == item_id)
    }

    /// Cascade toggle of one tier, returned as a complete replacement set.
    ///
    /// Turning a tier on completes every tier of equal or lower rank.
    /// Turning a completed tier off clears every tier of equal or higher rank.
    /// Returns `None` when the item is not part of this region.
    pub fn cascade_toggle(&self, item_id: &str, completed: &CompletedSet) -> Option<CompletedSet> {
        let toggled = self.tiers.iter().find(|t| t.item.id == item_id)?;
        let rank = toggled.tier.rank();

        let next = if completed.contains(item_id) {
            let remove = self
                .tiers
                .iter()
                .filter(|t| t.tier.rank() >= rank)
                .map(|t| t.item.id.as_str());
            completed.with_changes(std::iter::empty(), remove)
        } else {
            let add = self
                .tiers
                .iter()
                .filter(|t| t.tier.rank() <= rank)
                .map(|t| t.item.id.as_str());
            completed.with_changes(add, std::iter::empty())
        };

        Some(next)
    }
}

/// Group diary items by region, in first-seen order
pub fn group_regions(items: &[ChecklistItem]) -> Vec<DiaryRegion<'_>> {
    let mut regions: Vec<DiaryRegion<'_>> = Vec::new();

    for item in items.iter().filter(|item| !item.is_header) {
        let Some((name, tier)) = parse_diary_label(&item.label) else {
            continue;
        };

        let tier = DiaryTier { tier, item };
        match regions.iter_mut().find(|r| r.name == name) {
            Some(region) => region.tiers.push(tier),
            None => regions.push(DiaryRegion {
                name,
                tiers: vec![tier],
            }),
        }
    }

    for region in &mut regions {
        region.tiers.sort_by_key(|t| t.tier.rank());
    }

    regions
}

/// Apply search (region name), hide-completed (whole region done) and sort
pub fn filter_regions<'a>(
    regions: Vec<DiaryRegion<'a>>,
    query: &str,
    hide_completed: bool,
    sort: SortMode,
    completed: &CompletedSet,
) -> Vec<DiaryRegion<'a>> {
    let query = query.to_lowercase();

    let mut visible: Vec<DiaryRegion<'a>> = regions
        .into_iter()
        .filter(|r| query.is_empty() || r.name.to_lowercase().contains(&query))
        .filter(|r| !hide_completed || !r.is_complete(completed))
        .collect();

    match sort {
        SortMode::Default => {}
        SortMode::Ascending => visible.sort_by(|a, b| compare_labels(a.name, b.name)),
        SortMode::Descending => visible.sort_by(|a, b| compare_labels(b.name, a.name)),
    }

    visible
}
