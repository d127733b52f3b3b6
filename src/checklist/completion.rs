// ✅ Completion Set - Which items an account has done
// A hash set in memory, a sorted JSON array at the storage boundary

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

use crate::catalog::ChecklistCategory;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedSet {
    ids: HashSet<String>,
}

impl CompletedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.ids.contains(item_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Flip one item. Returns the new state of the item.
    pub fn toggle(&mut self, item_id: &str) -> bool {
        if self.ids.remove(item_id) {
            false
        } else {
            self.ids.insert(item_id.to_string());
            true
        }
    }

    /// Set with the given additions and removals applied in one step
    pub fn with_changes<'a, A, R>(&self, add: A, remove: R) -> CompletedSet
    where
        A: IntoIterator<Item = &'a str>,
        R: IntoIterator<Item = &'a str>,
    {
        let mut next = self.clone();
        for id in add {
            next.ids.insert(id.to_string());
        }
        for id in remove {
            next.ids.remove(id);
        }
        next
    }

    /// Whether every trackable item of the category is complete.
    /// A category without trackable items counts as complete.
    pub fn all_complete(&self, category: &ChecklistCategory) -> bool {
        category.trackable_items().all(|item| self.contains(&item.id))
    }

    /// "Mark all" control: clear the category if it is fully complete,
    /// otherwise complete every trackable item
    pub fn bulk_toggled(&self, category: &ChecklistCategory) -> CompletedSet {
        let ids = category.trackable_items().map(|item| item.id.as_str());
        if self.all_complete(category) {
            self.with_changes(std::iter::empty(), ids)
        } else {
            self.with_changes(ids, std::iter::empty())
        }
    }

    /// Ids in a stable order for persistence
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl FromIterator<String> for CompletedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        CompletedSet {
            ids: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for CompletedSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl Serialize for CompletedSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_sorted_vec().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CompletedSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<String>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}
