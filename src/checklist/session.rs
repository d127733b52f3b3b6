use std::collections::HashSet;

use crate::catalog::{Catalog, ChecklistCategory};
use crate::checklist::diary::group_regions;
use crate::checklist::progress::{category_progress, overall_progress, Progress};
use crate::checklist::view::{derive_view, CategoryView, SortMode, ViewOptions};
use crate::checklist::CompletedSet;
use crate::settings::AppSettings;
use crate::TrackerError;

/// Header expanded whenever a category is (re)opened
pub const DEFAULT_EXPANDED_SECTION: &str = "clog_header_clues_beginner";

fn default_expanded() -> HashSet<String> {
    HashSet::from([DEFAULT_EXPANDED_SECTION.to_string()])
}

/// Checklist state of the active account.
///
/// View state (category, query, sort, expanded sections) is transient.
/// Completion changes are made through the tracker, which persists them.
#[derive(Debug, Clone)]
pub struct ChecklistSession {
    account_id: String,
    catalog: Catalog,
    completed: CompletedSet,
    active_category: Option<String>,
    query: String,
    hide_completed: bool,
    sort: SortMode,
    expanded: HashSet<String>,
}

impl ChecklistSession {
    pub fn new(account_id: &str, catalog: Catalog, completed: CompletedSet) -> Self {
        let active_category = catalog.first_category().map(|c| c.id.clone());
        ChecklistSession {
            account_id: account_id.to_string(),
            catalog,
            completed,
            active_category,
            query: String::new(),
            hide_completed: false,
            sort: SortMode::Default,
            expanded: default_expanded(),
        }
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn completed(&self) -> &CompletedSet {
        &self.completed
    }

    pub fn is_completed(&self, item_id: &str) -> bool {
        self.completed.contains(item_id)
    }

    pub fn active_category(&self) -> Option<&ChecklistCategory> {
        self.active_category
            .as_deref()
            .and_then(|id| self.catalog.category(id))
    }

    pub fn active_category_index(&self) -> Option<usize> {
        let id = self.active_category.as_deref()?;
        self.catalog.categories().iter().position(|c| c.id == id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn hide_completed(&self) -> bool {
        self.hide_completed
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn is_expanded(&self, header_id: &str) -> bool {
        self.expanded.contains(header_id)
    }

    pub fn view_options(&self, settings: &AppSettings) -> ViewOptions {
        ViewOptions {
            query: self.query.clone(),
            hide_completed: self.hide_completed,
            sort: self.sort,
            exclude_third_age: settings.excludes_third_age(),
        }
    }

    /// Derived display state of the active category
    pub fn view(&self, settings: &AppSettings) -> Option<CategoryView<'_>> {
        let category = self.active_category()?;
        Some(derive_view(category, &self.completed, &self.view_options(settings)))
    }

    pub fn category_progress(&self, category: &ChecklistCategory, settings: &AppSettings) -> Progress {
        category_progress(category, &self.completed, settings.excludes_third_age())
    }

    pub fn overall_progress(&self, settings: &AppSettings) -> Progress {
        overall_progress(&self.catalog, &self.completed, settings.excludes_third_age())
    }

    /// "Mark all" is offered for flat, non-diary categories with items
    pub fn can_bulk_toggle(&self, category: &ChecklistCategory, settings: &AppSettings) -> bool {
        !category.is_diary()
            && !category.has_headers()
            && self.category_progress(category, settings).total > 0
    }

    // ========================================================================
    // VIEW STATE
    // ========================================================================

    /// Switch tab. Query, sort and expanded sections reset; hide-completed stays.
    pub fn select_category(&mut self, category_id: &str) -> Result<(), TrackerError> {
        if self.catalog.category(category_id).is_none() {
            return Err(TrackerError::CategoryNotFound(category_id.to_string()));
        }

        self.reset_to(category_id);
        Ok(())
    }

    fn reset_to(&mut self, category_id: &str) {
        self.active_category = Some(category_id.to_string());
        self.query.clear();
        self.sort = SortMode::Default;
        self.expanded = default_expanded();
    }

    /// Move to the next (or previous) tab, wrapping around
    pub fn cycle_category(&mut self, forward: bool) {
        let len = self.catalog.categories().len();
        if len == 0 {
            return;
        }

        let index = match self.active_category_index() {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        let id = self.catalog.categories()[index].id.clone();
        self.reset_to(&id);
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn set_hide_completed(&mut self, hide: bool) {
        self.hide_completed = hide;
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
    }

    pub fn toggle_section(&mut self, header_id: &str) {
        if !self.expanded.remove(header_id) {
            self.expanded.insert(header_id.to_string());
        }
    }

    // ========================================================================
    // COMPLETION CHANGES
    // Each returns the replacement set; the tracker commits and persists it.
    // ========================================================================

    /// Flip one trackable item
    pub(crate) fn item_toggled(&self, item_id: &str) -> Result<CompletedSet, TrackerError> {
        if self.catalog.find_item(item_id).is_none() {
            return Err(TrackerError::ItemNotFound(item_id.to_string()));
        }

        let mut next = self.completed.clone();
        next.toggle(item_id);
        Ok(next)
    }

    /// Complete-all / clear-all for one category
    pub(crate) fn category_toggled(&self, category_id: &str) -> Result<CompletedSet, TrackerError> {
        let category = self
            .catalog
            .category(category_id)
            .ok_or_else(|| TrackerError::CategoryNotFound(category_id.to_string()))?;
        Ok(self.completed.bulk_toggled(category))
    }

    /// Cascade toggle of a diary tier
    pub(crate) fn diary_tier_toggled(&self, item_id: &str) -> Result<CompletedSet, TrackerError> {
        self.catalog
            .categories()
            .iter()
            .filter(|c| c.is_diary())
            .find_map(|category| {
                group_regions(&category.items)
                    .iter()
                    .find(|region| region.contains_item(item_id))
                    .and_then(|region| region.cascade_toggle(item_id, &self.completed))
            })
            .ok_or_else(|| TrackerError::ItemNotFound(item_id.to_string()))
    }

    pub(crate) fn replace_completed(&mut self, completed: CompletedSet) {
        self.completed = completed;
    }
}
