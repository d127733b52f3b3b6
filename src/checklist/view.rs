// 🔎 Visible Items - Search, hide-completed and sort over one category
//
// Three shapes of category:
// - Flat: plain list, sortable
// - Sectioned: header items split the list, catalog order is kept
// - Diary: tiered items grouped by region

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::catalog::{ChecklistCategory, ChecklistItem};
use crate::checklist::diary::{filter_regions, group_regions, DiaryRegion};
use crate::checklist::progress::{category_progress, is_counted};
use crate::checklist::sections::{group_sections, Section};
use crate::checklist::CompletedSet;

// ============================================================================
// OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Default,
    Ascending,
    Descending,
}

impl SortMode {
    pub fn next(&self) -> Self {
        match self {
            SortMode::Default => SortMode::Ascending,
            SortMode::Ascending => SortMode::Descending,
            SortMode::Descending => SortMode::Default,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Default => "Default Order",
            SortMode::Ascending => "A-Z",
            SortMode::Descending => "Z-A",
        }
    }
}

/// Case-insensitive label order, ties broken by the raw text
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub query: String,
    pub hide_completed: bool,
    pub sort: SortMode,
    pub exclude_third_age: bool,
}

// ============================================================================
// VIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ViewContent<'a> {
    Flat(Vec<&'a ChecklistItem>),
    Sectioned(Vec<Section<'a>>),
    Diary(Vec<DiaryRegion<'a>>),
}

/// What to show when nothing matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// Hide-completed is on and every item is done
    CategoryComplete,
    NoResults(String),
    NothingToShow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView<'a> {
    pub content: ViewContent<'a>,
    /// Visible trackable items, or visible regions for diaries
    pub match_count: usize,
    pub empty_state: Option<EmptyState>,
}

/// Derive what the active category should display
pub fn derive_view<'a>(
    category: &'a ChecklistCategory,
    completed: &CompletedSet,
    options: &ViewOptions,
) -> CategoryView<'a> {
    let query = options.query.to_lowercase();

    let (content, match_count) = if category.is_diary() {
        let regions = filter_regions(
            group_regions(&category.items),
            &query,
            options.hide_completed,
            options.sort,
            completed,
        );
        let count = regions.len();
        (ViewContent::Diary(regions), count)
    } else if category.has_headers() {
        let sections = filter_sections(category, completed, &query, options);
        let count = sections.iter().map(|s| s.children.len()).sum();
        (ViewContent::Sectioned(sections), count)
    } else {
        let items = filter_flat(category, completed, &query, options);
        let count = items.len();
        (ViewContent::Flat(items), count)
    };

    let empty_state = (match_count == 0).then(|| {
        let progress = category_progress(category, completed, options.exclude_third_age);
        if options.hide_completed && progress.is_complete() && query.is_empty() {
            EmptyState::CategoryComplete
        } else if !query.is_empty() {
            EmptyState::NoResults(options.query.clone())
        } else {
            EmptyState::NothingToShow
        }
    });

    CategoryView {
        content,
        match_count,
        empty_state,
    }
}

fn is_visible(item: &ChecklistItem, completed: &CompletedSet, hide_completed: bool) -> bool {
    !hide_completed || !completed.contains(&item.id)
}

fn filter_flat<'a>(
    category: &'a ChecklistCategory,
    completed: &CompletedSet,
    query: &str,
    options: &ViewOptions,
) -> Vec<&'a ChecklistItem> {
    let mut items: Vec<&ChecklistItem> = category
        .items
        .iter()
        .filter(|item| is_counted(item, options.exclude_third_age))
        .filter(|item| query.is_empty() || item.label_matches(query))
        .filter(|item| is_visible(item, completed, options.hide_completed))
        .collect();

    match options.sort {
        SortMode::Default => {}
        SortMode::Ascending => items.sort_by(|a, b| compare_labels(&a.label, &b.label)),
        SortMode::Descending => items.sort_by(|a, b| compare_labels(&b.label, &a.label)),
    }

    items
}

/// A child stays when it (or its header) matches the query and it is not
/// hidden. A section stays when it kept a child, or when the query is
/// non-empty and matches the header itself.
fn filter_sections<'a>(
    category: &'a ChecklistCategory,
    completed: &CompletedSet,
    query: &str,
    options: &ViewOptions,
) -> Vec<Section<'a>> {
    group_sections(&category.items)
        .into_iter()
        .filter_map(|section| {
            let header_matches =
                !query.is_empty() && section.header.is_some_and(|h| h.label_matches(query));

            let children: Vec<&ChecklistItem> = section
                .children
                .into_iter()
                .filter(|item| is_counted(item, options.exclude_third_age))
                .filter(|item| query.is_empty() || header_matches || item.label_matches(query))
                .filter(|item| is_visible(item, completed, options.hide_completed))
                .collect();

            if children.is_empty() && !header_matches {
                return None;
            }

            Some(Section {
                header: section.header,
                children,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(labels: &[&str]) -> ChecklistCategory {
        ChecklistCategory {
            id: "gear".to_string(),
            title: "Gear".to_string(),
            icon_url: None,
            items: labels
                .iter()
                .enumerate()
                .map(|(i, label)| ChecklistItem::new(&format!("item{}", i), label))
                .collect(),
        }
    }

    fn clog() -> ChecklistCategory {
        ChecklistCategory {
            id: "mem_collection_log".to_string(),
            title: "Collection Log".to_string(),
            icon_url: None,
            items: vec![
                ChecklistItem::header("h_bosses", "Bosses"),
                ChecklistItem::new("club", "Hill giant club"),
                ChecklistItem::new("essence", "Bryophyta's essence"),
                ChecklistItem::header("h_hard", "Hard Clue Scrolls"),
                ChecklistItem::new("helm", "3rd age full helmet"),
                ChecklistItem::new("bow", "Magic comp bow"),
                ChecklistItem::header("h_other", "Other"),
                ChecklistItem::new("boots", "Fancy boots"),
            ],
        }
    }

    fn options(query: &str, hide_completed: bool, sort: SortMode) -> ViewOptions {
        ViewOptions {
            query: query.to_string(),
            hide_completed,
            sort,
            exclude_third_age: false,
        }
    }

    /// Headers are prefixed with "# "; diary regions have no item rows
    fn labels(view: &CategoryView) -> Vec<String> {
        match &view.content {
            ViewContent::Flat(items) => items.iter().map(|i| i.label.clone()).collect(),
            ViewContent::Sectioned(sections) => sections
                .iter()
                .flat_map(|section| {
                    section
                        .header
                        .map(|h| format!("# {}", h.label))
                        .into_iter()
                        .chain(section.children.iter().map(|i| i.label.clone()))
                })
                .collect(),
            ViewContent::Diary(_) => Vec::new(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let category = flat(&["Rune Scimitar", "Ironman cape"]);

        let view = derive_view(
            &category,
            &CompletedSet::new(),
            &options("ironman", false, SortMode::Default),
        );

        assert_eq!(labels(&view), vec!["Ironman cape"]);
        assert_eq!(view.match_count, 1);
        assert_eq!(view.empty_state, None);
    }

    #[test]
    fn test_search_keeps_whitespace() {
        let category = flat(&["Rune Scimitar", "Coif"]);
        let done = CompletedSet::new();

        let space = derive_view(&category, &done, &options(" ", false, SortMode::Default));
        assert_eq!(labels(&space), vec!["Rune Scimitar"]);

        let category = flat(&["Rune Scimitar", "Rune"]);
        let trailing = derive_view(&category, &done, &options("rune ", false, SortMode::Default));
        assert_eq!(labels(&trailing), vec!["Rune Scimitar"]);
        assert_eq!(trailing.match_count, 1);

        let none = derive_view(&category, &done, &options("coif ", false, SortMode::Default));
        assert_eq!(none.empty_state, Some(EmptyState::NoResults("coif ".to_string())));
    }

    #[test]
    fn test_flat_sort_modes() {
        let category = flat(&["coif", "Amulet of Power", "Zamorak Robes"]);
        let done = CompletedSet::new();

        let asc = derive_view(&category, &done, &options("", false, SortMode::Ascending));
        let desc = derive_view(&category, &done, &options("", false, SortMode::Descending));
        let default = derive_view(&category, &done, &options("", false, SortMode::Default));

        assert_eq!(labels(&asc), vec!["Amulet of Power", "coif", "Zamorak Robes"]);
        assert_eq!(labels(&desc), vec!["Zamorak Robes", "coif", "Amulet of Power"]);
        assert_eq!(labels(&default), vec!["coif", "Amulet of Power", "Zamorak Robes"]);
    }

    #[test]
    fn test_hide_completed_flat() {
        let category = flat(&["A", "B", "C"]);
        let done: CompletedSet = ["item1"].into_iter().collect();

        let view = derive_view(&category, &done, &options("", true, SortMode::Default));

        assert_eq!(labels(&view), vec!["A", "C"]);
    }

    #[test]
    fn test_sections_keep_catalog_order_despite_sort() {
        let category = clog();

        let view = derive_view(
            &category,
            &CompletedSet::new(),
            &options("", false, SortMode::Descending),
        );

        assert_eq!(
            labels(&view),
            vec![
                "# Bosses",
                "Hill giant club",
                "Bryophyta's essence",
                "# Hard Clue Scrolls",
                "3rd age full helmet",
                "Magic comp bow",
                "# Other",
                "Fancy boots",
            ]
        );
        assert_eq!(view.match_count, 5);
    }

    #[test]
    fn test_search_drops_sections_without_matches() {
        let category = clog();

        let view = derive_view(
            &category,
            &CompletedSet::new(),
            &options("boots", false, SortMode::Default),
        );

        assert_eq!(labels(&view), vec!["# Other", "Fancy boots"]);
    }

    #[test]
    fn test_header_match_keeps_whole_section() {
        let category = clog();

        let view = derive_view(
            &category,
            &CompletedSet::new(),
            &options("BOSSES", false, SortMode::Default),
        );

        assert_eq!(
            labels(&view),
            vec!["# Bosses", "Hill giant club", "Bryophyta's essence"]
        );
    }

    #[test]
    fn test_header_match_survives_hidden_children() {
        let category = clog();
        let done: CompletedSet = ["club", "essence"].into_iter().collect();

        let view = derive_view(&category, &done, &options("bosses", true, SortMode::Default));

        assert_eq!(labels(&view), vec!["# Bosses"]);
        assert_eq!(view.match_count, 0);
        assert_eq!(view.empty_state, Some(EmptyState::NoResults("bosses".to_string())));
    }

    #[test]
    fn test_hide_completed_drops_empty_sections() {
        let category = clog();
        let done: CompletedSet = ["club", "essence"].into_iter().collect();

        let view = derive_view(&category, &done, &options("", true, SortMode::Default));

        assert!(!labels(&view).contains(&"# Bosses".to_string()));
        assert_eq!(view.match_count, 3);
    }

    #[test]
    fn test_third_age_removed_from_view_when_excluded() {
        let category = clog();
        let mut opts = options("", false, SortMode::Default);
        opts.exclude_third_age = true;

        let view = derive_view(&category, &CompletedSet::new(), &opts);

        assert!(!labels(&view).contains(&"3rd age full helmet".to_string()));
        assert_eq!(view.match_count, 4);
    }

    #[test]
    fn test_empty_states() {
        let category = flat(&["A", "B"]);
        let all: CompletedSet = ["item0", "item1"].into_iter().collect();

        let complete = derive_view(&category, &all, &options("", true, SortMode::Default));
        assert_eq!(complete.empty_state, Some(EmptyState::CategoryComplete));

        let no_results = derive_view(&category, &all, &options(" zzz ", false, SortMode::Default));
        assert_eq!(no_results.empty_state, Some(EmptyState::NoResults(" zzz ".to_string())));

        let empty = ChecklistCategory {
            items: Vec::new(),
            ..flat(&[])
        };
        let nothing = derive_view(&empty, &all, &options("", true, SortMode::Default));
        assert_eq!(nothing.empty_state, Some(EmptyState::NothingToShow));
    }

    #[test]
    fn test_diary_view_counts_regions() {
        let category = ChecklistCategory {
            id: crate::catalog::DIARY_CATEGORY_ID.to_string(),
            title: "Achievement Diaries".to_string(),
            icon_url: None,
            items: vec![
                ChecklistItem::new("k_e", "Kandarin (Easy)"),
                ChecklistItem::new("k_m", "Kandarin (Medium)"),
                ChecklistItem::new("v_e", "Varrock (Easy)"),
            ],
        };

        let view = derive_view(
            &category,
            &CompletedSet::new(),
            &options("", false, SortMode::Descending),
        );

        assert_eq!(view.match_count, 2);
        assert!(labels(&view).is_empty());
        match view.content {
            ViewContent::Diary(regions) => assert_eq!(regions[0].name, "Varrock"),
            other => panic!("expected diary content, got {:?}", other),
        }
    }

    #[test]
    fn test_sort_mode_cycles() {
        assert_eq!(SortMode::Default.next(), SortMode::Ascending);
        assert_eq!(SortMode::Ascending.next(), SortMode::Descending);
        assert_eq!(SortMode::Descending.next(), SortMode::Default);
    }
}
