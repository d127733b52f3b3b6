// Checklist State - everything derived from (catalog, completion set, settings)
//
// - completion: the per-account set of done item ids
// - progress:   completed/total counts with the 3rd age exclusion
// - sections:   header + children grouping
// - view:       search, hide-completed, sort, empty state
// - diary:      region grouping and tier cascade
// - session:    the active account's checklist and its view state

pub mod completion;
pub mod diary;
pub mod progress;
pub mod sections;
pub mod session;
pub mod view;

pub use completion::CompletedSet;
pub use diary::{group_regions, parse_diary_label, DiaryRegion, DiaryTier, Tier};
pub use progress::{category_progress, is_third_age, overall_progress, Progress, THIRD_AGE_PATTERN};
pub use sections::{group_sections, Section};
pub use session::{ChecklistSession, DEFAULT_EXPANDED_SECTION};
pub use view::{derive_view, CategoryView, EmptyState, SortMode, ViewContent, ViewOptions};
