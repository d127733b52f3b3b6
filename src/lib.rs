// OSRS Completionist Tracker - Core Library
// Exposes all modules for use in the CLI, the terminal UI, and tests

pub mod catalog;    // Static checklist data per membership
pub mod checklist;  // Completion sets, progress, views, diaries
pub mod config;     // CLI flags, paths, logging
pub mod db;         // Key-value persistence
pub mod entities;   // Accounts and their registry
pub mod error;
pub mod settings;
pub mod tracker;

// Storage keys
pub const ACCOUNTS_KEY: &str = "osrs-accounts";
pub const SETTINGS_KEY: &str = "osrs-settings";
pub const CHECKLIST_KEY_PREFIX: &str = "osrs-checklist";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use catalog::{Catalog, ChecklistCategory, ChecklistItem, DIARY_CATEGORY_ID};
pub use checklist::{
    derive_view, CategoryView, ChecklistSession, CompletedSet, DiaryRegion, EmptyState,
    Progress, Section, SortMode, Tier, ViewContent, ViewOptions,
};
pub use db::{load_or_default, save_json, setup_database, KeyValueStore, MemoryStore, SqliteStore};
pub use entities::{Account, AccountRegistry, GameMode, Membership};
pub use error::TrackerError;
pub use settings::AppSettings;
pub use tracker::Tracker;
