// Entity Models
// "Identity persists, values change"
//
// An account has:
// - Stable identity (id) that scopes its persisted checklist
// - Values (name, membership, game mode) replaced only wholesale
// - A registry for ordering, lookup and creation

pub mod account;

pub use account::{
    checklist_key, default_accounts, migrate_accounts, Account, AccountRegistry, GameMode,
    LegacyAccount, Membership, StoredAccount,
};
