// 🎯 Tracker - The single owner of application state
//
// Holds the store, the accounts, the active selection, the settings and the
// active checklist session. Every mutation replaces in-memory state and
// writes through to storage before returning.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::checklist::{ChecklistSession, CompletedSet, Progress};
use crate::db::{load_or_default, save_json, KeyValueStore};
use crate::entities::{
    checklist_key, default_accounts, migrate_accounts, Account, AccountRegistry, GameMode,
    Membership, StoredAccount,
};
use crate::settings::AppSettings;
use crate::{TrackerError, ACCOUNTS_KEY, SETTINGS_KEY};

pub struct Tracker {
    store: Box<dyn KeyValueStore>,
    members_catalog: Catalog,
    f2p_catalog: Catalog,
    accounts: AccountRegistry,
    settings: AppSettings,
    session: Option<ChecklistSession>,
}

impl Tracker {
    /// Load accounts and settings, migrating legacy account records, and
    /// select the first account (if any)
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self> {
        let members_catalog = Catalog::for_membership(Membership::Members)?;
        let f2p_catalog = Catalog::for_membership(Membership::F2p)?;

        let mut tracker = Tracker {
            store,
            members_catalog,
            f2p_catalog,
            accounts: AccountRegistry::new(),
            settings: AppSettings::default(),
            session: None,
        };

        tracker.accounts = tracker.load_accounts()?;
        tracker.settings = load_or_default(tracker.store.as_ref(), SETTINGS_KEY, AppSettings::default)?;

        if let Some(first) = tracker.accounts.first().map(|a| a.id.clone()) {
            tracker.select_account(&first)?;
        }

        info!(
            "Loaded {} accounts (count 3rd age: {})",
            tracker.accounts.count(),
            tracker.settings.count_third_age
        );
        Ok(tracker)
    }

    fn load_accounts(&mut self) -> Result<AccountRegistry> {
        let stored: Vec<StoredAccount> = load_or_default(self.store.as_ref(), ACCOUNTS_KEY, || {
            default_accounts()
                .into_iter()
                .map(StoredAccount::Current)
                .collect()
        })?;

        let (accounts, migrated) = migrate_accounts(stored);
        if migrated {
            warn!("Migrated {} legacy account records", accounts.len());
            save_json(self.store.as_mut(), ACCOUNTS_KEY, &accounts)?;
        }

        Ok(AccountRegistry::from_accounts(accounts))
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    pub fn accounts(&self) -> &[Account] {
        self.accounts.accounts()
    }

    pub fn active_account(&self) -> Option<&Account> {
        let id = self.session.as_ref()?.account_id();
        self.accounts.find_by_id(id)
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn session(&self) -> Option<&ChecklistSession> {
        self.session.as_ref()
    }

    /// Mutable access to transient view state (tab, query, sort, sections)
    pub fn session_mut(&mut self) -> Option<&mut ChecklistSession> {
        self.session.as_mut()
    }

    pub fn catalog_for(&self, membership: Membership) -> &Catalog {
        match membership {
            Membership::Members => &self.members_catalog,
            Membership::F2p => &self.f2p_catalog,
        }
    }

    pub fn overall_progress(&self) -> Option<Progress> {
        self.session
            .as_ref()
            .map(|session| session.overall_progress(&self.settings))
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    /// Make an account active and load its completion set
    pub fn select_account(&mut self, account_id: &str) -> Result<()> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .ok_or_else(|| TrackerError::AccountNotFound(account_id.to_string()))?
            .clone();

        let completed: CompletedSet =
            load_or_default(self.store.as_ref(), &account.checklist_key(), CompletedSet::new)?;
        let catalog = self.catalog_for(account.membership).clone();

        debug!("Account {} has {} completed ids", account.id, completed.len());
        self.session = Some(ChecklistSession::new(&account.id, catalog, completed));
        info!("Selected account {} ({})", account.name, account.id);
        Ok(())
    }

    pub fn cycle_account(&mut self, forward: bool) -> Result<()> {
        let current = self.session.as_ref().map(|s| s.account_id().to_string());
        let next = self
            .accounts
            .cycle(current.as_deref(), forward)
            .map(|a| a.id.clone());

        match next {
            Some(id) => self.select_account(&id),
            None => Ok(()),
        }
    }

    /// Create, persist and select a new account
    pub fn add_account(
        &mut self,
        name: &str,
        membership: Membership,
        game_mode: GameMode,
    ) -> Result<Account> {
        let account = self.accounts.create(name, membership, game_mode)?;
        save_json(self.store.as_mut(), ACCOUNTS_KEY, self.accounts.accounts())?;
        info!(
            "Created account {} ({}, {})",
            account.id,
            membership.as_str(),
            game_mode.as_str()
        );

        self.select_account(&account.id)?;
        Ok(account)
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    pub fn update_settings(&mut self, settings: AppSettings) -> Result<()> {
        save_json(self.store.as_mut(), SETTINGS_KEY, &settings)?;
        self.settings = settings;
        info!("Count 3rd age items: {}", settings.count_third_age);
        Ok(())
    }

    pub fn toggle_count_third_age(&mut self) -> Result<()> {
        self.update_settings(self.settings.toggled_third_age())
    }

    // ========================================================================
    // COMPLETION
    // ========================================================================

    /// Flip one item. Returns the item's new state.
    pub fn toggle_item(&mut self, item_id: &str) -> Result<bool> {
        let next = self.active_session()?.item_toggled(item_id)?;
        let done = next.contains(item_id);
        self.commit(next)?;
        Ok(done)
    }

    /// "Mark all" for a category
    pub fn toggle_category(&mut self, category_id: &str) -> Result<()> {
        let next = self.active_session()?.category_toggled(category_id)?;
        self.commit(next)
    }

    /// Cascade toggle of a diary tier
    pub fn toggle_diary_tier(&mut self, item_id: &str) -> Result<()> {
        let next = self.active_session()?.diary_tier_toggled(item_id)?;
        self.commit(next)
    }

    fn active_session(&self) -> Result<&ChecklistSession, TrackerError> {
        self.session.as_ref().ok_or(TrackerError::NoAccountSelected)
    }

    /// Persist the replacement set, then swap it in
    fn commit(&mut self, next: CompletedSet) -> Result<()> {
        let session = self.session.as_mut().ok_or(TrackerError::NoAccountSelected)?;
        let key = checklist_key(session.account_id());
        save_json(self.store.as_mut(), &key, &next)?;
        session.replace_completed(next);
        Ok(())
    }
}
