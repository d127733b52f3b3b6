// 🧑 Account Entity - A tracked character with its own checklist
//
// "Account name is a VALUE, account id is IDENTITY"
//
// - The id scopes the persisted completion set (osrs-checklist-<id>)
// - Membership picks the catalog (members vs free-to-play)
// - Game mode is informational (ironman badges)

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::TrackerError;

// ============================================================================
// MEMBERSHIP
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    /// Full catalog
    Members,

    /// Free-to-play catalog
    F2p,
}

impl Membership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Membership::Members => "members",
            Membership::F2p => "f2p",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Membership::Members => "Members",
            Membership::F2p => "Free to Play",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Membership::Members => Membership::F2p,
            Membership::F2p => Membership::Members,
        }
    }
}

impl std::str::FromStr for Membership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "members" | "p2p" => Ok(Membership::Members),
            "f2p" | "free" => Ok(Membership::F2p),
            other => Err(format!("unknown membership '{}' (expected members or f2p)", other)),
        }
    }
}

// ============================================================================
// GAME MODE
// ============================================================================

const IRONMAN_BADGE_URL: &str =
    "https://oldschool.runescape.wiki/images/Ironman_chat_badge.png?c54b1";
const HARDCORE_BADGE_URL: &str =
    "https://oldschool.runescape.wiki/images/Hardcore_ironman_chat_badge.png?1b467";
const GROUP_BADGE_URL: &str =
    "https://oldschool.runescape.wiki/images/Group_ironman_chat_badge.png?1b467";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Main,
    Ironman,
    Hardcore,
    Group,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Main,
        GameMode::Ironman,
        GameMode::Hardcore,
        GameMode::Group,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Main => "main",
            GameMode::Ironman => "ironman",
            GameMode::Hardcore => "hardcore",
            GameMode::Group => "group",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameMode::Main => "Main",
            GameMode::Ironman => "Ironman",
            GameMode::Hardcore => "Hardcore Ironman",
            GameMode::Group => "Group Ironman",
        }
    }

    /// Chat badge image; the standard mode has none
    pub fn badge_url(&self) -> Option<&'static str> {
        match self {
            GameMode::Main => None,
            GameMode::Ironman => Some(IRONMAN_BADGE_URL),
            GameMode::Hardcore => Some(HARDCORE_BADGE_URL),
            GameMode::Group => Some(GROUP_BADGE_URL),
        }
    }

    /// Short text stand-in for the badge image
    pub fn badge_text(&self) -> Option<&'static str> {
        match self {
            GameMode::Main => None,
            GameMode::Ironman => Some("[IM]"),
            GameMode::Hardcore => Some("[HC]"),
            GameMode::Group => Some("[GIM]"),
        }
    }

    /// Best-effort guess used when migrating records that predate game modes
    pub fn infer_from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("ironman") || lower.contains("fe") {
            GameMode::Ironman
        } else {
            GameMode::Main
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(GameMode::Main),
            "ironman" | "im" => Ok(GameMode::Ironman),
            "hardcore" | "hcim" => Ok(GameMode::Hardcore),
            "group" | "gim" => Ok(GameMode::Group),
            other => Err(format!(
                "unknown game mode '{}' (expected main, ironman, hardcore or group)",
                other
            )),
        }
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable identity - scopes the persisted completion set
    pub id: String,

    pub name: String,

    pub membership: Membership,

    pub game_mode: GameMode,
}

impl Account {
    pub fn new(id: &str, name: &str, membership: Membership, game_mode: GameMode) -> Self {
        Account {
            id: id.to_string(),
            name: name.to_string(),
            membership,
            game_mode,
        }
    }

    /// Storage key of this account's completion set
    pub fn checklist_key(&self) -> String {
        checklist_key(&self.id)
    }

    /// Name with the text badge prefixed, e.g. "[IM] Fe Mont26 (F2P)"
    pub fn label(&self) -> String {
        match self.game_mode.badge_text() {
            Some(badge) => format!("{} {}", badge, self.name),
            None => self.name.clone(),
        }
    }
}

pub fn checklist_key(account_id: &str) -> String {
    format!("{}-{}", crate::CHECKLIST_KEY_PREFIX, account_id)
}

/// Accounts seeded on first launch
pub fn default_accounts() -> Vec<Account> {
    vec![
        Account::new("mont26", "Mont26 (Members)", Membership::Members, GameMode::Main),
        Account::new("feMont26", "Fe Mont26 (F2P)", Membership::F2p, GameMode::Ironman),
    ]
}

// ============================================================================
// LEGACY RECORDS
// ============================================================================

/// Shape written before game modes existed: `{ id, name, type }`
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyAccount {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub membership: Membership,
}

impl From<LegacyAccount> for Account {
    fn from(legacy: LegacyAccount) -> Self {
        let game_mode = GameMode::infer_from_name(&legacy.name);
        Account {
            id: legacy.id,
            name: legacy.name,
            membership: legacy.membership,
            game_mode,
        }
    }
}

/// Either shape, as found in storage
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredAccount {
    Current(Account),
    Legacy(LegacyAccount),
}

impl StoredAccount {
    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredAccount::Legacy(_))
    }

    pub fn into_account(self) -> Account {
        match self {
            StoredAccount::Current(account) => account,
            StoredAccount::Legacy(legacy) => legacy.into(),
        }
    }
}

/// Migrate stored records to the current shape.
/// Returns the accounts and whether anything was rewritten.
pub fn migrate_accounts(stored: Vec<StoredAccount>) -> (Vec<Account>, bool) {
    let migrated = stored.iter().any(StoredAccount::is_legacy);
    let accounts = stored.into_iter().map(StoredAccount::into_account).collect();
    (accounts, migrated)
}

// ============================================================================
// ACCOUNT REGISTRY
// ============================================================================

/// Ordered list of accounts. Accounts are appended, never deleted.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        AccountRegistry { accounts: Vec::new() }
    }

    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        AccountRegistry { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.id == id)
    }

    pub fn first(&self) -> Option<&Account> {
        self.accounts.first()
    }

    /// Create an account with a fresh `custom-<millis>` id and append it
    pub fn create(
        &mut self,
        name: &str,
        membership: Membership,
        game_mode: GameMode,
    ) -> Result<Account, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyAccountName);
        }

        let account = Account::new(&self.next_id(), name, membership, game_mode);
        self.accounts.push(account.clone());
        Ok(account)
    }

    fn next_id(&self) -> String {
        let base = format!("custom-{}", Utc::now().timestamp_millis());
        if self.find_by_id(&base).is_none() {
            return base;
        }

        let mut suffix = 2;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if self.find_by_id(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Id of the account after (or before) `current`, wrapping around
    pub fn cycle(&self, current: Option<&str>, forward: bool) -> Option<&Account> {
        let len = self.accounts.len();
        if len == 0 {
            return None;
        }

        let index = match current.and_then(|id| self.position(id)) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.accounts.get(index)
    }
}

// ============================================================================
// TESTS
// ============================================================================
