use thiserror::Error;

/// Domain errors raised by tracker operations.
/// Storage and I/O failures travel as `anyhow::Error` instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("account name must not be empty")]
    EmptyAccountName,

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("no account selected")]
    NoAccountSelected,

    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("item not found in the active catalog: {0}")]
    ItemNotFound(String),
}
