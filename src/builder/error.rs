//! Build errors for the store builder.

use thiserror::Error;

/// Errors that can occur when building an account store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("History limit must be at least 1. Call .history_limit(n) with n > 0")]
    ZeroHistoryLimit,

    #[error("Storage key is empty. Call .storage_key(key) with a non-empty key")]
    EmptyStorageKey,

    #[error("Storage key '{0}' contains a path separator. Use a plain name such as \"atm_state_v1\"")]
    StorageKeyHasPathSeparator(String),

    #[error("Invalid store configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
