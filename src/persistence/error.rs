//! Storage error types.

use thiserror::Error;

/// Errors raised by key-value slots and snapshot encoding.
///
/// These never leave the gateway: it logs them and degrades to
/// "not saved" or "no snapshot".
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing storage failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding the snapshot failed
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot decodes but its newest entry disagrees with its balance
    #[error("Snapshot balance {balance} does not match newest entry {newest}")]
    Inconsistent { balance: i64, newest: i64 },

    /// The key cannot name an entry in this slot
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// The slot refuses access (disabled, full, or otherwise unusable)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
