//! Store configuration.

use crate::core::{DEFAULT_HISTORY_LIMIT, INITIAL_BALANCE};
use crate::persistence::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};

/// Settings a store is built from.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use atm_sim::config::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{"history_limit": 50}"#).unwrap();
/// assert_eq!(config.history_limit, 50);
/// assert_eq!(config.initial_balance, 1_000_000);
/// assert_eq!(config.storage_key, "atm_state_v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Balance of a fresh or reset account
    pub initial_balance: i64,

    /// Maximum number of transactions kept in history
    pub history_limit: usize,

    /// Key the snapshot is saved under
    pub storage_key: String,

    /// Whether the session starts with persistence already enabled
    pub use_persistence: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_balance: INITIAL_BALANCE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            use_persistence: false,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from JSON, filling unspecified fields with defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
