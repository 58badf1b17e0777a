//! Best-effort persistence of account state.
//!
//! The store mirrors its state through a [`PersistenceGateway`] after each
//! mutation while persistence is enabled. Gateways never report failure:
//! a save that cannot complete is dropped, and a load that cannot complete
//! behaves as if nothing was ever saved. In-memory state stays
//! authoritative either way.

use crate::core::AccountState;
use log::{debug, warn};

pub mod error;
pub mod slot;

pub use error::StorageError;
pub use slot::{FileSlot, KeyValueSlot, MemorySlot};

/// Key the snapshot is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "atm_state_v1";

/// Port through which the store saves and loads snapshots.
pub trait PersistenceGateway {
    /// Write a snapshot of `state`. Failures are swallowed.
    fn save(&self, state: &AccountState);

    /// Read the saved snapshot, or `None` if it is missing or unreadable.
    fn load(&self) -> Option<AccountState>;
}

/// Gateway that stores snapshots as JSON in a [`KeyValueSlot`].
///
/// # Example
///
/// ```rust
/// use atm_sim::core::AccountState;
/// use atm_sim::persistence::{JsonGateway, MemorySlot, PersistenceGateway};
///
/// let gateway = JsonGateway::new(MemorySlot::new());
/// assert!(gateway.load().is_none());
///
/// let state = AccountState::default();
/// gateway.save(&state);
/// assert_eq!(gateway.load(), Some(state));
/// ```
#[derive(Clone, Debug)]
pub struct JsonGateway<K: KeyValueSlot> {
    slot: K,
    key: String,
}

impl<K: KeyValueSlot> JsonGateway<K> {
    /// Gateway over `slot` using [`DEFAULT_STORAGE_KEY`].
    pub fn new(slot: K) -> Self {
        Self::with_key(slot, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(slot: K, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &K {
        &self.slot
    }

    /// Encode and write `state`, reporting what went wrong.
    pub fn try_save(&self, state: &AccountState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        self.slot.set(&self.key, &json)
    }

    /// Read and decode the snapshot, reporting what went wrong.
    ///
    /// A snapshot whose newest entry disagrees with its balance is rejected
    /// as [`StorageError::Inconsistent`].
    pub fn try_load(&self) -> Result<Option<AccountState>, StorageError> {
        let Some(raw) = self.slot.get(&self.key)? else {
            return Ok(None);
        };

        let state: AccountState = serde_json::from_str(&raw)?;
        if let Some(newest) = state.history().newest() {
            if !state.is_consistent() {
                return Err(StorageError::Inconsistent {
                    balance: state.balance(),
                    newest: newest.result_balance(),
                });
            }
        }
        Ok(Some(state))
    }
}

impl<K: KeyValueSlot> PersistenceGateway for JsonGateway<K> {
    fn save(&self, state: &AccountState) {
        match self.try_save(state) {
            Ok(()) => debug!("Saved account snapshot under '{}'", self.key),
            Err(e) => warn!("Skipping snapshot save under '{}': {}", self.key, e),
        }
    }

    fn load(&self) -> Option<AccountState> {
        match self.try_load() {
            Ok(Some(state)) => {
                debug!("Loaded account snapshot from '{}'", self.key);
                Some(state)
            }
            Ok(None) => {
                debug!("No account snapshot under '{}'", self.key);
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable snapshot under '{}': {}", self.key, e);
                None
            }
        }
    }
}
