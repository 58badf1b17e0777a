//! Builder for constructing account stores.

use crate::builder::error::BuildError;
use crate::config::StoreConfig;
use crate::persistence::slot::has_path_separator;
use crate::persistence::{JsonGateway, KeyValueSlot, PersistenceGateway};
use crate::sources::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::store::AccountStore;

/// Builder for constructing account stores with a fluent API.
///
/// # Example
///
/// ```rust
/// use atm_sim::builder::AccountStoreBuilder;
/// use atm_sim::persistence::MemorySlot;
///
/// let store = AccountStoreBuilder::new()
///     .initial_balance(500)
///     .history_limit(10)
///     .use_persistence(true)
///     .build_with_slot(MemorySlot::new())
///     .unwrap();
///
/// assert_eq!(store.balance(), 500);
/// assert!(store.use_persistence());
/// ```
pub struct AccountStoreBuilder {
    config: StoreConfig,
    clock: Option<Box<dyn Clock>>,
    ids: Option<Box<dyn IdGenerator>>,
}

impl AccountStoreBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            clock: None,
            ids: None,
        }
    }

    /// Create a builder from a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self, BuildError> {
        Ok(Self::new().config(StoreConfig::from_json(raw)?))
    }

    /// Replace all settings at once.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn initial_balance(mut self, balance: i64) -> Self {
        self.config.initial_balance = balance;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Key the snapshot is stored under (only used by `build_with_slot`).
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    /// Start the session with persistence already enabled.
    ///
    /// Unlike `toggle_persistence(true)`, this does not write a snapshot,
    /// so one saved by an earlier session can still be loaded.
    pub fn use_persistence(mut self, enabled: bool) -> Self {
        self.config.use_persistence = enabled;
        self
    }

    /// Time source for transaction timestamps (defaults to the system clock).
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Id source for transactions (defaults to random UUIDs).
    pub fn ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Box::new(ids));
        self
    }

    /// Build a store persisting through `gateway`.
    /// Returns an error if the settings are invalid.
    pub fn build<P: PersistenceGateway>(self, gateway: P) -> Result<AccountStore<P>, BuildError> {
        if self.config.history_limit == 0 {
            return Err(BuildError::ZeroHistoryLimit);
        }

        Ok(AccountStore::from_parts(
            self.config,
            gateway,
            self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            self.ids.unwrap_or_else(|| Box::new(UuidGenerator)),
        ))
    }

    /// Build a store saving JSON snapshots into `slot` under the configured key.
    pub fn build_with_slot<K: KeyValueSlot>(
        self,
        slot: K,
    ) -> Result<AccountStore<JsonGateway<K>>, BuildError> {
        if self.config.storage_key.trim().is_empty() {
            return Err(BuildError::EmptyStorageKey);
        }
        if has_path_separator(&self.config.storage_key) {
            return Err(BuildError::StorageKeyHasPathSeparator(
                self.config.storage_key,
            ));
        }

        let gateway = JsonGateway::with_key(slot, self.config.storage_key.clone());
        self.build(gateway)
    }
}

impl Default for AccountStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
