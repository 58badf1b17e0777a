//! ATM Sim: the account state machine behind a simulated teller machine
//!
//! A single simulated account supports deposits, withdrawals and cash
//! advances, keeps a bounded transaction history, flags delinquency, and
//! can mirror itself to durable storage between sessions.
//!
//! The crate follows a "pure core, imperative shell" layout. The core
//! state transitions are pure functions with no side effects; the store
//! applies them, notifies observers, and performs best-effort persistence.
//!
//! # Core Concepts
//!
//! - **AccountState**: balance, history, derived delinquency flag and the
//!   persistence toggle
//! - **AccountStore**: the only mutator of the state, with observers
//! - **PersistenceGateway**: injected port for saving and loading snapshots
//!
//! # Example
//!
//! ```rust
//! use atm_sim::builder::AccountStoreBuilder;
//! use atm_sim::persistence::MemorySlot;
//!
//! let storage = MemorySlot::new();
//!
//! let mut session = AccountStoreBuilder::new()
//!     .build_with_slot(storage.clone())
//!     .unwrap();
//! session.toggle_persistence(true);
//! session.deposit(1_000);
//!
//! // A later session over the same storage picks up where we left off.
//! let mut restarted = AccountStoreBuilder::new()
//!     .use_persistence(true)
//!     .build_with_slot(storage)
//!     .unwrap();
//! assert_eq!(restarted.balance(), 1_000_000);
//!
//! restarted.load_from_storage();
//! assert_eq!(restarted.balance(), 1_001_000);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod format;
pub mod persistence;
pub mod sources;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use builder::{AccountStoreBuilder, BuildError};
pub use config::StoreConfig;
pub use crate::core::{AccountState, Transaction, TransactionHistory, TransactionKind, INITIAL_BALANCE};
pub use persistence::{FileSlot, JsonGateway, KeyValueSlot, MemorySlot, PersistenceGateway};
pub use store::{AccountStore, SubscriptionId};
