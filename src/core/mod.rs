//! Core account types and logic.
//!
//! This module contains the pure core of the account state machine:
//! - The `AccountState` value and its transitions
//! - Immutable, bounded transaction history
//! - The serialized snapshot record
//!
//! Nothing in this module performs I/O. Side effects (notification and
//! persistence) live in the store.

mod history;
mod snapshot;
mod state;

pub use history::{Transaction, TransactionHistory, TransactionKind, DEFAULT_HISTORY_LIMIT};
pub use snapshot::AccountSnapshot;
pub use state::{AccountState, INITIAL_BALANCE};
