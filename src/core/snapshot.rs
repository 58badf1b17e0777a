//! Serialized shape of an account state.
//!
//! `AccountSnapshot` is the wire record written to durable storage. It
//! mirrors the account fields one-to-one. Converting it into an
//! [`AccountState`] recomputes the delinquency flag from the balance, so
//! a hand-edited or stale payload can never desynchronize the two.

use super::history::TransactionHistory;
use super::state::AccountState;
use serde::{Deserialize, Serialize};

/// Plain record of an account state as stored under the snapshot key.
///
/// # Example
///
/// ```rust
/// use atm_sim::core::{AccountSnapshot, AccountState};
///
/// let raw = r#"{"balance":-5,"history":[],"delinquent":false,"usePersistence":true}"#;
/// let snapshot: AccountSnapshot = serde_json::from_str(raw).unwrap();
/// let state = AccountState::from(snapshot);
///
/// assert!(state.is_delinquent());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub balance: i64,
    pub history: TransactionHistory,
    pub delinquent: bool,
    pub use_persistence: bool,
}

impl From<AccountSnapshot> for AccountState {
    fn from(snapshot: AccountSnapshot) -> Self {
        AccountState::from_parts(
            snapshot.balance,
            snapshot.history,
            snapshot.use_persistence,
        )
    }
}

impl From<AccountState> for AccountSnapshot {
    fn from(state: AccountState) -> Self {
        Self {
            balance: state.balance(),
            delinquent: state.is_delinquent(),
            use_persistence: state.use_persistence(),
            history: state.into_history(),
        }
    }
}
