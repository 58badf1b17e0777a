//! Account state and its pure transitions.
//!
//! Every method here is pure: transitions take `&self` and return the next
//! state. The store is the only place that swaps one state for the next.

use super::history::{clamp_i64, Transaction, TransactionHistory, TransactionKind};
use super::snapshot::AccountSnapshot;
use serde::{Deserialize, Serialize};

/// Balance a fresh account starts with.
pub const INITIAL_BALANCE: i64 = 1_000_000;

/// Complete state of the simulated account.
///
/// # Invariants
///
/// - `is_delinquent() == (balance() < 0)`. The flag is recomputed by every
///   transition that touches the balance and cannot be set on its own.
/// - The newest history entry's resulting balance equals `balance()`
///   whenever the history is non-empty. Store transitions preserve this,
///   and snapshots that break it are never loaded (see [`is_consistent`]).
///
/// [`is_consistent`]: AccountState::is_consistent
///
/// # Example
///
/// ```rust
/// use atm_sim::core::{AccountState, INITIAL_BALANCE};
///
/// let state = AccountState::initial(INITIAL_BALANCE);
/// assert_eq!(state.balance(), 1_000_000);
/// assert!(state.history().is_empty());
/// assert!(!state.is_delinquent());
/// assert!(!state.use_persistence());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AccountSnapshot", into = "AccountSnapshot")]
pub struct AccountState {
    balance: i64,
    history: TransactionHistory,
    delinquent: bool,
    use_persistence: bool,
}

impl AccountState {
    /// Fresh account: given balance, empty history, persistence off.
    pub fn initial(initial_balance: i64) -> Self {
        Self::from_parts(initial_balance, TransactionHistory::new(), false)
    }

    pub(crate) fn from_parts(
        balance: i64,
        history: TransactionHistory,
        use_persistence: bool,
    ) -> Self {
        Self {
            balance,
            history,
            delinquent: balance < 0,
            use_persistence,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Transaction history, newest first.
    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    pub fn is_delinquent(&self) -> bool {
        self.delinquent
    }

    /// Whether the newest entry's resulting balance matches `balance()`.
    ///
    /// Always true for states built by the store. A snapshot edited by hand
    /// may break it.
    pub fn is_consistent(&self) -> bool {
        self.history
            .newest()
            .map_or(true, |tx| tx.result_balance() == self.balance)
    }

    pub fn use_persistence(&self) -> bool {
        self.use_persistence
    }

    pub(crate) fn into_history(self) -> TransactionHistory {
        self.history
    }

    /// Balance that would result from applying `amount` as `kind`.
    ///
    /// Saturates at the `i64` bounds.
    pub fn balance_after(&self, kind: TransactionKind, amount: u64) -> i64 {
        clamp_i64(i128::from(self.balance) + kind.signed_effect(amount))
    }

    /// Whether a withdrawal of `amount` is covered by the current balance.
    pub fn covers_withdrawal(&self, amount: u64) -> bool {
        i128::from(amount) <= i128::from(self.balance)
    }

    /// Apply a recorded transaction, returning the next state.
    ///
    /// The balance becomes the transaction's resulting balance and the
    /// delinquency flag is recomputed in the same step.
    pub(crate) fn with_transaction(&self, transaction: Transaction, history_limit: usize) -> Self {
        let balance = transaction.result_balance();
        Self::from_parts(
            balance,
            self.history.record(transaction, history_limit),
            self.use_persistence,
        )
    }

    /// Same account with the persistence toggle set to `enabled`.
    pub fn with_persistence(&self, enabled: bool) -> Self {
        Self {
            use_persistence: enabled,
            ..self.clone()
        }
    }

    /// Initial account shape, keeping this state's persistence toggle.
    pub fn reset(&self, initial_balance: i64) -> Self {
        Self::from_parts(
            initial_balance,
            TransactionHistory::new(),
            self.use_persistence,
        )
    }

    /// Bring a loaded state within `history_limit`.
    pub(crate) fn normalized(self, history_limit: usize) -> Self {
        let Self {
            balance,
            history,
            use_persistence,
            ..
        } = self;
        Self::from_parts(balance, history.truncated(history_limit), use_persistence)
    }
}

impl Default for AccountState {
    fn default() -> Self {
        Self::initial(INITIAL_BALANCE)
    }
}
