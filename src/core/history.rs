//! Transaction records and the bounded account history.
//!
//! History is kept most-recent-first and never grows past its limit.
//! Recording follows the same immutable style as the rest of the core:
//! `record` returns a new history and leaves the original untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of transactions retained by a history.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// The kind of operation a transaction records.
///
/// The kind alone decides the sign of the balance effect; amounts are
/// always non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Advance,
}

impl TransactionKind {
    /// Get the kind's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Advance => "advance",
        }
    }

    /// Signed effect of `amount` on the balance.
    ///
    /// Widened to `i128` so that no `u64` amount can overflow.
    pub fn signed_effect(&self, amount: u64) -> i128 {
        match self {
            Self::Deposit => i128::from(amount),
            Self::Withdraw | Self::Advance => -i128::from(amount),
        }
    }
}

/// Record of a single applied operation.
///
/// Transactions are immutable values: all fields are set at creation and
/// exposed through accessors only.
///
/// # Example
///
/// ```rust
/// use atm_sim::core::{Transaction, TransactionKind};
/// use chrono::Utc;
///
/// let tx = Transaction::new("tx-1", TransactionKind::Deposit, 500, Utc::now(), 1_000_500);
/// assert_eq!(tx.kind(), TransactionKind::Deposit);
/// assert_eq!(tx.result_balance(), 1_000_500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: String,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: u64,
    #[serde(rename = "date")]
    timestamp: DateTime<Utc>,
    result_balance: i64,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionKind,
        amount: u64,
        timestamp: DateTime<Utc>,
        result_balance: i64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            timestamp,
            result_balance,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Balance immediately after this transaction was applied.
    pub fn result_balance(&self) -> i64 {
        self.result_balance
    }

    /// Balance immediately before this transaction was applied.
    pub fn prior_balance(&self) -> i128 {
        i128::from(self.result_balance) - self.kind.signed_effect(self.amount)
    }
}

/// Most-recent-first, bounded list of transactions.
///
/// Serializes as a plain JSON array so snapshots keep the same shape as
/// the account record they mirror.
///
/// # Example
///
/// ```rust
/// use atm_sim::core::{Transaction, TransactionHistory, TransactionKind};
/// use chrono::Utc;
///
/// let history = TransactionHistory::new();
/// let tx = Transaction::new("a", TransactionKind::Deposit, 10, Utc::now(), 10);
///
/// let next = history.record(tx, 200);
/// assert_eq!(next.len(), 1);
/// assert!(history.is_empty()); // Original unchanged
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHistory {
    entries: Vec<Transaction>,
}

impl TransactionHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a transaction as the newest entry, returning a new history.
    ///
    /// Entries past `limit` are dropped from the oldest end.
    pub fn record(&self, transaction: Transaction, limit: usize) -> Self {
        let mut entries = Vec::with_capacity((self.entries.len() + 1).min(limit));
        entries.push(transaction);
        entries.extend(self.entries.iter().cloned());
        entries.truncate(limit);
        Self { entries }
    }

    /// Drop entries beyond `limit`, keeping the newest ones.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.entries.truncate(limit);
        self
    }

    /// All entries, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn newest(&self) -> Option<&Transaction> {
        self.entries.first()
    }

    pub fn oldest(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Balances in chronological order, for charting.
    ///
    /// The series starts with the balance before the oldest retained entry,
    /// then lists each entry's resulting balance from oldest to newest. An
    /// empty history yields an empty series.
    pub fn balance_series(&self) -> Vec<i64> {
        let Some(oldest) = self.oldest() else {
            return Vec::new();
        };

        let mut series = Vec::with_capacity(self.entries.len() + 1);
        series.push(clamp_i64(oldest.prior_balance()));
        series.extend(self.entries.iter().rev().map(Transaction::result_balance));
        series
    }

    /// Check that every entry's resulting balance follows from the one
    /// before it, starting at `opening_balance` for the oldest entry.
    ///
    /// Saturated balances at the `i64` bounds are accepted as consistent.
    pub fn is_chained_from(&self, opening_balance: i64) -> bool {
        let mut running = opening_balance;
        for tx in self.entries.iter().rev() {
            let expected = clamp_i64(i128::from(running) + tx.kind().signed_effect(tx.amount()));
            if tx.result_balance() != expected {
                return false;
            }
            running = expected;
        }
        true
    }

    /// Elapsed time from the oldest to the newest entry.
    ///
    /// Returns `None` for an empty history, and also when timestamps run
    /// backwards (for example after a clock adjustment).
    pub fn span(&self) -> Option<Duration> {
        let (oldest, newest) = (self.oldest()?, self.newest()?);
        newest
            .timestamp()
            .signed_duration_since(oldest.timestamp())
            .to_std()
            .ok()
    }
}

pub(crate) fn clamp_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn tx(id: &str, kind: TransactionKind, amount: u64, result: i64) -> Transaction {
        Transaction::new(id, kind, amount, at(0), result)
    }

    #[test]
    fn new_history_is_empty() {
        let history = TransactionHistory::new();
        assert!(history.is_empty());
        assert!(history.balance_series().is_empty());
        assert!(history.span().is_none());
    }

    #[test]
    fn record_prepends_newest() {
        let history = TransactionHistory::new()
            .record(tx("a", TransactionKind::Deposit, 10, 10), 200)
            .record(tx("b", TransactionKind::Withdraw, 5, 5), 200);

        assert_eq!(history.len(), 2);
        assert_eq!(history.newest().unwrap().id(), "b");
        assert_eq!(history.oldest().unwrap().id(), "a");
    }

    #[test]
    fn record_is_immutable() {
        let history = TransactionHistory::new();
        let next = history.record(tx("a", TransactionKind::Deposit, 10, 10), 200);

        assert_eq!(history.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn record_drops_oldest_past_limit() {
        let mut history = TransactionHistory::new();
        for i in 0..5u64 {
            history = history.record(
                tx(&format!("t{i}"), TransactionKind::Deposit, 1, i as i64 + 1),
                3,
            );
        }

        let ids: Vec<&str> = history.transactions().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["t4", "t3", "t2"]);
    }

    #[test]
    fn truncated_keeps_newest() {
        let history = TransactionHistory::new()
            .record(tx("a", TransactionKind::Deposit, 1, 1), 10)
            .record(tx("b", TransactionKind::Deposit, 1, 2), 10)
            .truncated(1);

        assert_eq!(history.len(), 1);
        assert_eq!(history.newest().unwrap().id(), "b");
    }

    #[test]
    fn signed_effect_follows_kind() {
        assert_eq!(TransactionKind::Deposit.signed_effect(7), 7);
        assert_eq!(TransactionKind::Withdraw.signed_effect(7), -7);
        assert_eq!(TransactionKind::Advance.signed_effect(7), -7);
        assert_eq!(
            TransactionKind::Advance.signed_effect(u64::MAX),
            -i128::from(u64::MAX)
        );
    }

    #[test]
    fn balance_series_is_chronological() {
        let history = TransactionHistory::new()
            .record(tx("a", TransactionKind::Deposit, 100, 1_100), 200)
            .record(tx("b", TransactionKind::Advance, 1_500, -400), 200);

        assert_eq!(history.balance_series(), vec![1_000, 1_100, -400]);
    }

    #[test]
    fn chain_check_detects_mismatch() {
        let good = TransactionHistory::new()
            .record(tx("a", TransactionKind::Deposit, 100, 1_100), 200)
            .record(tx("b", TransactionKind::Withdraw, 100, 1_000), 200);
        assert!(good.is_chained_from(1_000));

        let bad = good.record(tx("c", TransactionKind::Deposit, 1, 5), 200);
        assert!(!bad.is_chained_from(1_000));
    }

    #[test]
    fn span_measures_oldest_to_newest() {
        let history = TransactionHistory::new()
            .record(
                Transaction::new("a", TransactionKind::Deposit, 1, at(0), 1),
                200,
            )
            .record(
                Transaction::new("b", TransactionKind::Deposit, 1, at(90), 2),
                200,
            );

        assert_eq!(history.span(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn transaction_serializes_with_record_field_names() {
        let json = serde_json::to_value(tx("a", TransactionKind::Withdraw, 5, 95)).unwrap();

        assert_eq!(json["id"], "a");
        assert_eq!(json["type"], "withdraw");
        assert_eq!(json["amount"], 5);
        assert_eq!(json["resultBalance"], 95);
        assert!(json["date"].is_string());
    }

    #[test]
    fn history_serializes_as_array() {
        let history =
            TransactionHistory::new().record(tx("a", TransactionKind::Deposit, 1, 1), 200);

        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());

        let back: TransactionHistory = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
