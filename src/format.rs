//! Display helpers for balances, timestamps and history lines.
//!
//! Amounts are Colombian pesos shown without decimals, using `.` as the
//! thousands separator: `$ 1.000.000`.

use crate::core::{Transaction, TransactionKind};
use chrono::{DateTime, Utc};

/// Format a peso amount, e.g. `1000000` → `"$ 1.000.000"`, `-5000` → `"-$ 5.000"`.
pub fn format_cop(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}$ {}", group_thousands(value.unsigned_abs()))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a timestamp as `dd/mm/yyyy, HH:MM:SS` (UTC).
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Menu label for an operation kind.
pub fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Deposit => "Depósito",
        TransactionKind::Withdraw => "Retiro",
        TransactionKind::Advance => "Avance",
    }
}

/// One history line: label, amount, time, and resulting balance.
pub fn format_transaction(tx: &Transaction) -> String {
    format!(
        "{} $ {} ({}) → {}",
        kind_label(tx.kind()),
        group_thousands(tx.amount()),
        format_timestamp(tx.timestamp()),
        format_cop(tx.result_balance())
    )
}
