//! Scripted ATM Session
//!
//! Walks through a session the way the terminal panel would drive it:
//! validate typed amounts, run the operation, and print the outcome.
//!
//! Run with: RUST_LOG=debug cargo run --example atm_session

use atm_sim::format::{format_cop, format_transaction};
use atm_sim::validation::parse_amount;
use atm_sim::{AccountState, AccountStore, TransactionKind};

fn main() {
    env_logger::init();

    println!("=== ATM Session ===\n");

    let mut store = AccountStore::in_memory();
    store.subscribe(|state: &AccountState| {
        let status = if state.is_delinquent() { " [MOROSO]" } else { "" };
        println!("  balance: {}{}", format_cop(state.balance()), status);
    });

    let script = [
        (TransactionKind::Deposit, "150000"),
        (TransactionKind::Withdraw, "2000000"),
        (TransactionKind::Withdraw, "-50.5"),
        (TransactionKind::Advance, "1500000"),
        (TransactionKind::Deposit, "abc"),
        (TransactionKind::Deposit, "400000"),
    ];

    for (kind, input) in script {
        println!("{} '{}'", kind.name(), input);

        let amount = match parse_amount(input) {
            Ok(amount) => amount,
            Err(violations) => {
                for violation in violations {
                    println!("  invalid input: {}", violation);
                }
                continue;
            }
        };

        match kind {
            TransactionKind::Deposit => store.deposit(amount),
            TransactionKind::Advance => store.advance(amount),
            TransactionKind::Withdraw => {
                if !store.withdraw(amount) {
                    println!("  rejected: amount exceeds balance");
                }
            }
        }
    }

    println!("\nHistory (newest first):");
    for tx in store.history().transactions() {
        println!("  {}", format_transaction(tx));
    }

    println!("\nBalance chart series: {:?}", store.history().balance_series());

    println!("\n=== Session Complete ===");
}
