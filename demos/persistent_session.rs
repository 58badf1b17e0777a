//! Persistent Sessions
//!
//! Demonstrates mirroring the account to a file and picking it up again
//! from a second session, as if the process had restarted.
//!
//! Run with: RUST_LOG=info cargo run --example persistent_session

use atm_sim::builder::AccountStoreBuilder;
use atm_sim::format::format_cop;
use atm_sim::persistence::FileSlot;
use std::fs;

fn main() {
    env_logger::init();

    println!("=== Persistent Session Example ===\n");

    let dir = std::env::temp_dir().join("atm-sim-demo");
    let slot = FileSlot::new(&dir);

    // Session 1: enable persistence and move some money
    println!("Session 1");
    println!("----------------------------------------");
    let mut first = AccountStoreBuilder::new()
        .build_with_slot(slot.clone())
        .expect("default settings are valid");
    first.toggle_persistence(true);
    first.deposit(1_000);
    first.advance(50_000);
    println!("  balance: {}", format_cop(first.balance()));
    println!("  snapshot: {}", slot.path_for("atm_state_v1").display());
    drop(first);

    // Session 2: start with persistence on and load the snapshot
    println!("\nSession 2");
    println!("----------------------------------------");
    let mut second = AccountStoreBuilder::new()
        .use_persistence(true)
        .build_with_slot(slot)
        .expect("default settings are valid");
    println!("  fresh balance:    {}", format_cop(second.balance()));

    if second.load_from_storage() {
        println!("  restored balance: {}", format_cop(second.balance()));
        println!("  transactions:     {}", second.history().len());
    } else {
        println!("  no snapshot found");
    }

    fs::remove_dir_all(&dir).ok();

    println!("\n=== Example Complete ===");
}
