//! The account store: sole owner and mutator of the account state.
//!
//! Each operation computes the next state with the pure transitions in
//! [`crate::core`], installs it in one step, notifies observers and then,
//! if persistence is enabled, mirrors it through the gateway. Observers
//! therefore only ever see complete states.

use crate::config::StoreConfig;
use crate::core::{AccountState, Transaction, TransactionHistory, TransactionKind};
use crate::persistence::{JsonGateway, MemorySlot, PersistenceGateway};
use crate::sources::{Clock, IdGenerator, SystemClock, UuidGenerator};
use log::{debug, info};

mod observers;

pub use observers::{Observer, SubscriptionId};
use observers::Observers;

/// Store holding the simulated account.
///
/// # Example
///
/// ```rust
/// use atm_sim::AccountStore;
///
/// let mut store = AccountStore::in_memory();
///
/// store.deposit(150_000);
/// assert_eq!(store.balance(), 1_150_000);
///
/// assert!(!store.withdraw(5_000_000));
/// assert_eq!(store.balance(), 1_150_000);
///
/// store.advance(2_000_000);
/// assert_eq!(store.balance(), -850_000);
/// assert!(store.is_delinquent());
/// ```
pub struct AccountStore<P: PersistenceGateway> {
    state: AccountState,
    config: StoreConfig,
    gateway: P,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    observers: Observers,
}

impl AccountStore<JsonGateway<MemorySlot>> {
    /// Store with default settings backed by a private in-memory slot.
    pub fn in_memory() -> Self {
        Self::new(JsonGateway::new(MemorySlot::new()))
    }
}

impl<P: PersistenceGateway> AccountStore<P> {
    /// Store with default settings persisting through `gateway`.
    pub fn new(gateway: P) -> Self {
        Self::from_parts(
            StoreConfig::default(),
            gateway,
            Box::new(SystemClock),
            Box::new(UuidGenerator),
        )
    }

    pub(crate) fn from_parts(
        config: StoreConfig,
        gateway: P,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let state = AccountState::initial(config.initial_balance)
            .with_persistence(config.use_persistence);
        Self {
            state,
            config,
            gateway,
            clock,
            ids,
            observers: Observers::default(),
        }
    }

    /// Current state (pure)
    pub fn state(&self) -> &AccountState {
        &self.state
    }

    pub fn balance(&self) -> i64 {
        self.state.balance()
    }

    pub fn history(&self) -> &TransactionHistory {
        self.state.history()
    }

    pub fn is_delinquent(&self) -> bool {
        self.state.is_delinquent()
    }

    pub fn use_persistence(&self) -> bool {
        self.state.use_persistence()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn gateway(&self) -> &P {
        &self.gateway
    }

    /// Register `observer` to be called after every successful mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&AccountState) + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Credit `amount` to the account. Always succeeds.
    pub fn deposit(&mut self, amount: u64) {
        self.record(TransactionKind::Deposit, amount);
    }

    /// Debit `amount` if the balance covers it.
    ///
    /// Returns `false` and changes nothing when `amount` exceeds the
    /// balance, so a withdrawal can never make the balance negative.
    pub fn withdraw(&mut self, amount: u64) -> bool {
        if !self.state.covers_withdrawal(amount) {
            debug!(
                "Rejected withdrawal of {} against balance {}",
                amount,
                self.state.balance()
            );
            return false;
        }

        self.record(TransactionKind::Withdraw, amount);
        true
    }

    /// Debit `amount` unconditionally as a cash advance.
    ///
    /// This is the only operation that can take the balance below zero.
    pub fn advance(&mut self, amount: u64) {
        self.record(TransactionKind::Advance, amount);
    }

    /// Turn persistence on or off.
    ///
    /// Enabling saves the current state right away. Disabling leaves any
    /// stored snapshot where it is.
    pub fn toggle_persistence(&mut self, enabled: bool) {
        info!("Persistence {}", if enabled { "enabled" } else { "disabled" });
        let next = self.state.with_persistence(enabled);
        self.commit(next);
    }

    /// Return the account to its initial shape, keeping the persistence toggle.
    pub fn reset(&mut self) {
        info!("Resetting account to {}", self.config.initial_balance);
        let next = self.state.reset(self.config.initial_balance);
        self.commit(next);
    }

    /// Replace the state with the saved snapshot, if persistence is enabled
    /// and a readable snapshot exists.
    ///
    /// The persistence toggle belongs to the session: the loaded state keeps
    /// it enabled whatever the snapshot recorded. Returns whether the state
    /// was replaced.
    pub fn load_from_storage(&mut self) -> bool {
        if !self.state.use_persistence() {
            debug!("Persistence disabled, not loading snapshot");
            return false;
        }

        let Some(loaded) = self.gateway.load() else {
            return false;
        };

        let next = loaded
            .normalized(self.config.history_limit)
            .with_persistence(true);
        info!(
            "Restored account with balance {} and {} transactions",
            next.balance(),
            next.history().len()
        );
        self.install(next);
        true
    }

    fn record(&mut self, kind: TransactionKind, amount: u64) {
        let result_balance = self.state.balance_after(kind, amount);
        let transaction = Transaction::new(
            self.ids.next_id(),
            kind,
            amount,
            self.clock.now(),
            result_balance,
        );
        debug!(
            "Recorded {} {} of {}, balance now {}",
            kind.name(),
            transaction.id(),
            amount,
            result_balance
        );

        let next = self
            .state
            .with_transaction(transaction, self.config.history_limit);
        self.commit(next);
    }

    fn install(&mut self, next: AccountState) {
        self.state = next;
        self.observers.notify(&self.state);
    }

    fn commit(&mut self, next: AccountState) {
        self.install(next);
        if self.state.use_persistence() {
            self.gateway.save(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AccountStoreBuilder;
    use crate::core::INITIAL_BALANCE;
    use crate::persistence::{KeyValueSlot, DEFAULT_STORAGE_KEY};
    use crate::sources::SequentialIds;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_over(slot: &MemorySlot) -> AccountStore<JsonGateway<MemorySlot>> {
        AccountStore::new(JsonGateway::new(slot.clone()))
    }

    fn stored_balance(slot: &MemorySlot) -> Option<i64> {
        let raw = slot.get(DEFAULT_STORAGE_KEY).unwrap()?;
        let state: AccountState = serde_json::from_str(&raw).unwrap();
        Some(state.balance())
    }

    #[test]
    fn deposit_records_transaction() {
        let mut store = AccountStore::in_memory();
        store.deposit(150_000);

        assert_eq!(store.balance(), 1_150_000);
        assert_eq!(store.history().len(), 1);

        let tx = store.history().newest().unwrap();
        assert_eq!(tx.kind(), TransactionKind::Deposit);
        assert_eq!(tx.amount(), 150_000);
        assert_eq!(tx.result_balance(), 1_150_000);
    }

    #[test]
    fn zero_deposit_is_recorded() {
        let mut store = AccountStore::in_memory();
        store.deposit(0);

        assert_eq!(store.balance(), INITIAL_BALANCE);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn withdraw_within_balance_succeeds() {
        let mut store = AccountStore::in_memory();

        assert!(store.withdraw(200_000));
        assert_eq!(store.balance(), 800_000);
        assert_eq!(
            store.history().newest().unwrap().kind(),
            TransactionKind::Withdraw
        );
    }

    #[test]
    fn withdraw_entire_balance_succeeds() {
        let mut store = AccountStore::in_memory();

        assert!(store.withdraw(1_000_000));
        assert_eq!(store.balance(), 0);
        assert!(!store.is_delinquent());
    }

    #[test]
    fn withdraw_over_balance_changes_nothing() {
        let mut store = AccountStore::in_memory();
        let before = store.state().clone();

        assert!(!store.withdraw(2_000_000));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn withdraw_while_delinquent_is_rejected() {
        let mut store = AccountStore::in_memory();
        store.advance(1_000_001);

        assert!(!store.withdraw(0));
        assert_eq!(store.balance(), -1);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn advance_can_go_negative() {
        let mut store = AccountStore::in_memory();
        store.advance(1_200_000);

        assert_eq!(store.balance(), -200_000);
        assert!(store.is_delinquent());
        assert_eq!(
            store.history().newest().unwrap().kind(),
            TransactionKind::Advance
        );
    }

    #[test]
    fn deposit_clears_delinquency() {
        let mut store = AccountStore::in_memory();
        store.advance(1_200_000);
        store.deposit(200_000);

        assert_eq!(store.balance(), 0);
        assert!(!store.is_delinquent());
    }

    #[test]
    fn transaction_ids_are_unique() {
        let mut store = AccountStore::in_memory();
        for _ in 0..50 {
            store.deposit(1);
        }

        let mut ids: Vec<&str> = store
            .history()
            .transactions()
            .iter()
            .map(|t| t.id())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn history_is_capped() {
        let mut store = AccountStoreBuilder::new()
            .ids(SequentialIds::new("t"))
            .build(JsonGateway::new(MemorySlot::new()))
            .unwrap();

        for _ in 0..201 {
            store.deposit(1);
        }

        assert_eq!(store.history().len(), 200);
        assert_eq!(store.history().newest().unwrap().id(), "t-201");
        assert_eq!(store.history().oldest().unwrap().id(), "t-2");
        assert_eq!(store.balance(), INITIAL_BALANCE + 201);
    }

    #[test]
    fn reset_restores_initial_and_keeps_toggle() {
        let mut store = AccountStore::in_memory();
        store.toggle_persistence(true);
        store.advance(5_000_000);
        store.reset();

        assert_eq!(store.balance(), INITIAL_BALANCE);
        assert!(store.history().is_empty());
        assert!(!store.is_delinquent());
        assert!(store.use_persistence());
    }

    #[test]
    fn nothing_is_saved_while_disabled() {
        let slot = MemorySlot::new();
        let mut store = store_over(&slot);

        store.deposit(10);
        store.reset();
        assert!(stored_balance(&slot).is_none());
    }

    #[test]
    fn enabling_persistence_saves_current_state() {
        let slot = MemorySlot::new();
        let mut store = store_over(&slot);

        store.deposit(10);
        store.toggle_persistence(true);
        assert_eq!(stored_balance(&slot), Some(1_000_010));

        store.withdraw(10);
        assert_eq!(stored_balance(&slot), Some(1_000_000));
    }

    #[test]
    fn disabling_persistence_keeps_last_snapshot() {
        let slot = MemorySlot::new();
        let mut store = store_over(&slot);

        store.toggle_persistence(true);
        store.deposit(500);
        store.toggle_persistence(false);
        store.deposit(500);

        assert_eq!(stored_balance(&slot), Some(1_000_500));
    }

    #[test]
    fn reset_is_saved_when_enabled() {
        let slot = MemorySlot::new();
        let mut store = store_over(&slot);

        store.toggle_persistence(true);
        store.advance(300);
        store.reset();

        assert_eq!(stored_balance(&slot), Some(INITIAL_BALANCE));
    }

    #[test]
    fn load_is_noop_while_disabled() {
        let slot = MemorySlot::new();
        let mut writer = store_over(&slot);
        writer.toggle_persistence(true);
        writer.deposit(1_000);

        let mut reader = store_over(&slot);
        assert!(!reader.load_from_storage());
        assert_eq!(reader.balance(), INITIAL_BALANCE);
    }

    #[test]
    fn load_without_snapshot_is_noop() {
        let mut store = AccountStoreBuilder::new()
            .use_persistence(true)
            .build(JsonGateway::new(MemorySlot::new()))
            .unwrap();

        assert!(!store.load_from_storage());
        assert_eq!(store.balance(), INITIAL_BALANCE);
        assert!(store.use_persistence());
    }

    #[test]
    fn load_keeps_session_toggle() {
        let slot = MemorySlot::new();
        let saved = AccountState::initial(42);
        JsonGateway::new(slot.clone()).save(&saved);

        let mut store = store_over(&slot);
        store.toggle_persistence(true);
        // Enabling overwrote the snapshot with the fresh state.
        assert_eq!(stored_balance(&slot), Some(INITIAL_BALANCE));

        JsonGateway::new(slot.clone()).save(&saved);
        assert!(store.load_from_storage());
        assert_eq!(store.balance(), 42);
        assert!(store.use_persistence());
    }

    #[test]
    fn observers_see_final_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = AccountStore::in_memory();

        let sink = Rc::clone(&seen);
        store.subscribe(move |state: &AccountState| {
            let newest = state.history().newest().map(|t| t.result_balance());
            sink.borrow_mut()
                .push((state.balance(), state.is_delinquent(), newest));
        });

        store.deposit(100);
        store.advance(2_000_000);

        assert_eq!(
            *seen.borrow(),
            vec![
                (1_000_100, false, Some(1_000_100)),
                (-999_900, true, Some(-999_900)),
            ]
        );
    }

    #[test]
    fn rejected_withdrawal_does_not_notify() {
        let count = Rc::new(RefCell::new(0));
        let mut store = AccountStore::in_memory();

        let counter = Rc::clone(&count);
        store.subscribe(move |_: &AccountState| *counter.borrow_mut() += 1);

        store.withdraw(u64::MAX);
        store.load_from_storage();
        assert_eq!(*count.borrow(), 0);

        store.toggle_persistence(true);
        store.reset();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn unsubscribed_observer_is_not_called() {
        let count = Rc::new(RefCell::new(0));
        let mut store = AccountStore::in_memory();

        let counter = Rc::clone(&count);
        let id = store.subscribe(move |_: &AccountState| *counter.borrow_mut() += 1);
        store.deposit(1);
        assert!(store.unsubscribe(id));
        store.deposit(1);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(store.observer_count(), 0);
    }
}
