//! Change notification for store observers.

use crate::core::AccountState;

/// Callback invoked with the fully updated state after each mutation.
pub type Observer = Box<dyn FnMut(&AccountState)>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered observers, notified in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, state: &AccountState) {
        for (_, observer) in &mut self.entries {
            observer(state);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
