//! Change notification for the cart store.

use super::StoreState;
use super::storage::StorageKey;

/// What changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Cart lines were added, removed, re-quantified or cleared.
    CartChanged,
    /// A wishlist entry was added or removed.
    WishlistChanged,
    /// The user logged in or out.
    SessionChanged,
    /// The in-memory change stands, but writing it to storage failed.
    PersistFailed {
        key: StorageKey,
        error: String,
    },
}

/// Handle returned by `CartStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&StoreEvent, &StoreState)>;

/// Registered subscriber callbacks, notified in subscription order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Callbacks only see a shared view of the state, so none of them can
    /// start another mutation while this one is in flight.
    pub(crate) fn notify(&mut self, event: &StoreEvent, state: &StoreState) {
        for (_, callback) in &mut self.callbacks {
            callback(event, state);
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}
