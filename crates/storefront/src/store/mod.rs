//! Client-side cart, wishlist and session store.
//!
//! [`CartStore`] is the single source of truth for the shopper's cart lines,
//! wishlist entries and session. It is an explicitly owned value: callers
//! hold it (or a `&mut` to it) and pass it to the flows that need it.
//!
//! # Mutation contract
//!
//! Every mutating operation:
//! 1. computes the new collection from the current one,
//! 2. publishes a [`StoreEvent`] to subscribers,
//! 3. writes the new value to [`KeyValueStorage`].
//!
//! A failed write in step 3 does not undo the in-memory change. It is logged
//! and published as [`StoreEvent::PersistFailed`] so the UI can warn that the
//! change will not survive a restart. Operations that change nothing (removing
//! an absent line, re-adding a wishlisted product) neither publish nor write.
//!
//! # Loading
//!
//! [`CartStore::open`] reads the four records. A missing, unreadable or
//! corrupt record never fails the open: the collection starts empty, or the
//! session starts logged out.

mod events;
mod session;
mod storage;

pub use events::{StoreEvent, SubscriptionId};
pub use session::{AuthToken, Session};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageKey};

use serde::Serialize;
use serde::de::DeserializeOwned;

use atelier_core::{Cart, CartItem, CurrentUser, Price, ProductId, Wishlist, WishlistEntry};

use events::Subscribers;

/// Read-only view of everything the store holds.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub session: Option<Session>,
}

/// Cart/wishlist/session store backed by durable storage.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    state: StoreState,
    subscribers: Subscribers,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Open the store, re-hydrating state from `storage`.
    pub fn open(storage: S) -> Self {
        let cart = load_json::<Cart>(&storage, StorageKey::Cart).unwrap_or_default();
        let wishlist = load_json::<Wishlist>(&storage, StorageKey::Wishlist).unwrap_or_default();
        let session = load_session(&storage);

        tracing::debug!(
            cart_lines = cart.len(),
            wishlist_entries = wishlist.len(),
            logged_in = session.is_some(),
            "Cart store loaded"
        );

        Self {
            storage,
            state: StoreState {
                cart,
                wishlist,
                session,
            },
            subscribers: Subscribers::default(),
        }
    }

    // =========================================================================
    // Readers
    // =========================================================================

    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.state.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.state.wishlist
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.state.session.as_ref()
    }

    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.state.cart.total()
    }

    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.state.cart.item_count()
    }

    #[must_use]
    pub fn is_wishlisted(&self, product_id: &ProductId) -> bool {
        self.state.wishlist.contains(product_id)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.session.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.session.as_ref().is_some_and(Session::is_admin)
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and hand back its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback invoked after every state change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &StoreState) + 'static,
    {
        self.subscribers.add(Box::new(callback))
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add an item, merging into an existing `(product, size)` line.
    pub fn add_to_cart(&mut self, item: CartItem) -> &Cart {
        tracing::debug!(product_id = %item.product_id, size = %item.size, "Add to cart");
        if self.state.cart.add(item) {
            self.commit_cart();
        }
        &self.state.cart
    }

    /// Remove the line for `(product_id, size)`, if any.
    pub fn remove_from_cart(&mut self, product_id: &ProductId, size: &str) -> &Cart {
        if self.state.cart.remove(product_id, size) {
            tracing::debug!(%product_id, size, "Removed cart line");
            self.commit_cart();
        }
        &self.state.cart
    }

    /// Set a line's quantity; zero or below removes the line.
    pub fn update_cart_quantity(
        &mut self,
        product_id: &ProductId,
        size: &str,
        quantity: i64,
    ) -> &Cart {
        if self.state.cart.set_quantity(product_id, size, quantity) {
            tracing::debug!(%product_id, size, quantity, "Updated cart quantity");
            self.commit_cart();
        }
        &self.state.cart
    }

    /// Empty the cart and delete its stored record.
    ///
    /// The record is removed even when the cart was already empty, so a
    /// reload never finds a stale marker.
    pub fn clear_cart(&mut self) {
        let was_empty = self.state.cart.is_empty();
        self.state.cart.clear();
        if !was_empty {
            self.publish(&StoreEvent::CartChanged);
        }
        let result = self.storage.clear(StorageKey::Cart);
        self.check_persisted(StorageKey::Cart, result);
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Save a product; re-adding a saved product changes nothing.
    pub fn add_to_wishlist(&mut self, entry: WishlistEntry) -> &Wishlist {
        if self.state.wishlist.add(entry) {
            self.commit_wishlist();
        }
        &self.state.wishlist
    }

    /// Remove a saved product, if present.
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) -> &Wishlist {
        if self.state.wishlist.remove(product_id) {
            self.commit_wishlist();
        }
        &self.state.wishlist
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Start a session. Identity and token are stored together.
    pub fn set_user(&mut self, user: CurrentUser, token: AuthToken) {
        tracing::info!(user_id = %user.id, admin = user.is_admin, "Session started");
        self.state.session = Some(Session::new(user, token));
        self.publish(&StoreEvent::SessionChanged);

        let Some(session) = self.state.session.as_ref() else {
            return;
        };
        let user_result = to_json(StorageKey::User, session.user())
            .and_then(|json| self.storage.save(StorageKey::User, &json));
        let token_result = self
            .storage
            .save(StorageKey::Token, session.token().expose());

        self.check_persisted(StorageKey::User, user_result);
        self.check_persisted(StorageKey::Token, token_result);
    }

    /// End the session, clearing identity and token together.
    pub fn logout(&mut self) {
        if let Some(session) = self.state.session.take() {
            tracing::info!(user_id = %session.user().id, "Session ended");
            self.publish(&StoreEvent::SessionChanged);
        }

        let user_result = self.storage.clear(StorageKey::User);
        let token_result = self.storage.clear(StorageKey::Token);
        self.check_persisted(StorageKey::User, user_result);
        self.check_persisted(StorageKey::Token, token_result);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn commit_cart(&mut self) {
        self.publish(&StoreEvent::CartChanged);
        let result = to_json(StorageKey::Cart, &self.state.cart)
            .and_then(|json| self.storage.save(StorageKey::Cart, &json));
        self.check_persisted(StorageKey::Cart, result);
    }

    fn commit_wishlist(&mut self) {
        self.publish(&StoreEvent::WishlistChanged);
        let result = to_json(StorageKey::Wishlist, &self.state.wishlist)
            .and_then(|json| self.storage.save(StorageKey::Wishlist, &json));
        self.check_persisted(StorageKey::Wishlist, result);
    }

    fn publish(&mut self, event: &StoreEvent) {
        self.subscribers.notify(event, &self.state);
    }

    fn check_persisted(&mut self, key: StorageKey, result: Result<(), StorageError>) {
        if let Err(e) = result {
            tracing::warn!(key = %key, error = %e, "Failed to persist store record; keeping in-memory state");
            self.publish(&StoreEvent::PersistFailed {
                key,
                error: e.to_string(),
            });
        }
    }
}

/// Encode a record for storage.
fn to_json<T: Serialize>(key: StorageKey, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Rejected(key.as_str(), e.to_string()))
}

/// Read and decode a JSON record, treating any failure as absent.
fn load_json<T: DeserializeOwned>(storage: &impl KeyValueStorage, key: StorageKey) -> Option<T> {
    let raw = match storage.load(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read store record; starting empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Corrupt store record; starting empty");
            None
        }
    }
}

/// Load the session only when both halves are present and valid.
fn load_session(storage: &impl KeyValueStorage) -> Option<Session> {
    let user = load_json::<CurrentUser>(storage, StorageKey::User);
    let token = match storage.load(StorageKey::Token) {
        Ok(token) => token.filter(|t| !t.trim().is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored token");
            None
        }
    };

    match (user, token) {
        (Some(user), Some(token)) => Some(Session::new(user, AuthToken::new(token))),
        (None, None) => None,
        _ => {
            tracing::warn!("Stored session is incomplete; starting logged out");
            None
        }
    }
}
