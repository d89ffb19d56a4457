//! Cart store
//!
//! [`CartStore`] is the value a storefront hands to every surface that shows or changes the
//! cart. It is the single writer: only [`CartStore::dispatch`] mutates, and readers either
//! borrow the current [`CartState`] or register a [`CartObserver`] that sees every accepted
//! transition.

use std::fmt;

use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartAction, CartError, CartOutcome, key::LineKey, state::CartState},
    checkout::{CheckoutError, OrderSummary},
    persistence::{CartSnapshot, PersistenceError},
};

/// Read-only listener notified after each accepted action.
pub trait CartObserver {
    /// Called with the new state and what the action did.
    fn on_change(&mut self, state: &CartState, outcome: &CartOutcome);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartState, &CartOutcome),
{
    fn on_change(&mut self, state: &CartState, outcome: &CartOutcome) {
        self(state, outcome);
    }
}

/// Result of a dispatched action.
#[derive(Debug)]
pub struct Transition<'s> {
    /// State after the action
    pub state: &'s CartState,

    /// What the action did
    pub outcome: CartOutcome,
}

/// Single-writer container for the session's cart.
pub struct CartStore {
    cart: Cart,
    observers: Vec<Box<dyn CartObserver + Send>>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartStore {
    /// Wrap a cart in a store with no observers.
    pub fn new(cart: Cart) -> Self {
        Self {
            cart,
            observers: Vec::new(),
        }
    }

    /// Register an observer for subsequent transitions.
    ///
    /// Observers must be `Send` so the store can move between threads.
    pub fn subscribe(&mut self, observer: impl CartObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current state
    pub fn state(&self) -> &CartState {
        self.cart.state()
    }

    /// Underlying cart engine
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Build the key for a product, size and raw colour string.
    ///
    /// # Errors
    ///
    /// See [`Cart::key_for`].
    pub fn key_for(
        &self,
        id: &str,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<LineKey, CartError> {
        self.cart.key_for(id, size, color)
    }

    /// Apply an action and notify observers.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`CartError`]; observers are not notified and the state is
    /// unchanged.
    #[tracing::instrument(name = "cart.store.dispatch", skip_all, fields(action = action.kind()))]
    pub fn dispatch(&mut self, action: CartAction) -> Result<Transition<'_>, CartError> {
        let outcome = match self.cart.apply(action) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "cart action rejected");

                return Err(err);
            }
        };

        let state = self.cart.state();

        debug!(
            lines = state.len(),
            items = state.item_count(),
            total = %state.total(),
            grand_total = %state.grand_total(),
            "cart action applied"
        );

        for observer in &mut self.observers {
            observer.on_change(state, &outcome);
        }

        Ok(Transition { state, outcome })
    }

    /// Build the checkout payload for the current cart.
    ///
    /// The cart is left as is; dispatch [`CartAction::Clear`] once the order is placed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to check out.
    pub fn checkout(&self) -> Result<OrderSummary, CheckoutError> {
        let summary = OrderSummary::from_cart(&self.cart)?;

        info!(
            items = summary.items.len(),
            grand_total = summary.grand_total,
            currency = %summary.currency,
            "checkout summary built"
        );

        Ok(summary)
    }

    /// Snapshot of the current cart for the host to persist.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_state(self.cart.state())
    }

    /// Replace the cart with one restored from a snapshot.
    ///
    /// The current palette is kept. Observers are not notified; they read the restored
    /// state on their next transition or through [`CartStore::state`].
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the snapshot is invalid; the current cart is kept.
    pub fn restore(&mut self, snapshot: CartSnapshot) -> Result<(), PersistenceError> {
        let cart = snapshot.restore(self.cart.palette().clone())?;

        info!(lines = cart.state().len(), "cart restored from snapshot");

        self.cart = cart;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::products::ProductVariant;

    use super::*;

    fn store() -> CartStore {
        CartStore::new(Cart::new(Money::from_minor(300, GBP)))
    }

    fn variant(id: &str, price: i64) -> ProductVariant {
        ProductVariant::new(id, id, Money::from_minor(price, GBP))
    }

    #[test]
    fn dispatch_returns_new_state() -> TestResult {
        let mut store = store();

        let transition = store.dispatch(CartAction::Add(variant("p1", 1200)))?;

        assert_eq!(transition.state.len(), 1);
        assert_eq!(transition.state.grand_total(), Money::from_minor(1500, GBP));

        Ok(())
    }

    #[test]
    fn observers_see_accepted_actions_only() -> TestResult {
        let mut store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        store.subscribe(move |state: &CartState, outcome: &CartOutcome| {
            if let Ok(mut sink) = sink.lock() {
                sink.push((state.item_count(), outcome.clone()));
            }
        });

        store.dispatch(CartAction::Add(variant("p1", 100)))?;
        let rejected = store.dispatch(CartAction::Add(variant("p2", -5))).map(|_| ());
        store.dispatch(CartAction::Clear)?;

        assert!(rejected.is_err());

        let seen = seen.lock().map_err(|err| err.to_string())?;
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen.first(), Some((1, CartOutcome::Added { .. }))));
        assert!(matches!(seen.get(1), Some((0, CartOutcome::Cleared { lines: 1 }))));

        Ok(())
    }

    #[test]
    fn checkout_of_empty_cart_fails() {
        let store = store();

        assert!(matches!(store.checkout(), Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn snapshot_and_restore_round_trip() -> TestResult {
        let mut store = store();
        store.dispatch(CartAction::Add(variant("p1", 100).with_quantity(2)))?;
        store.dispatch(CartAction::Add(variant("p2", 250).with_size("XL")))?;

        let snapshot = store.snapshot();
        let expected = store.state().clone();

        let mut restored = CartStore::new(Cart::new(Money::from_minor(300, GBP)));
        restored.restore(snapshot)?;

        assert_eq!(restored.state(), &expected);

        Ok(())
    }

    #[test]
    fn store_with_observers_moves_across_threads() -> TestResult {
        let mut store = store();
        let count = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&count);

        store.subscribe(move |_: &CartState, _: &CartOutcome| {
            if let Ok(mut count) = sink.lock() {
                *count += 1;
            }
        });

        let handle = std::thread::spawn(move || {
            store
                .dispatch(CartAction::Add(variant("p1", 100)))
                .map(|transition| transition.state.len())
        });

        let lines = handle.join().map_err(|_panic| "dispatch thread panicked")??;

        assert_eq!(lines, 1);
        assert_eq!(*count.lock().map_err(|err| err.to_string())?, 1);

        Ok(())
    }
}
