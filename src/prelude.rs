//! Storefront cart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartAction, CartError, CartOutcome, ValidationError, key::LineKey, line::CartLine,
        state::CartState,
    },
    checkout::{CheckoutError, OrderLine, OrderSummary},
    colors::{Color, ColorError, ColorPalette},
    config::{CartConfig, ConfigError},
    persistence::{CartSnapshot, PersistenceError},
    pricing::{Totals, TotalsError, compute_totals},
    products::ProductVariant,
    receipt::{Receipt, ReceiptError},
    replay::{ActionLog, ReplayError},
    store::{CartObserver, CartStore, Transition},
};
