//! Storefront Cart
//!
//! The shopping cart state engine behind a storefront: lines keyed by product, size and
//! colour, totals and delivery fees recomputed on every change, and the checkout payload
//! built from them.

pub mod cart;
pub mod checkout;
pub mod cli;
pub mod colors;
pub mod config;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod replay;
pub mod store;
