//! Cart state

use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{key::LineKey, line::CartLine},
    pricing::{Totals, TotalsError, compute_totals},
};

/// Snapshot of the cart: its lines and the totals derived from them.
///
/// A `CartState` is only ever built through [`compute_totals`], so its totals always match
/// its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
    totals: Totals,
}

impl CartState {
    /// Create an empty cart charging the given delivery fee.
    ///
    /// The delivery fee's currency becomes the cart currency.
    pub fn new(delivery_fee: Money<'static, Currency>) -> Self {
        Self {
            lines: Vec::new(),
            totals: Totals::empty(delivery_fee),
        }
    }

    /// Build the successor state holding `lines`.
    pub(crate) fn with_lines(&self, lines: Vec<CartLine>) -> Result<Self, TotalsError> {
        let totals = compute_totals(&lines, self.delivery_fee())?;

        Ok(Self { lines, totals })
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Get the line with the given key.
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key() == key)
    }

    /// Quantity of the given key in the cart, zero if absent.
    pub fn quantity_of(&self, key: &LineKey) -> u32 {
        self.line(key).map_or(0, |line| line.quantity().get())
    }

    /// How many more units of `key` can be added without exceeding `stock`.
    ///
    /// The cart itself never enforces stock; callers that know a stock level check this
    /// before dispatching an add.
    pub fn remaining_stock(&self, key: &LineKey, stock: u32) -> u32 {
        stock.saturating_sub(self.quantity_of(key))
    }

    /// Total number of units across all lines, as shown on a cart badge.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cart currency
    pub fn currency(&self) -> &'static Currency {
        self.totals.delivery_fee().currency()
    }

    /// Derived totals
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Sum of `price * quantity` over all lines
    pub fn total(&self) -> Money<'static, Currency> {
        self.totals.total()
    }

    /// Flat delivery fee
    pub fn delivery_fee(&self) -> Money<'static, Currency> {
        self.totals.delivery_fee()
    }

    /// Total plus delivery fee
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.totals.grand_total()
    }
}
