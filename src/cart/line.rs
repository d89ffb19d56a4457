//! Cart lines

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};

use crate::{cart::key::LineKey, pricing::TotalsError};

/// A product variant held in the cart with a positive quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    key: LineKey,
    name: String,
    image: String,
    price: Money<'static, Currency>,
    quantity: NonZeroU32,
}

impl CartLine {
    pub(crate) fn new(
        key: LineKey,
        name: String,
        image: String,
        price: Money<'static, Currency>,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            key,
            name,
            image,
            price,
            quantity,
        }
    }

    /// Line identity
    pub fn key(&self) -> &LineKey {
        &self.key
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product image URL
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Unit price
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Quantity in the cart
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    /// Unit price multiplied by quantity, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsError::Overflow`] if the product does not fit in an `i64`.
    pub fn line_total_minor(&self) -> Result<i64, TotalsError> {
        self.price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity.get()))
            .ok_or(TotalsError::Overflow)
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsError::Overflow`] if the product does not fit in an `i64`.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, TotalsError> {
        Ok(Money::from_minor(
            self.line_total_minor()?,
            self.price.currency(),
        ))
    }
}
