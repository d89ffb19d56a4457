//! Pricing
//!
//! [`compute_totals`] is the only place cart totals are derived. Every cart transition runs
//! it before the new state is published, so callers read totals from the state rather than
//! adding up lines themselves.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::line::CartLine;

/// Errors that can occur while calculating cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// A line total or the cart total does not fit in minor units.
    #[error("cart total overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Derived monetary values of a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    total: Money<'static, Currency>,
    delivery_fee: Money<'static, Currency>,
    grand_total: Money<'static, Currency>,
}

impl Totals {
    /// Totals of a cart with no lines.
    pub(crate) fn empty(delivery_fee: Money<'static, Currency>) -> Self {
        Self {
            total: Money::from_minor(0, delivery_fee.currency()),
            delivery_fee,
            grand_total: delivery_fee,
        }
    }

    /// Sum of `price * quantity` over all lines
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Flat delivery fee
    pub fn delivery_fee(&self) -> Money<'static, Currency> {
        self.delivery_fee
    }

    /// Total plus delivery fee
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.grand_total
    }
}

/// Calculates the totals for a set of cart lines.
///
/// All lines must share the delivery fee's currency.
///
/// # Errors
///
/// - [`TotalsError::Money`]: a line is priced in another currency.
/// - [`TotalsError::Overflow`]: a line total or the sum overflows.
pub fn compute_totals(
    lines: &[CartLine],
    delivery_fee: Money<'static, Currency>,
) -> Result<Totals, TotalsError> {
    let currency = delivery_fee.currency();

    let total_minor = lines.iter().try_fold(0_i64, |acc, line| {
        let line_currency = line.price().currency();

        if line_currency != currency {
            return Err(TotalsError::Money(MoneyError::CurrencyMismatch {
                expected: currency.iso_alpha_code,
                actual: line_currency.iso_alpha_code,
            }));
        }

        acc.checked_add(line.line_total_minor()?)
            .ok_or(TotalsError::Overflow)
    })?;

    let grand_total_minor = total_minor
        .checked_add(delivery_fee.to_minor_units())
        .ok_or(TotalsError::Overflow)?;

    Ok(Totals {
        total: Money::from_minor(total_minor, currency),
        delivery_fee,
        grand_total: Money::from_minor(grand_total_minor, currency),
    })
}
