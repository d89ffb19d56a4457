//! Checkout
//!
//! The order summary is the payload handed to order placement and billing. Amounts are in
//! minor units of `currency`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::Cart, colors::Color, pricing::TotalsError};

/// Errors that can occur while building an order summary.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There are no lines to order.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// A line total could not be computed.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// The summary could not be encoded.
    #[error("failed to encode order summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// One cart line as it appears in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product image URL
    pub image: String,

    /// Unit price
    pub price: i64,

    /// Quantity ordered
    pub quantity: u32,

    /// Selected size
    pub selected_size: Option<String>,

    /// Canonical colour id
    pub selected_color: Option<Color>,

    /// Colour display name
    pub color_name: Option<String>,

    /// Unit price multiplied by quantity
    pub line_total: i64,
}

/// Order payload built from the cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Lines in cart order
    pub items: Vec<OrderLine>,

    /// Sum of line totals
    pub subtotal: i64,

    /// Flat delivery fee
    pub delivery_fee: i64,

    /// Subtotal plus delivery fee
    pub grand_total: i64,

    /// ISO 4217 currency code
    pub currency: String,
}

impl OrderSummary {
    /// Build a summary from the cart's current lines and totals.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn from_cart(cart: &Cart) -> Result<Self, CheckoutError> {
        let state = cart.state();

        if state.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let palette = cart.palette();

        let items = state
            .iter()
            .map(|line| {
                let key = line.key();

                Ok::<_, TotalsError>(OrderLine {
                    id: key.product().to_string(),
                    name: line.name().to_string(),
                    image: line.image().to_string(),
                    price: line.price().to_minor_units(),
                    quantity: line.quantity().get(),
                    selected_size: key.size().map(str::to_string),
                    selected_color: key.color().cloned(),
                    color_name: key
                        .color()
                        .map(|color| palette.display_name(color).to_string()),
                    line_total: line.line_total_minor()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderSummary {
            items,
            subtotal: state.total().to_minor_units(),
            delivery_fee: state.delivery_fee().to_minor_units(),
            grand_total: state.grand_total().to_minor_units(),
            currency: state.currency().iso_alpha_code.to_string(),
        })
    }

    /// Encode the summary as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, CheckoutError> {
        Ok(serde_json::to_string(self)?)
    }
}
