//! Persistence
//!
//! Hooks for hosts that keep the cart across page loads. A [`CartSnapshot`] holds lines and
//! the delivery fee only; totals are recomputed when it is restored. Restoring replays each
//! stored line through [`Cart::add`], so a snapshot that was edited by hand still produces
//! a cart that satisfies every invariant (or is rejected).

use std::io;

use rusty_money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, state::CartState},
    colors::{Color, ColorPalette},
    config::parse_currency,
    products::ProductVariant,
};

/// Errors that can occur while saving or restoring a snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// JSON encoding or decoding error
    #[error("Invalid cart snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot names a currency this crate does not support.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The stored delivery fee is negative.
    #[error("Delivery fee must not be negative, got {0}")]
    NegativeDeliveryFee(i64),

    /// A stored line was rejected by the cart.
    #[error("Invalid line {index} in cart snapshot: {source}")]
    Line {
        /// Position of the line in the snapshot
        index: usize,

        /// Why the cart rejected it
        source: CartError,
    },
}

/// A stored cart line. Prices are in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLine {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product image URL
    #[serde(default)]
    pub image: String,

    /// Unit price
    pub price: i64,

    /// Quantity
    pub quantity: u32,

    /// Selected size
    #[serde(default)]
    pub selected_size: Option<String>,

    /// Canonical colour id
    #[serde(default)]
    pub selected_color: Option<Color>,
}

/// Serializable cart contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// ISO 4217 currency code
    pub currency: String,

    /// Lines in cart order
    pub lines: Vec<SnapshotLine>,

    /// Flat delivery fee
    pub delivery_fee: i64,
}

impl CartSnapshot {
    /// Capture the contents of a cart state.
    pub fn from_state(state: &CartState) -> Self {
        let lines = state
            .iter()
            .map(|line| SnapshotLine {
                id: line.key().product().to_string(),
                name: line.name().to_string(),
                image: line.image().to_string(),
                price: line.price().to_minor_units(),
                quantity: line.quantity().get(),
                selected_size: line.key().size().map(str::to_string),
                selected_color: line.key().color().cloned(),
            })
            .collect();

        Self {
            currency: state.currency().iso_alpha_code.to_string(),
            lines,
            delivery_fee: state.delivery_fee().to_minor_units(),
        }
    }

    /// Encode the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if the JSON does not describe a snapshot.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if encoding or writing fails.
    pub fn write_to(&self, out: impl io::Write) -> Result<(), PersistenceError> {
        Ok(serde_json::to_writer_pretty(out, self)?)
    }

    /// Read a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if reading or decoding fails.
    pub fn read_from(input: impl io::Read) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_reader(input)?)
    }

    /// Rebuild a cart from the snapshot, recomputing all totals.
    ///
    /// Lines that share a key are merged.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] for an unknown currency, a negative delivery fee or
    /// any line the cart rejects.
    pub fn restore(self, palette: ColorPalette) -> Result<Cart, PersistenceError> {
        let currency = parse_currency(&self.currency)
            .ok_or_else(|| PersistenceError::UnknownCurrency(self.currency.clone()))?;

        if self.delivery_fee < 0 {
            return Err(PersistenceError::NegativeDeliveryFee(self.delivery_fee));
        }

        let mut cart = Cart::with_palette(Money::from_minor(self.delivery_fee, currency), palette);

        for (index, line) in self.lines.into_iter().enumerate() {
            let variant = ProductVariant {
                id: line.id,
                name: line.name,
                image: line.image,
                price: Money::from_minor(line.price, currency),
                quantity: Some(line.quantity),
                selected_size: line.selected_size,
                selected_color: line.selected_color.map(|color| color.to_string()),
            };

            cart.add(variant)
                .map_err(|source| PersistenceError::Line { index, source })?;
        }

        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::cart::ValidationError;

    use super::*;

    fn snapshot_json(lines: &str) -> String {
        format!(r#"{{"currency":"GBP","deliveryFee":250,"lines":[{lines}]}}"#)
    }

    #[test]
    fn restore_recomputes_totals() -> TestResult {
        let json = snapshot_json(
            r#"{"id":"p1","name":"Tee","image":"","price":1500,"quantity":2,"selectedSize":"M","selectedColor":"navy-blue"}"#,
        );

        let cart = CartSnapshot::from_json(&json)?.restore(ColorPalette::standard())?;

        assert_eq!(cart.state().total(), Money::from_minor(3000, GBP));
        assert_eq!(cart.state().grand_total(), Money::from_minor(3250, GBP));

        let key = cart.key_for("p1", Some("M"), Some("#000080"))?;
        assert_eq!(cart.state().quantity_of(&key), 2);

        Ok(())
    }

    #[test]
    fn stored_totals_are_ignored() -> TestResult {
        let json = r#"{"currency":"GBP","deliveryFee":0,"total":99999,"grandTotal":99999,"lines":[{"id":"p1","name":"Tee","price":100,"quantity":1}]}"#;

        let cart = CartSnapshot::from_json(json)?.restore(ColorPalette::standard())?;

        assert_eq!(cart.state().total(), Money::from_minor(100, GBP));

        Ok(())
    }

    #[test]
    fn duplicate_lines_are_merged() -> TestResult {
        let json = snapshot_json(
            r#"{"id":"p1","name":"Tee","price":100,"quantity":1},{"id":"p1","name":"Tee","price":100,"quantity":2}"#,
        );

        let cart = CartSnapshot::from_json(&json)?.restore(ColorPalette::standard())?;

        assert_eq!(cart.state().len(), 1);
        assert_eq!(cart.state().item_count(), 3);

        Ok(())
    }

    #[test]
    fn zero_quantity_line_is_rejected() -> TestResult {
        let json = snapshot_json(r#"{"id":"p1","name":"Tee","price":100,"quantity":0}"#);

        let result = CartSnapshot::from_json(&json)?.restore(ColorPalette::standard());

        assert!(matches!(
            result,
            Err(PersistenceError::Line {
                index: 0,
                source: CartError::Validation(ValidationError::ZeroQuantity)
            })
        ));

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let json = r#"{"currency":"XYZ","deliveryFee":0,"lines":[]}"#;

        let result = CartSnapshot::from_json(json)?.restore(ColorPalette::standard());

        assert!(matches!(result, Err(PersistenceError::UnknownCurrency(code)) if code == "XYZ"));

        Ok(())
    }

    #[test]
    fn negative_delivery_fee_is_rejected() -> TestResult {
        let json = r#"{"currency":"GBP","deliveryFee":-1,"lines":[]}"#;

        let result = CartSnapshot::from_json(json)?.restore(ColorPalette::standard());

        assert!(matches!(result, Err(PersistenceError::NegativeDeliveryFee(-1))));

        Ok(())
    }

    #[test]
    fn custom_palette_round_trip_keeps_line_colors() -> TestResult {
        let mut palette = ColorPalette::empty();
        palette.insert("sage", "Sage", Some("#9caf88"))?;
        palette.insert("olive", "Olive Drab", Some("#6b8e23"))?;

        let mut cart = Cart::with_palette(Money::from_minor(0, GBP), palette.clone());
        cart.add(ProductVariant::new("p1", "Tee", Money::from_minor(100, GBP)).with_color("#9caf88"))?;
        cart.add(ProductVariant::new("p1", "Tee", Money::from_minor(100, GBP)).with_color("Olive Drab"))?;

        let json = CartSnapshot::from_state(cart.state()).to_json()?;
        let restored = CartSnapshot::from_json(&json)?.restore(palette)?;

        let colors: Vec<Option<&str>> = restored
            .state()
            .iter()
            .map(|line| line.key().color().map(Color::as_str))
            .collect();

        assert_eq!(colors, vec![Some("sage"), Some("olive")]);
        assert_eq!(restored.state(), cart.state());

        Ok(())
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            CartSnapshot::from_json("{"),
            Err(PersistenceError::Json(_))
        ));
    }
}
