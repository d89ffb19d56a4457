//! Cart
//!
//! The cart engine applies [`CartAction`]s to a [`CartState`]. Each action is reduced
//! against the current state into a complete successor state, and only a successful
//! reduction replaces the current one. A rejected action therefore never leaves a partly
//! updated cart behind.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    colors::{Color, ColorError, ColorPalette},
    config::CartConfig,
    pricing::TotalsError,
    products::ProductVariant,
};

pub mod key;
pub mod line;
pub mod state;

use key::LineKey;
use line::CartLine;
use state::CartState;

/// Reasons a product variant cannot be added to the cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The product id is empty or blank.
    #[error("product id must not be empty")]
    EmptyId,

    /// The unit price is below zero (in minor units).
    #[error("price must not be negative, got {0} minor units")]
    NegativePrice(i64),

    /// An explicit quantity of zero was requested.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The price is in a different currency to the cart (price currency, cart currency).
    #[error("price is in {0}, but the cart is in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The selected colour could not be resolved.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Merging the quantity into an existing line would overflow.
    #[error("quantity for {0} exceeds the maximum line quantity")]
    QuantityOverflow(LineKey),
}

/// Errors returned by cart operations. The cart is unchanged whenever one is returned.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The action's input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No line with the given key is in the cart.
    #[error("no cart line for {0}")]
    NotFound(LineKey),

    /// Totals could not be computed for the resulting lines.
    #[error(transparent)]
    Totals(#[from] TotalsError),
}

/// Mutations a caller can request of the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add a variant, merging into an existing line with the same key.
    Add(ProductVariant),

    /// Add one unit to an existing line.
    Increment(LineKey),

    /// Take one unit from an existing line, removing it at zero.
    Decrement(LineKey),

    /// Remove a line outright. Absent keys are ignored.
    Remove(LineKey),

    /// Remove every line.
    Clear,
}

impl CartAction {
    /// Short name of the action, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CartAction::Add(_) => "add",
            CartAction::Increment(_) => "increment",
            CartAction::Decrement(_) => "decrement",
            CartAction::Remove(_) => "remove",
            CartAction::Clear => "clear",
        }
    }
}

/// What an applied action did, so callers can choose a UI reaction (a toast, a redirect)
/// after the state has changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    /// A variant was added.
    Added {
        /// Line the variant landed on
        key: LineKey,
        /// Line quantity after the add
        quantity: NonZeroU32,
        /// Whether an existing line absorbed the add
        merged: bool,
    },

    /// A line gained one unit.
    Incremented {
        /// Line that changed
        key: LineKey,
        /// Line quantity after the increment
        quantity: NonZeroU32,
    },

    /// A line lost one unit.
    Decremented {
        /// Line that changed
        key: LineKey,
        /// Line quantity after the decrement, zero when the line was removed
        quantity: u32,
    },

    /// A remove was applied.
    Removed {
        /// Key that was requested
        key: LineKey,
        /// Whether a line was actually deleted
        existed: bool,
    },

    /// The cart was emptied.
    Cleared {
        /// Number of lines dropped
        lines: usize,
    },
}

/// The cart engine: current state plus the palette used to resolve colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    state: CartState,
    palette: ColorPalette,
}

impl Cart {
    /// Create an empty cart with the standard colour palette.
    pub fn new(delivery_fee: Money<'static, Currency>) -> Self {
        Self::with_palette(delivery_fee, ColorPalette::standard())
    }

    /// Create an empty cart with a custom colour palette.
    pub fn with_palette(delivery_fee: Money<'static, Currency>, palette: ColorPalette) -> Self {
        Cart {
            state: CartState::new(delivery_fee),
            palette,
        }
    }

    /// Create an empty cart from pricing configuration.
    pub fn from_config(config: &CartConfig) -> Self {
        Self::with_palette(config.delivery_fee, config.palette.clone())
    }

    /// Current state
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Colour palette
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Build the key for a product, size and raw colour string.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id is blank or the colour cannot be resolved.
    pub fn key_for(
        &self,
        id: &str,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<LineKey, CartError> {
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId.into());
        }

        Ok(LineKey::new(id, size, self.resolve_color(color)?))
    }

    /// Build the key a variant would be stored under.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id is blank or the colour cannot be resolved.
    pub fn key_of(&self, variant: &ProductVariant) -> Result<LineKey, CartError> {
        self.key_for(
            &variant.id,
            variant.selected_size.as_deref(),
            variant.selected_color.as_deref(),
        )
    }

    fn resolve_color(&self, color: Option<&str>) -> Result<Option<Color>, ValidationError> {
        match color {
            Some(raw) => Ok(self.palette.normalize(raw)?),
            None => Ok(None),
        }
    }

    /// Apply an action, replacing the state only if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the action is rejected; the state is left unchanged.
    pub fn apply(&mut self, action: CartAction) -> Result<CartOutcome, CartError> {
        let (state, outcome) = self.reduce(action)?;

        self.state = state;

        Ok(outcome)
    }

    /// Compute the state an action would produce without applying it.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the action would be rejected.
    pub fn reduce(&self, action: CartAction) -> Result<(CartState, CartOutcome), CartError> {
        match action {
            CartAction::Add(variant) => self.reduce_add(variant),
            CartAction::Increment(key) => self.reduce_increment(key),
            CartAction::Decrement(key) => self.reduce_decrement(key),
            CartAction::Remove(key) => self.reduce_remove(key),
            CartAction::Clear => Ok((
                self.state.with_lines(Vec::new())?,
                CartOutcome::Cleared {
                    lines: self.state.len(),
                },
            )),
        }
    }

    /// Add a variant to the cart.
    ///
    /// Stock is not checked here; see [`CartState::remaining_stock`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] for a blank id, negative price, zero quantity,
    /// foreign currency or unresolvable colour.
    pub fn add(&mut self, variant: ProductVariant) -> Result<CartOutcome, CartError> {
        self.apply(CartAction::Add(variant))
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if no line has the key.
    pub fn increment_one(&mut self, key: LineKey) -> Result<CartOutcome, CartError> {
        self.apply(CartAction::Increment(key))
    }

    /// Take one unit from an existing line, removing the line when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if no line has the key.
    pub fn decrement_one(&mut self, key: LineKey) -> Result<CartOutcome, CartError> {
        self.apply(CartAction::Decrement(key))
    }

    /// Remove a line regardless of its quantity. Removing an absent key does nothing.
    ///
    /// # Errors
    ///
    /// Only fails if totals cannot be recomputed, which cannot happen for a subset of
    /// lines that already totalled.
    pub fn remove(&mut self, key: LineKey) -> Result<CartOutcome, CartError> {
        self.apply(CartAction::Remove(key))
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other actions.
    pub fn clear(&mut self) -> Result<CartOutcome, CartError> {
        self.apply(CartAction::Clear)
    }

    fn validate(
        &self,
        variant: &ProductVariant,
    ) -> Result<(LineKey, NonZeroU32), ValidationError> {
        if variant.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }

        let price_currency = variant.price.currency();

        if price_currency != self.state.currency() {
            return Err(ValidationError::CurrencyMismatch(
                price_currency.iso_alpha_code,
                self.state.currency().iso_alpha_code,
            ));
        }

        let price_minor = variant.price.to_minor_units();

        if price_minor < 0 {
            return Err(ValidationError::NegativePrice(price_minor));
        }

        let quantity = match variant.quantity {
            None => NonZeroU32::MIN,
            Some(quantity) => NonZeroU32::new(quantity).ok_or(ValidationError::ZeroQuantity)?,
        };

        let color = self.resolve_color(variant.selected_color.as_deref())?;

        let key = LineKey::new(&variant.id, variant.selected_size.as_deref(), color);

        Ok((key, quantity))
    }

    fn reduce_add(&self, variant: ProductVariant) -> Result<(CartState, CartOutcome), CartError> {
        let (key, quantity) = self.validate(&variant)?;

        let mut lines = self.state.lines().to_vec();

        let (quantity, merged) = match lines.iter_mut().find(|line| line.key() == &key) {
            Some(line) => {
                let merged = line
                    .quantity()
                    .checked_add(quantity.get())
                    .ok_or_else(|| ValidationError::QuantityOverflow(key.clone()))?;

                line.set_quantity(merged);

                (merged, true)
            }
            None => {
                lines.push(CartLine::new(
                    key.clone(),
                    variant.name,
                    variant.image,
                    variant.price,
                    quantity,
                ));

                (quantity, false)
            }
        };

        Ok((
            self.state.with_lines(lines)?,
            CartOutcome::Added {
                key,
                quantity,
                merged,
            },
        ))
    }

    fn reduce_increment(&self, key: LineKey) -> Result<(CartState, CartOutcome), CartError> {
        let mut lines = self.state.lines().to_vec();

        let line = lines
            .iter_mut()
            .find(|line| line.key() == &key)
            .ok_or_else(|| CartError::NotFound(key.clone()))?;

        let quantity = line
            .quantity()
            .checked_add(1)
            .ok_or_else(|| ValidationError::QuantityOverflow(key.clone()))?;

        line.set_quantity(quantity);

        Ok((
            self.state.with_lines(lines)?,
            CartOutcome::Incremented { key, quantity },
        ))
    }

    fn reduce_decrement(&self, key: LineKey) -> Result<(CartState, CartOutcome), CartError> {
        let mut lines = self.state.lines().to_vec();

        let line = lines
            .iter_mut()
            .find(|line| line.key() == &key)
            .ok_or_else(|| CartError::NotFound(key.clone()))?;

        let remaining = line.quantity().get() - 1;

        match NonZeroU32::new(remaining) {
            Some(quantity) => line.set_quantity(quantity),
            None => lines.retain(|line| line.key() != &key),
        }

        Ok((
            self.state.with_lines(lines)?,
            CartOutcome::Decremented {
                key,
                quantity: remaining,
            },
        ))
    }

    fn reduce_remove(&self, key: LineKey) -> Result<(CartState, CartOutcome), CartError> {
        let mut lines = self.state.lines().to_vec();

        let before = lines.len();
        lines.retain(|line| line.key() != &key);
        let existed = lines.len() != before;

        Ok((
            self.state.with_lines(lines)?,
            CartOutcome::Removed { key, existed },
        ))
    }
}
