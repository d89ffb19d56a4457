//! Configuration
//!
//! Pricing configuration is read from YAML:
//!
//! ```yaml
//! delivery_fee: "4.99 GBP"
//! colors:
//!   - { id: black, name: Black, hex: "#000000" }
//!   - { id: sage, name: Sage Green, hex: "#9caf88" }
//! ```
//!
//! When `colors` is omitted the standard palette is used.

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::colors::{ColorError, ColorPalette};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading a config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid colour swatch
    #[error("Invalid colour {id}: {source}")]
    InvalidColor {
        /// Swatch id as written in the file
        id: String,

        /// Why the swatch was rejected
        source: ColorError,
    },
}

/// Colour swatch as written in YAML
#[derive(Debug, Deserialize)]
pub struct SwatchFile {
    /// Canonical id
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional hex code
    #[serde(default)]
    pub hex: Option<String>,
}

/// Pricing configuration as written in YAML
#[derive(Debug, Deserialize)]
pub struct CartConfigFile {
    /// Delivery fee (e.g., "4.99 GBP")
    pub delivery_fee: String,

    /// Colour palette, replacing the standard one when present
    #[serde(default)]
    pub colors: Option<Vec<SwatchFile>>,
}

/// Pricing configuration for a cart.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Flat delivery fee; its currency is the cart currency
    pub delivery_fee: Money<'static, Currency>,

    /// Colour palette
    pub palette: ColorPalette,
}

impl CartConfig {
    /// Create a configuration with the standard palette.
    pub fn new(delivery_fee: Money<'static, Currency>) -> Self {
        Self {
            delivery_fee,
            palette: ColorPalette::standard(),
        }
    }

    /// Parse a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, the fee is not a valid non-negative
    /// price, or a colour swatch is invalid.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: CartConfigFile = serde_norway::from_str(contents)?;

        file.try_into()
    }

    /// Load a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Cart currency
    pub fn currency(&self) -> &'static Currency {
        self.delivery_fee.currency()
    }
}

impl TryFrom<CartConfigFile> for CartConfig {
    type Error = ConfigError;

    fn try_from(file: CartConfigFile) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&file.delivery_fee)?;

        if minor_units < 0 {
            return Err(ConfigError::InvalidPrice(format!(
                "Delivery fee must not be negative, got: {}",
                file.delivery_fee
            )));
        }

        let palette = match file.colors {
            None => ColorPalette::standard(),
            Some(swatches) => {
                let mut palette = ColorPalette::empty();

                for swatch in swatches {
                    palette
                        .insert(&swatch.id, &swatch.name, swatch.hex.as_deref())
                        .map_err(|source| ConfigError::InvalidColor {
                            id: swatch.id.clone(),
                            source,
                        })?;
                }

                palette
            }
        };

        Ok(CartConfig {
            delivery_fee: Money::from_minor(minor_units, currency),
            palette,
        })
    }
}

/// Look up a supported currency by ISO code.
pub fn parse_currency(code: &str) -> Option<&'static Currency> {
    match code {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), ConfigError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(ConfigError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| ConfigError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| ConfigError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)
        .ok_or_else(|| ConfigError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((minor_units, currency))
}
