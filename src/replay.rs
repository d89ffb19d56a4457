//! Action replay
//!
//! A cart is a pure function of the actions applied to it, so a session can be reproduced
//! from a YAML action log:
//!
//! ```yaml
//! actions:
//!   - { action: add, id: p1, name: Tee, price: "15.00 GBP", quantity: 2, size: M, color: "#000080" }
//!   - { action: increment, id: p1, size: M, color: navy blue }
//!   - { action: remove, id: p1, size: M, color: navy-blue }
//!   - { action: clear }
//! ```

use std::{fs, path::Path};

use rusty_money::Money;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::{Cart, CartAction, CartError},
    config::{ConfigError, parse_price},
    products::ProductVariant,
    store::CartStore,
};

/// Errors that can occur while loading or replaying an action log.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// IO error reading the log
    #[error("Failed to read action log: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// An action's price could not be parsed.
    #[error("Invalid action {index}: {source}")]
    Price {
        /// Position of the action in the log
        index: usize,

        /// Parse failure
        source: ConfigError,
    },

    /// The cart rejected an action.
    #[error("Action {index} ({kind}) rejected: {source}")]
    Rejected {
        /// Position of the action in the log
        index: usize,

        /// Action name
        kind: &'static str,

        /// Why the cart rejected it
        source: CartError,
    },
}

/// A product variant as written in an action log.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    /// Product identifier
    pub id: String,

    /// Product name
    #[serde(default)]
    pub name: String,

    /// Product image URL
    #[serde(default)]
    pub image: String,

    /// Unit price (e.g., "15.00 GBP")
    pub price: String,

    /// Requested quantity
    #[serde(default)]
    pub quantity: Option<u32>,

    /// Selected size
    #[serde(default)]
    pub size: Option<String>,

    /// Selected colour as a name or hex code
    #[serde(default)]
    pub color: Option<String>,
}

/// A line key as written in an action log.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRecord {
    /// Product identifier
    pub id: String,

    /// Selected size
    #[serde(default)]
    pub size: Option<String>,

    /// Selected colour as a name or hex code
    #[serde(default)]
    pub color: Option<String>,
}

/// A single logged action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRecord {
    /// Add a variant
    Add(VariantRecord),

    /// Add one unit to a line
    Increment(KeyRecord),

    /// Take one unit from a line
    Decrement(KeyRecord),

    /// Remove a line
    Remove(KeyRecord),

    /// Empty the cart
    Clear,
}

impl ActionRecord {
    /// Convert the record into a cart action, resolving keys against `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Price`] for a malformed price and [`ReplayError::Rejected`]
    /// for a key the cart cannot resolve.
    pub fn into_action(self, index: usize, cart: &Cart) -> Result<CartAction, ReplayError> {
        let key = |record: KeyRecord, kind: &'static str| {
            cart.key_for(&record.id, record.size.as_deref(), record.color.as_deref())
                .map_err(|source| ReplayError::Rejected {
                    index,
                    kind,
                    source,
                })
        };

        match self {
            ActionRecord::Add(record) => {
                let (minor_units, currency) = parse_price(&record.price)
                    .map_err(|source| ReplayError::Price { index, source })?;

                Ok(CartAction::Add(ProductVariant {
                    id: record.id,
                    name: record.name,
                    image: record.image,
                    price: Money::from_minor(minor_units, currency),
                    quantity: record.quantity,
                    selected_size: record.size,
                    selected_color: record.color,
                }))
            }
            ActionRecord::Increment(record) => Ok(CartAction::Increment(key(record, "increment")?)),
            ActionRecord::Decrement(record) => Ok(CartAction::Decrement(key(record, "decrement")?)),
            ActionRecord::Remove(record) => Ok(CartAction::Remove(key(record, "remove")?)),
            ActionRecord::Clear => Ok(CartAction::Clear),
        }
    }
}

/// An ordered list of actions.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionLog {
    /// Actions in the order they were performed
    pub actions: Vec<ActionRecord>,
}

impl ActionLog {
    /// Parse an action log from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Yaml`] if the YAML does not describe an action log.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ReplayError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Load an action log from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Dispatch every action to the store in order, stopping at the first rejection.
    ///
    /// Returns the number of actions applied.
    ///
    /// # Errors
    ///
    /// Returns a [`ReplayError`] naming the first action that could not be applied. Actions
    /// before it remain applied.
    pub fn replay(self, store: &mut CartStore) -> Result<usize, ReplayError> {
        let mut applied = 0;

        for (index, record) in self.actions.into_iter().enumerate() {
            let action = record.into_action(index, store.cart())?;
            let kind = action.kind();

            store
                .dispatch(action)
                .map_err(|source| ReplayError::Rejected {
                    index,
                    kind,
                    source,
                })?;

            applied += 1;
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::cart::ValidationError;

    use super::*;

    fn store() -> CartStore {
        CartStore::new(Cart::new(Money::from_minor(0, GBP)))
    }

    #[test]
    fn replays_actions_in_order() -> TestResult {
        let log = ActionLog::from_yaml_str(
            r##"
actions:
  - { action: add, id: p1, name: Tee, price: "15.00 GBP", quantity: 2, size: M, color: "#000080" }
  - { action: increment, id: p1, size: M, color: Navy Blue }
  - { action: add, id: p2, name: Cap, price: "8.00 GBP" }
  - { action: decrement, id: p2 }
"##,
        )?;

        let mut store = store();

        assert_eq!(log.replay(&mut store)?, 4);
        assert_eq!(store.state().len(), 1);
        assert_eq!(store.state().item_count(), 3);
        assert_eq!(store.state().total(), Money::from_minor(4500, GBP));

        Ok(())
    }

    #[test]
    fn clear_needs_no_fields() -> TestResult {
        let log = ActionLog::from_yaml_str(
            r#"
actions:
  - { action: add, id: p1, price: "1.00 GBP" }
  - action: clear
"#,
        )?;

        let mut store = store();
        log.replay(&mut store)?;

        assert!(store.state().is_empty());

        Ok(())
    }

    #[test]
    fn replay_stops_at_first_rejection() -> TestResult {
        let log = ActionLog::from_yaml_str(
            r#"
actions:
  - { action: add, id: p1, price: "1.00 GBP" }
  - { action: add, id: p2, price: "-1.00 GBP" }
  - { action: add, id: p3, price: "1.00 GBP" }
"#,
        )?;

        let mut store = store();
        let result = log.replay(&mut store);

        assert!(matches!(
            result,
            Err(ReplayError::Rejected {
                index: 1,
                kind: "add",
                source: CartError::Validation(ValidationError::NegativePrice(-100)),
            })
        ));
        assert_eq!(store.state().len(), 1);

        Ok(())
    }

    #[test]
    fn bad_price_is_reported_with_index() -> TestResult {
        let log = ActionLog::from_yaml_str(
            r#"
actions:
  - { action: add, id: p1, price: "1.00" }
"#,
        )?;

        let result = log.replay(&mut store());

        assert!(matches!(result, Err(ReplayError::Price { index: 0, .. })));

        Ok(())
    }

    #[test]
    fn unknown_action_fails_to_parse() {
        let result = ActionLog::from_yaml_str("actions:\n  - { action: teleport }\n");

        assert!(matches!(result, Err(ReplayError::Yaml(_))));
    }
}
