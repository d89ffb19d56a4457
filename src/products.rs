//! Products

use rusty_money::{Money, iso::Currency};

/// A product as selected on a product page, ready to be added to the cart.
///
/// The cart does not own variants; it copies what it needs into a
/// [`CartLine`](crate::cart::line::CartLine).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product image URL
    pub image: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Requested quantity, `None` meaning one
    pub quantity: Option<u32>,

    /// Selected size, if the product has sizes
    pub selected_size: Option<String>,

    /// Selected colour as a display name or hex code
    pub selected_color: Option<String>,
}

impl ProductVariant {
    /// Create a variant with no size, colour, image or explicit quantity.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money<'static, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            price,
            quantity: None,
            selected_size: None,
            selected_color: None,
        }
    }

    /// Set the requested quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the selected size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.selected_size = Some(size.into());
        self
    }

    /// Set the selected colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.selected_color = Some(color.into());
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}
