//! Line keys

use std::fmt;

use crate::colors::Color;

/// Identity of a cart line: product, size and colour.
///
/// Two additions with the same key land on the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    product: String,
    size: Option<String>,
    color: Option<Color>,
}

impl LineKey {
    /// Create a key from already normalized parts.
    ///
    /// Product ids and sizes are trimmed and a blank size is treated as no size.
    pub fn new(product: &str, size: Option<&str>, color: Option<Color>) -> Self {
        Self {
            product: product.trim().to_string(),
            size: normalize_size(size),
            color,
        }
    }

    /// Product identifier
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Selected size
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Selected colour
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.product,
            self.size.as_deref().unwrap_or("-"),
            self.color.as_ref().map_or("-", Color::as_str)
        )
    }
}

fn normalize_size(size: Option<&str>) -> Option<String> {
    size.map(str::trim)
        .filter(|size| !size.is_empty())
        .map(str::to_string)
}
