//! Colours
//!
//! Cart lines identify a colour by a stable [`Color`] id rather than whatever string the
//! caller happened to hold. Product pages tend to pass hex codes from swatches while the
//! cart drawer passes display names; [`ColorPalette::normalize`] resolves both to the same
//! id so that the two end up on the same cart line.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while resolving or registering colours.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    /// A well-formed hex code that is not part of the palette.
    #[error("unknown colour code {0}")]
    UnknownCode(String),

    /// A string starting with `#` that is not a 3 or 6 digit hex code.
    #[error("malformed colour code {0}")]
    MalformedCode(String),

    /// A swatch id or hex code registered twice.
    #[error("colour {0} is already defined")]
    Duplicate(String),

    /// A swatch whose id is empty once slugified.
    #[error("colour id must not be empty")]
    EmptyId,
}

/// Canonical colour identifier (a lowercase slug such as `navy-blue`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A lookup table of known colours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorPalette {
    /// Display names keyed by canonical id.
    names: FxHashMap<Color, String>,

    /// Canonical `#rrggbb` codes mapped to ids.
    hex_codes: FxHashMap<String, Color>,

    /// Slugified ids and display names mapped to ids.
    aliases: FxHashMap<String, Color>,
}

const STANDARD_SWATCHES: [(&str, &str, &str); 12] = [
    ("black", "Black", "#000000"),
    ("white", "White", "#ffffff"),
    ("red", "Red", "#ff0000"),
    ("green", "Green", "#008000"),
    ("blue", "Blue", "#0000ff"),
    ("navy-blue", "Navy Blue", "#000080"),
    ("yellow", "Yellow", "#ffff00"),
    ("orange", "Orange", "#ffa500"),
    ("pink", "Pink", "#ffc0cb"),
    ("grey", "Grey", "#808080"),
    ("brown", "Brown", "#a52a2a"),
    ("beige", "Beige", "#f5f5dc"),
];

impl ColorPalette {
    /// Create a palette with no colours.
    ///
    /// Names still normalize to slugs, but every hex code is rejected.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create the built-in palette of common apparel colours.
    #[must_use]
    pub fn standard() -> Self {
        let mut palette = Self::empty();

        for (id, name, hex) in STANDARD_SWATCHES {
            palette.register(Color(id.to_string()), name, Some(hex.to_string()));
        }

        palette
    }

    /// Add a swatch to the palette, returning its canonical id.
    ///
    /// # Errors
    ///
    /// - [`ColorError::EmptyId`]: the id has no usable characters.
    /// - [`ColorError::MalformedCode`]: `hex` is not a 3 or 6 digit code.
    /// - [`ColorError::Duplicate`]: the id, hex code or name already resolves to a colour.
    pub fn insert(&mut self, id: &str, name: &str, hex: Option<&str>) -> Result<Color, ColorError> {
        let slug = slugify(id);

        if slug.is_empty() {
            return Err(ColorError::EmptyId);
        }

        let color = Color(slug);

        if self.names.contains_key(&color) {
            return Err(ColorError::Duplicate(color.0));
        }

        let hex = hex.map(canonical_hex).transpose()?;

        if let Some(code) = &hex {
            if self.hex_codes.contains_key(code) {
                return Err(ColorError::Duplicate(code.clone()));
            }
        }

        // An alias may only ever resolve to one colour.
        for alias in [color.0.clone(), slugify(name)] {
            if self.aliases.contains_key(&alias) {
                return Err(ColorError::Duplicate(alias));
            }
        }

        self.register(color.clone(), name, hex);

        Ok(color)
    }

    fn register(&mut self, color: Color, name: &str, hex: Option<String>) {
        if let Some(code) = hex {
            self.hex_codes.insert(code, color.clone());
        }

        let name_slug = slugify(name);

        if !name_slug.is_empty() {
            self.aliases.insert(name_slug, color.clone());
        }

        self.aliases.insert(color.0.clone(), color.clone());
        self.names.insert(color, name.to_string());
    }

    /// Resolve a caller-supplied colour string to its canonical id.
    ///
    /// Blank input means "no colour" and yields `None`. Hex codes must be in the palette;
    /// names that are not in the palette are accepted as their slug.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::MalformedCode`] or [`ColorError::UnknownCode`] for hex input
    /// that cannot be resolved.
    pub fn normalize(&self, raw: &str) -> Result<Option<Color>, ColorError> {
        let trimmed = raw.trim();

        if trimmed.starts_with('#') {
            let code = canonical_hex(trimmed)?;

            return self
                .hex_codes
                .get(&code)
                .cloned()
                .map(Some)
                .ok_or_else(|| ColorError::UnknownCode(trimmed.to_string()));
        }

        let slug = slugify(trimmed);

        if slug.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.aliases.get(&slug).cloned().unwrap_or(Color(slug))))
    }

    /// Display name for a colour, falling back to its id for unlisted colours.
    pub fn display_name<'p>(&'p self, color: &'p Color) -> &'p str {
        self.names.get(color).map_or(color.as_str(), String::as_str)
    }

    /// Number of swatches in the palette.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the palette has no swatches.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn canonical_hex(raw: &str) -> Result<String, ColorError> {
    let digits = raw.trim().trim_start_matches('#');

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::MalformedCode(raw.to_string()));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(ColorError::MalformedCode(raw.to_string())),
    };

    Ok(format!("#{}", expanded.to_ascii_lowercase()))
}

fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }

            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}
