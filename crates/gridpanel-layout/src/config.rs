#![forbid(unsafe_code)]

//! Panel configuration and per-item placement values.
//!
//! Both structs are plain data. The coercion functions in this module are
//! the single definition of the legal range of every field: the runtime's
//! attribute descriptors call them on write, and [`PanelConfig::sanitized`]
//! / [`ItemPlacement::sanitized`] apply them to values that arrive from
//! elsewhere (config files, hand-built structs).
//!
//! # Invariants
//!
//! 1. Coercion never fails; out-of-range input saturates to the nearest
//!    legal value.
//! 2. Integer fields clamp first, then truncate toward zero.
//! 3. NaN resolves to the field's lower bound.
//! 4. Minimum and maximum sizes are never cross-validated. When they
//!    conflict the minimum wins at clamp time.

use serde::{Deserialize, Serialize};

use gridpanel_core::clamp_to;

/// Default number of grid columns.
pub const DEFAULT_COLUMN_COUNT: u32 = 12;
/// Default lower bound for both column width and row height.
pub const DEFAULT_MIN_CELL_SIZE: f64 = 50.0;
/// Default gap between adjacent cells on both axes.
pub const DEFAULT_SPACING: u32 = 8;

/// Coerce a non-negative float (aspect ratio, min/max sizes).
///
/// `+inf` is preserved: it is how an unbounded maximum is spelled.
#[inline]
#[must_use]
pub fn coerce_non_negative(value: f64) -> f64 {
    clamp_to(value, 0.0, f64::INFINITY)
}

/// Coerce an integer with lower bound `min`, truncating toward zero.
#[inline]
#[must_use]
pub fn coerce_integer(value: f64, min: u32) -> u32 {
    // `as` saturates, so +inf lands on u32::MAX.
    clamp_to(value, f64::from(min), f64::from(u32::MAX)).trunc() as u32
}

/// Coerce a column count (`>= 1`).
#[inline]
#[must_use]
pub fn coerce_count(value: f64) -> u32 {
    coerce_integer(value, 1)
}

/// Coerce a row/column index or a spacing (`>= 0`).
#[inline]
#[must_use]
pub fn coerce_index(value: f64) -> u32 {
    coerce_integer(value, 0)
}

/// Coerce a row/column span (`>= 1`).
#[inline]
#[must_use]
pub fn coerce_span(value: f64) -> u32 {
    coerce_integer(value, 1)
}

/// Per-panel grid configuration.
///
/// Loaded from TOML/JSON with every field optional; missing fields take
/// their defaults and unbounded maxima are written as absent (or `null`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Ideal row height as a multiple of the column width.
    pub aspect_ratio: f64,
    /// Number of grid columns.
    pub column_count: u32,
    /// Hard lower bound for the column width.
    pub min_column_size: f64,
    /// Hard lower bound for the row height.
    pub min_row_size: f64,
    /// Hard upper bound for the column width.
    #[serde(
        skip_serializing_if = "is_unbounded",
        deserialize_with = "unbounded::deserialize"
    )]
    pub max_column_size: f64,
    /// Hard upper bound for the row height.
    #[serde(
        skip_serializing_if = "is_unbounded",
        deserialize_with = "unbounded::deserialize"
    )]
    pub max_row_size: f64,
    /// Gap between adjacent rows.
    pub row_spacing: u32,
    /// Gap between adjacent columns.
    pub column_spacing: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            column_count: DEFAULT_COLUMN_COUNT,
            min_column_size: DEFAULT_MIN_CELL_SIZE,
            min_row_size: DEFAULT_MIN_CELL_SIZE,
            max_column_size: f64::INFINITY,
            max_row_size: f64::INFINITY,
            row_spacing: DEFAULT_SPACING,
            column_spacing: DEFAULT_SPACING,
        }
    }
}

impl PanelConfig {
    /// Return a copy with every field coerced into its legal range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            aspect_ratio: coerce_non_negative(self.aspect_ratio),
            column_count: self.column_count.max(1),
            min_column_size: coerce_non_negative(self.min_column_size),
            min_row_size: coerce_non_negative(self.min_row_size),
            max_column_size: coerce_non_negative(self.max_column_size),
            max_row_size: coerce_non_negative(self.max_row_size),
            row_spacing: self.row_spacing,
            column_spacing: self.column_spacing,
        }
    }

    /// Total width consumed by column gaps.
    #[inline]
    pub fn fixed_column_space(&self) -> f64 {
        f64::from(self.column_spacing) * f64::from(self.column_count.saturating_sub(1))
    }
}

/// Declared origin cell and span of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPlacement {
    pub row: u32,
    pub column: u32,
    pub row_span: u32,
    pub column_span: u32,
}

impl Default for ItemPlacement {
    fn default() -> Self {
        Self {
            row: 0,
            column: 0,
            row_span: 1,
            column_span: 1,
        }
    }
}

impl ItemPlacement {
    /// A single cell at `(row, column)`.
    pub const fn at(row: u32, column: u32) -> Self {
        Self {
            row,
            column,
            row_span: 1,
            column_span: 1,
        }
    }

    /// Set the spans (builder pattern).
    #[must_use]
    pub const fn span(mut self, row_span: u32, column_span: u32) -> Self {
        self.row_span = row_span;
        self.column_span = column_span;
        self
    }

    /// Return a copy with zero spans raised to one.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            row_span: self.row_span.max(1),
            column_span: self.column_span.max(1),
            ..self
        }
    }

    /// Last row covered by this item.
    #[inline]
    pub fn last_row(&self) -> u32 {
        self.row.saturating_add(self.row_span.saturating_sub(1))
    }
}

fn is_unbounded(value: &f64) -> bool {
    *value == f64::INFINITY
}

mod unbounded {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
