#![forbid(unsafe_code)]

//! Geometric primitives.

/// Clamp `value` into `[lo, hi]` with the lower bound taking precedence.
///
/// Unlike [`f64::clamp`] this never panics when `lo > hi`: the result is
/// `lo` in that case. A NaN `value` resolves to `lo`.
#[inline]
#[must_use]
pub fn clamp_to(value: f64, lo: f64, hi: f64) -> f64 {
    let capped = if value > hi { hi } else { value };
    if capped >= lo { capped } else { lo }
}

/// A rectangle in panel-local pixel coordinates.
///
/// Origin at top-left; `x` grows right and `y` grows down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Raw IEEE-754 bits of `(x, y, width, height)`.
    ///
    /// Two rectangles with equal bits are byte-identical, which is the
    /// comparison determinism checks want (`PartialEq` treats `0.0 == -0.0`).
    #[inline]
    pub fn to_bits(&self) -> [u64; 4] {
        [
            self.x.to_bits(),
            self.y.to_bits(),
            self.width.to_bits(),
            self.height.to_bits(),
        ]
    }
}

/// Sides for border and padding (box sizing).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Hard minimum/maximum size of a box.
///
/// Owned by whoever owns the box; a layout solver must honour these over
/// any size it derives itself. `f64::INFINITY` marks an unbounded maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl SizeLimits {
    /// No lower bound, no upper bound.
    pub const UNBOUNDED: Self = Self {
        min_width: 0.0,
        min_height: 0.0,
        max_width: f64::INFINITY,
        max_height: f64::INFINITY,
    };

    /// Create limits from explicit bounds.
    pub const fn new(min_width: f64, min_height: f64, max_width: f64, max_height: f64) -> Self {
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }

    /// Limits pinning the box to exactly `width` x `height`.
    pub const fn fixed(width: f64, height: f64) -> Self {
        Self::new(width, height, width, height)
    }

    /// Lower bounds only.
    pub const fn flexible(min_width: f64, min_height: f64) -> Self {
        Self::new(min_width, min_height, f64::INFINITY, f64::INFINITY)
    }

    /// Upper bounds only.
    pub const fn at_most(max_width: f64, max_height: f64) -> Self {
        Self::new(0.0, 0.0, max_width, max_height)
    }

    /// Clamp a width into these limits; the minimum wins on conflict.
    #[inline]
    pub fn clamp_width(&self, width: f64) -> f64 {
        clamp_to(width, self.min_width, self.max_width)
    }

    /// Clamp a height into these limits; the minimum wins on conflict.
    #[inline]
    pub fn clamp_height(&self, height: f64) -> f64 {
        clamp_to(height, self.min_height, self.max_height)
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
