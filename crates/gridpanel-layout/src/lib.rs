#![forbid(unsafe_code)]

//! Grid layout solver.
//!
//! Resolves declared `(row, column, row_span, column_span)` placements on a
//! fixed-column, unbounded-row grid into pixel rectangles. See [`grid`] for
//! the two layout modes and [`config`] for the legal range of every input.
//!
//! This crate is pure computation: no interior mutability, no callbacks, no
//! I/O. The reactive side (attribute storage, invalidation, coalescing) lives
//! in `gridpanel-runtime`.
//!
//! ```
//! use gridpanel_layout::{GridItem, GridResolver, ItemPlacement, LayoutMode, PanelConfig};
//!
//! let resolver = GridResolver::new(PanelConfig::default());
//! let layout = resolver.solve(1288.0, &[GridItem::new(ItemPlacement::at(0, 10).span(1, 5))]);
//!
//! assert_eq!(layout.data.mode, LayoutMode::Grid);
//! // Clamped to two columns at the right edge of the grid.
//! assert_eq!(layout.rects[0].width, 2.0 * 100.0 + 4.0 * 8.0);
//! ```

pub mod config;
pub mod debug;
pub mod grid;

pub use config::{ItemPlacement, PanelConfig};
pub use debug::{GridPassRecord, LayoutDebugger};
pub use gridpanel_core::geometry::{Rect, Sides, SizeLimits};
pub use grid::{GridItem, GridLayout, GridResolver, LayoutData, LayoutMode};
