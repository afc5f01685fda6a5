#![forbid(unsafe_code)]

//! Two-mode grid resolver.
//!
//! [`GridResolver`] turns a [`PanelConfig`] and an outer width into a
//! [`LayoutData`] (mode plus cell size), then maps every item's declared
//! [`ItemPlacement`] onto a pixel [`Rect`].
//!
//! # Modes
//!
//! - **Grid**: the configured column count fits at `min_column_size`.
//!   Items land on absolute cells, columns are clamped onto the grid, rows
//!   are unbounded.
//! - **Single column**: the width is too narrow. Items stack top to bottom
//!   ordered by `(row, column)`; declared positions are only a sort key.
//!
//! # Invariants
//!
//! 1. `rects[i]` always belongs to `items[i]`, whatever the visit order.
//! 2. The single-column order is a per-pass snapshot; the input slice is
//!    never reordered.
//! 3. An item's own [`SizeLimits`] win over the cell-derived size.
//! 4. Identical inputs give bit-identical outputs.
//!
//! # Failure Modes
//!
//! None. Degenerate configuration (zero aspect ratio, huge spacing) yields
//! degenerate but deterministic rectangles.

use gridpanel_core::geometry::{Rect, Sides, SizeLimits, clamp_to};

use crate::config::{ItemPlacement, PanelConfig};

/// Which of the two layout strategies a pass used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    /// Absolute (row, column) cells with spans.
    #[default]
    Grid,
    /// One stacked column ordered by (row, column).
    SingleColumn,
}

impl LayoutMode {
    /// Stable lowercase name, used in tracing fields and debug output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::SingleColumn => "single-column",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode and resolved cell size for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutData {
    pub mode: LayoutMode,
    /// Effective column width.
    pub column_size: f64,
    /// Effective row height.
    pub row_size: f64,
}

impl LayoutData {
    /// Decide the layout mode and cell size for a given inner content width.
    pub fn resolve(config: &PanelConfig, inner_width: f64) -> Self {
        let columns = f64::from(config.column_count.max(1));
        let ideal = (inner_width - config.fixed_column_space()) / columns;

        // A NaN width also falls back to the stacked column.
        if ideal.is_nan() || ideal < config.min_column_size {
            return Self {
                mode: LayoutMode::SingleColumn,
                column_size: clamp_to(inner_width, config.min_column_size, config.max_column_size),
                row_size: config.min_row_size,
            };
        }

        let column_size = clamp_to(ideal, config.min_column_size, config.max_column_size);
        let row_size = clamp_to(
            column_size * config.aspect_ratio,
            config.min_row_size,
            config.max_row_size,
        );
        Self {
            mode: LayoutMode::Grid,
            column_size,
            row_size,
        }
    }

    /// Height of a block spanning `span` rows, gaps included.
    #[inline]
    pub fn span_height(&self, span: u32, row_spacing: u32) -> f64 {
        f64::from(span) * self.row_size + f64::from(span.saturating_sub(1)) * f64::from(row_spacing)
    }
}

/// One item as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridItem {
    pub placement: ItemPlacement,
    /// The item's own size limits.
    pub limits: SizeLimits,
}

impl GridItem {
    /// An item with the given placement and no size limits.
    pub const fn new(placement: ItemPlacement) -> Self {
        Self {
            placement,
            limits: SizeLimits::UNBOUNDED,
        }
    }

    /// Set the item's size limits (builder pattern).
    #[must_use]
    pub const fn limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Result of a full placement pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub data: LayoutData,
    /// One rectangle per input item, indexed like the input.
    pub rects: Vec<Rect>,
    /// Indices of the input items in the order they were placed.
    pub visit_order: Vec<usize>,
    /// Highest occupied row (grid mode only).
    pub max_row: Option<u32>,
    /// Total content height including box sizing; `None` for zero items.
    pub extent: Option<f64>,
}

impl GridLayout {
    /// Whether the pass placed no items.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Grid layout solver for one panel.
///
/// Cheap to build; holds a copy of the configuration and the panel's box
/// sizing (border plus padding).
#[derive(Debug, Clone, Default)]
pub struct GridResolver {
    config: PanelConfig,
    box_sizing: Sides,
}

impl GridResolver {
    /// Create a resolver for the given configuration.
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config: config.sanitized(),
            box_sizing: Sides::default(),
        }
    }

    /// Set the box sizing (builder pattern).
    #[must_use]
    pub fn box_sizing(mut self, box_sizing: Sides) -> Self {
        self.box_sizing = box_sizing;
        self
    }

    /// The configuration this resolver applies.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Content width left after removing box sizing. Never negative.
    #[inline]
    pub fn inner_width(&self, outer_width: f64) -> f64 {
        (outer_width - self.box_sizing.horizontal_sum()).max(0.0)
    }

    /// Size limits the panel reports to its own container.
    ///
    /// The minimum is one legal cell plus box sizing; the maximum is open.
    pub fn reported_limits(&self) -> SizeLimits {
        SizeLimits::flexible(
            self.config.min_column_size + self.box_sizing.horizontal_sum(),
            self.config.min_row_size + self.box_sizing.vertical_sum(),
        )
    }

    /// Resolve mode and cell size for an outer width.
    pub fn layout_data(&self, outer_width: f64) -> LayoutData {
        LayoutData::resolve(&self.config, self.inner_width(outer_width))
    }

    /// Resolve and place in one call.
    pub fn solve(&self, outer_width: f64, items: &[GridItem]) -> GridLayout {
        let data = self.layout_data(outer_width);
        self.place(&data, items)
    }

    /// Assign a rectangle to every item under previously resolved data.
    pub fn place(&self, data: &LayoutData, items: &[GridItem]) -> GridLayout {
        if items.is_empty() {
            return GridLayout {
                data: *data,
                rects: Vec::new(),
                visit_order: Vec::new(),
                max_row: None,
                extent: None,
            };
        }
        match data.mode {
            LayoutMode::Grid => self.place_grid(data, items),
            LayoutMode::SingleColumn => self.place_stacked(data, items),
        }
    }

    fn place_grid(&self, data: &LayoutData, items: &[GridItem]) -> GridLayout {
        let config = &self.config;
        let column_spacing = f64::from(config.column_spacing);
        let row_spacing = f64::from(config.row_spacing);
        let last_column = config.column_count.saturating_sub(1);

        let mut rects = Vec::with_capacity(items.len());
        let mut max_row = 0u32;

        for item in items {
            let p = item.placement;
            let column = p.column.min(last_column);
            let clamped_span = p.column_span.min(config.column_count - column);

            let x = self.box_sizing.left + f64::from(column) * (data.column_size + column_spacing);
            let y = self.box_sizing.top + f64::from(p.row) * (data.row_size + row_spacing);

            // The gap term uses the declared span while the cell term uses
            // the clamped one; kept as-is.
            let width = f64::from(clamped_span) * data.column_size
                + f64::from(p.column_span.saturating_sub(1)) * column_spacing;
            let height = data.span_height(p.row_span, config.row_spacing);

            rects.push(Rect::new(
                x,
                y,
                item.limits.clamp_width(width),
                item.limits.clamp_height(height),
            ));
            max_row = max_row.max(p.last_row());
        }

        let extent = f64::from(max_row) * (data.row_size + row_spacing)
            + data.row_size
            + self.box_sizing.vertical_sum();

        GridLayout {
            data: *data,
            rects,
            visit_order: (0..items.len()).collect(),
            max_row: Some(max_row),
            extent: Some(extent),
        }
    }

    fn place_stacked(&self, data: &LayoutData, items: &[GridItem]) -> GridLayout {
        let row_spacing = f64::from(self.config.row_spacing);

        let mut visit_order: Vec<usize> = (0..items.len()).collect();
        visit_order.sort_by_key(|&i| (items[i].placement.row, items[i].placement.column));

        let mut rects = vec![Rect::default(); items.len()];
        let mut cursor = self.box_sizing.top;

        for &index in &visit_order {
            let item = &items[index];
            // The slot keeps its grid height; only the rect is clamped.
            let height = data.span_height(item.placement.row_span, self.config.row_spacing);
            let width = item.limits.clamp_width(data.column_size);
            let clamped_height = item.limits.clamp_height(height);
            rects[index] = Rect::new(self.box_sizing.left, cursor, width, clamped_height);
            cursor += height + row_spacing;
        }

        // Final cursor without the trailing gap.
        let extent = cursor - row_spacing;

        GridLayout {
            data: *data,
            rects,
            visit_order,
            max_row: None,
            extent: Some(extent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: f64, items: &[GridItem]) -> GridLayout {
        GridResolver::new(PanelConfig::default()).solve(width, items)
    }

    fn cell(row: u32, column: u32) -> GridItem {
        GridItem::new(ItemPlacement::at(row, column))
    }

    #[test]
    fn mode_switches_at_exact_boundary() {
        let config = PanelConfig::default();
        // (687 - 88) / 12 = 49.916.. < 50
        assert_eq!(
            LayoutData::resolve(&config, 687.0).mode,
            LayoutMode::SingleColumn
        );
        // (688 - 88) / 12 = 50
        let data = LayoutData::resolve(&config, 688.0);
        assert_eq!(data.mode, LayoutMode::Grid);
        assert_eq!(data.column_size, 50.0);
        assert_eq!(data.row_size, 50.0);
    }

    #[test]
    fn grid_mode_applies_aspect_ratio_and_bounds() {
        let config = PanelConfig {
            aspect_ratio: 0.5,
            max_column_size: 80.0,
            ..PanelConfig::default()
        };
        // ideal = (1288 - 88) / 12 = 100, capped at 80; rows 40 -> min 50
        let data = LayoutData::resolve(&config, 1288.0);
        assert_eq!(data.mode, LayoutMode::Grid);
        assert_eq!(data.column_size, 80.0);
        assert_eq!(data.row_size, 50.0);

        let tall = PanelConfig {
            aspect_ratio: 2.0,
            max_row_size: 150.0,
            ..PanelConfig::default()
        };
        let data = LayoutData::resolve(&tall, 1288.0);
        assert_eq!(data.column_size, 100.0);
        assert_eq!(data.row_size, 150.0);
    }

    #[test]
    fn single_column_ignores_aspect_ratio() {
        let config = PanelConfig {
            aspect_ratio: 3.0,
            min_row_size: 30.0,
            max_column_size: 200.0,
            ..PanelConfig::default()
        };
        let data = LayoutData::resolve(&config, 400.0);
        assert_eq!(data.mode, LayoutMode::SingleColumn);
        assert_eq!(data.column_size, 200.0);
        assert_eq!(data.row_size, 30.0);

        // Narrower than the minimum: column floor wins.
        let data = LayoutData::resolve(&config, 10.0);
        assert_eq!(data.column_size, 50.0);
    }

    #[test]
    fn column_span_clamps_to_right_edge() {
        // column size 100: (1288 - 88) / 12
        let item = GridItem::new(ItemPlacement::at(0, 10).span(1, 5));
        let layout = grid(1288.0, &[item]);
        let rect = layout.rects[0];
        assert_eq!(rect.x, 10.0 * 108.0);
        // 2 cells, but 4 gaps from the declared span.
        assert_eq!(rect.width, 2.0 * 100.0 + 4.0 * 8.0);
    }

    #[test]
    fn out_of_range_column_is_pulled_onto_grid() {
        let layout = grid(1288.0, &[cell(0, 40)]);
        assert_eq!(layout.rects[0].x, 11.0 * 108.0);
        assert_eq!(layout.rects[0].width, 100.0);
    }

    #[test]
    fn item_limits_win_over_cell_size() {
        let item = cell(0, 0).limits(SizeLimits::at_most(40.0, f64::INFINITY));
        let layout = grid(1288.0, &[item]);
        assert_eq!(layout.rects[0].width, 40.0);
        assert_eq!(layout.rects[0].height, 100.0);

        let floor = cell(0, 0).limits(SizeLimits::flexible(0.0, 500.0));
        let layout = grid(1288.0, &[floor]);
        assert_eq!(layout.rects[0].height, 500.0);
    }

    #[test]
    fn grid_extent_from_max_row() {
        // row size 50 at width 688
        let item = GridItem::new(ItemPlacement::at(2, 0).span(3, 1));
        let layout = grid(688.0, &[item]);
        assert_eq!(layout.data.row_size, 50.0);
        assert_eq!(layout.max_row, Some(4));
        assert_eq!(layout.extent, Some(5.0 * 50.0 + 4.0 * 8.0));
        assert_eq!(layout.extent, Some(282.0));
    }

    #[test]
    fn extent_and_origin_include_box_sizing() {
        let resolver =
            GridResolver::new(PanelConfig::default()).box_sizing(Sides::new(4.0, 6.0, 10.0, 6.0));
        // inner = 700 - 12 = 688
        let layout = resolver.solve(700.0, &[GridItem::new(ItemPlacement::at(2, 1).span(3, 1))]);
        assert_eq!(layout.data.mode, LayoutMode::Grid);
        assert_eq!(layout.rects[0].x, 6.0 + 58.0);
        assert_eq!(layout.rects[0].y, 4.0 + 2.0 * 58.0);
        assert_eq!(layout.extent, Some(282.0 + 14.0));
    }

    #[test]
    fn single_column_sorts_by_row_then_column() {
        let items = [cell(1, 0), cell(0, 5), cell(0, 1)];
        let layout = grid(300.0, &items);
        assert_eq!(layout.data.mode, LayoutMode::SingleColumn);
        assert_eq!(layout.visit_order, vec![2, 1, 0]);

        // (0,1) on top, then (0,5), then (1,0); all at x = 0.
        assert_eq!(layout.rects[2].y, 0.0);
        assert_eq!(layout.rects[1].y, 58.0);
        assert_eq!(layout.rects[0].y, 116.0);
        assert!(layout.rects.iter().all(|r| r.x == 0.0 && r.width == 300.0));
        assert_eq!(layout.extent, Some(166.0));
    }

    #[test]
    fn single_column_spans_and_limits() {
        let items = [
            GridItem::new(ItemPlacement::at(0, 0).span(2, 3)),
            cell(1, 0).limits(SizeLimits::at_most(120.0, 20.0)),
        ];
        let layout = grid(300.0, &items);
        assert_eq!(layout.rects[0], Rect::new(0.0, 0.0, 300.0, 108.0));
        assert_eq!(layout.rects[1], Rect::new(0.0, 116.0, 120.0, 20.0));
        // The clamped item still occupies a full 50px slot.
        assert_eq!(layout.extent, Some(166.0));
    }

    #[test]
    fn single_column_clamped_item_keeps_its_slot() {
        let items = [cell(0, 0).limits(SizeLimits::at_most(f64::INFINITY, 20.0)), cell(1, 0)];
        let layout = grid(300.0, &items);
        assert_eq!(layout.rects[0].height, 20.0);
        assert_eq!(layout.rects[1].y, 58.0);
        assert_eq!(layout.extent, Some(108.0));
    }

    #[test]
    fn single_column_extent_starts_at_top_padding() {
        let resolver = GridResolver::new(PanelConfig::default()).box_sizing(Sides::new(5.0, 3.0, 9.0, 2.0));
        let layout = resolver.solve(305.0, &[cell(0, 0), cell(1, 0)]);
        assert_eq!(layout.data.mode, LayoutMode::SingleColumn);
        assert_eq!(layout.rects[0].y, 5.0);
        assert_eq!(layout.rects[1].y, 63.0);
        assert_eq!(layout.extent, Some(113.0));
    }

    #[test]
    fn single_column_sort_is_stable() {
        let items = [cell(0, 0), cell(0, 0), cell(0, 0)];
        let layout = grid(100.0, &items);
        assert_eq!(layout.visit_order, vec![0, 1, 2]);
    }

    #[test]
    fn grid_mode_keeps_input_order() {
        let items = [cell(3, 0), cell(0, 0), cell(1, 2)];
        let layout = grid(1288.0, &items);
        assert_eq!(layout.visit_order, vec![0, 1, 2]);
        assert_eq!(layout.max_row, Some(3));
    }

    #[test]
    fn zero_items_has_no_extent() {
        let layout = grid(1288.0, &[]);
        assert!(layout.is_empty());
        assert_eq!(layout.extent, None);
        assert_eq!(layout.max_row, None);
    }

    #[test]
    fn repeated_solves_are_bit_identical() {
        let items: Vec<GridItem> = (0..20)
            .map(|i| GridItem::new(ItemPlacement::at(i / 3, (i * 5) % 14).span(1 + i % 2, 1 + i % 4)))
            .collect();
        let resolver = GridResolver::new(PanelConfig {
            aspect_ratio: 0.618,
            ..PanelConfig::default()
        });
        for width in [333.3, 687.0, 688.0, 1001.7] {
            let a = resolver.solve(width, &items);
            let b = resolver.solve(width, &items);
            let bits_a: Vec<_> = a.rects.iter().map(Rect::to_bits).collect();
            let bits_b: Vec<_> = b.rects.iter().map(Rect::to_bits).collect();
            assert_eq!(bits_a, bits_b);
            assert_eq!(a.extent.map(f64::to_bits), b.extent.map(f64::to_bits));
        }
    }

    #[test]
    fn reported_limits_add_box_sizing() {
        let resolver = GridResolver::new(PanelConfig {
            min_column_size: 60.0,
            min_row_size: 40.0,
            ..PanelConfig::default()
        })
        .box_sizing(Sides::new(1.0, 2.0, 3.0, 4.0));
        let limits = resolver.reported_limits();
        assert_eq!(limits.min_width, 66.0);
        assert_eq!(limits.min_height, 44.0);
        assert_eq!(limits.max_width, f64::INFINITY);
    }

    #[test]
    fn negative_outer_width_degrades_to_single_column() {
        let layout = grid(-20.0, &[cell(0, 0)]);
        assert_eq!(layout.data.mode, LayoutMode::SingleColumn);
        assert_eq!(layout.rects[0].width, 50.0);
    }

    #[test]
    fn mode_display() {
        assert_eq!(LayoutMode::Grid.to_string(), "grid");
        assert_eq!(LayoutMode::SingleColumn.to_string(), "single-column");
    }
}
