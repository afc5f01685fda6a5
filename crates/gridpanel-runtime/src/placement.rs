#![forbid(unsafe_code)]

//! Panel configuration and item placement attributes.
//!
//! [`PlacementStore`] is the single place panel configuration and item
//! placement values live. Each field is an [`Attribute`] whose coercion is
//! the matching function from [`gridpanel_layout::config`], and whose change
//! hook tells the affected panel what kind of work it now owes:
//!
//! | attributes | hook |
//! |---|---|
//! | `ASPECT_RATIO`, `MAX_ROW_SIZE`, `ROW_SPACING`, `MAX_COLUMN_SIZE` | visual: relayout only |
//! | `COLUMN_COUNT`, `COLUMN_SPACING`, `MIN_COLUMN_SIZE`, `MIN_ROW_SIZE` | structural: refit, then relayout |
//! | item `ROW`, `COLUMN`, `ROW_SPAN`, `COLUMN_SPAN` | visual relayout of the item's grid parent |
//!
//! An item placed in a container that is not a grid panel keeps its values
//! but triggers nothing.
//!
//! Items must be registered in the same store as the panel that holds them:
//! the panel reads placements from its own store during a pass.

use gridpanel_layout::{ItemPlacement, PanelConfig};

use crate::attribute::{Attribute, AttributeStore, AttributeValue, OwnerId};
use crate::item::Item;
use crate::panel::GridPanel;
use crate::reactive::BatchScope;

/// Panel configuration attributes.
pub mod panel_attr {
    use gridpanel_layout::config::{
        DEFAULT_COLUMN_COUNT, DEFAULT_MIN_CELL_SIZE, DEFAULT_SPACING, coerce_count, coerce_index,
        coerce_non_negative,
    };

    use crate::attribute::Attribute;
    use crate::panel::GridPanel;

    fn visual_changed(panel: &GridPanel) {
        panel.on_visual_config_changed();
    }

    fn structural_changed(panel: &GridPanel) {
        panel.on_structural_config_changed();
    }

    pub static ASPECT_RATIO: Attribute<GridPanel, f64> =
        Attribute::new("aspect_ratio", 1.0, coerce_non_negative, visual_changed);
    pub static COLUMN_COUNT: Attribute<GridPanel, u32> = Attribute::new(
        "column_count",
        DEFAULT_COLUMN_COUNT,
        coerce_count,
        structural_changed,
    );
    pub static MIN_COLUMN_SIZE: Attribute<GridPanel, f64> = Attribute::new(
        "min_column_size",
        DEFAULT_MIN_CELL_SIZE,
        coerce_non_negative,
        structural_changed,
    );
    pub static MIN_ROW_SIZE: Attribute<GridPanel, f64> = Attribute::new(
        "min_row_size",
        DEFAULT_MIN_CELL_SIZE,
        coerce_non_negative,
        structural_changed,
    );
    pub static MAX_COLUMN_SIZE: Attribute<GridPanel, f64> = Attribute::new(
        "max_column_size",
        f64::INFINITY,
        coerce_non_negative,
        visual_changed,
    );
    pub static MAX_ROW_SIZE: Attribute<GridPanel, f64> = Attribute::new(
        "max_row_size",
        f64::INFINITY,
        coerce_non_negative,
        visual_changed,
    );
    pub static ROW_SPACING: Attribute<GridPanel, u32> =
        Attribute::new("row_spacing", DEFAULT_SPACING, coerce_index, visual_changed);
    pub static COLUMN_SPACING: Attribute<GridPanel, u32> = Attribute::new(
        "column_spacing",
        DEFAULT_SPACING,
        coerce_index,
        structural_changed,
    );
}

/// Item placement attributes.
pub mod item_attr {
    use gridpanel_layout::config::{coerce_index, coerce_span};

    use crate::attribute::Attribute;
    use crate::item::Item;

    fn placement_changed(item: &Item) {
        if let Some(panel) = item.grid_parent() {
            panel.on_visual_config_changed();
        }
    }

    pub static ROW: Attribute<Item, u32> = Attribute::new("row", 0, coerce_index, placement_changed);
    pub static COLUMN: Attribute<Item, u32> =
        Attribute::new("column", 0, coerce_index, placement_changed);
    pub static ROW_SPAN: Attribute<Item, u32> =
        Attribute::new("row_span", 1, coerce_span, placement_changed);
    pub static COLUMN_SPAN: Attribute<Item, u32> =
        Attribute::new("column_span", 1, coerce_span, placement_changed);
}

/// Attribute storage for panels and their items.
#[derive(Debug, Default)]
pub struct PlacementStore {
    panels: AttributeStore<GridPanel>,
    items: AttributeStore<Item>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a panel attribute.
    pub fn panel<V: AttributeValue>(&self, panel: &GridPanel, attr: &Attribute<GridPanel, V>) -> V {
        self.panels.get(panel, attr)
    }

    /// Write a panel attribute. Returns `true` if the value changed.
    pub fn set_panel<V: AttributeValue>(
        &self,
        panel: &GridPanel,
        attr: &Attribute<GridPanel, V>,
        value: f64,
    ) -> bool {
        self.panels.set(panel, attr, value)
    }

    /// Read an item attribute.
    pub fn item<V: AttributeValue>(&self, item: &Item, attr: &Attribute<Item, V>) -> V {
        self.items.get(item, attr)
    }

    /// Write an item attribute. Returns `true` if the value changed.
    pub fn set_item<V: AttributeValue>(
        &self,
        item: &Item,
        attr: &Attribute<Item, V>,
        value: f64,
    ) -> bool {
        self.items.set(item, attr, value)
    }

    /// Snapshot of a panel's full configuration.
    pub fn panel_config(&self, panel: &GridPanel) -> PanelConfig {
        PanelConfig {
            aspect_ratio: self.panel(panel, &panel_attr::ASPECT_RATIO),
            column_count: self.panel(panel, &panel_attr::COLUMN_COUNT),
            min_column_size: self.panel(panel, &panel_attr::MIN_COLUMN_SIZE),
            min_row_size: self.panel(panel, &panel_attr::MIN_ROW_SIZE),
            max_column_size: self.panel(panel, &panel_attr::MAX_COLUMN_SIZE),
            max_row_size: self.panel(panel, &panel_attr::MAX_ROW_SIZE),
            row_spacing: self.panel(panel, &panel_attr::ROW_SPACING),
            column_spacing: self.panel(panel, &panel_attr::COLUMN_SPACING),
        }
    }

    /// Snapshot of an item's placement.
    pub fn placement(&self, item: &Item) -> ItemPlacement {
        ItemPlacement {
            row: self.item(item, &item_attr::ROW),
            column: self.item(item, &item_attr::COLUMN),
            row_span: self.item(item, &item_attr::ROW_SPAN),
            column_span: self.item(item, &item_attr::COLUMN_SPAN),
        }
    }

    /// Write every field of `config` through the coercing setters.
    ///
    /// Runs in one batch, so the panel is notified once per changed field
    /// and its pending work coalesces into a single pass.
    pub fn apply_config(&self, panel: &GridPanel, config: &PanelConfig) -> usize {
        let _batch = BatchScope::new();
        [
            self.set_panel(panel, &panel_attr::ASPECT_RATIO, config.aspect_ratio),
            self.set_panel(panel, &panel_attr::COLUMN_COUNT, f64::from(config.column_count)),
            self.set_panel(panel, &panel_attr::MIN_COLUMN_SIZE, config.min_column_size),
            self.set_panel(panel, &panel_attr::MIN_ROW_SIZE, config.min_row_size),
            self.set_panel(panel, &panel_attr::MAX_COLUMN_SIZE, config.max_column_size),
            self.set_panel(panel, &panel_attr::MAX_ROW_SIZE, config.max_row_size),
            self.set_panel(panel, &panel_attr::ROW_SPACING, f64::from(config.row_spacing)),
            self.set_panel(panel, &panel_attr::COLUMN_SPACING, f64::from(config.column_spacing)),
        ]
        .into_iter()
        .filter(|&changed| changed)
        .count()
    }

    /// Write all four placement fields of an item in one batch.
    pub fn set_placement(&self, item: &Item, placement: ItemPlacement) -> usize {
        let _batch = BatchScope::new();
        [
            self.set_item(item, &item_attr::ROW, f64::from(placement.row)),
            self.set_item(item, &item_attr::COLUMN, f64::from(placement.column)),
            self.set_item(item, &item_attr::ROW_SPAN, f64::from(placement.row_span)),
            self.set_item(item, &item_attr::COLUMN_SPAN, f64::from(placement.column_span)),
        ]
        .into_iter()
        .filter(|&changed| changed)
        .count()
    }

    /// Drop all stored values of a panel.
    pub fn forget_panel(&self, panel: OwnerId) -> usize {
        self.panels.clear(panel)
    }

    /// Drop all stored values of an item.
    pub fn forget_item(&self, item: OwnerId) -> usize {
        self.items.clear(item)
    }

    /// Stored panel values across all panels.
    pub fn panel_values(&self) -> usize {
        self.panels.len()
    }

    /// Stored item values across all items.
    pub fn item_values(&self) -> usize {
        self.items.len()
    }
}
