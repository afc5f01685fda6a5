#![forbid(unsafe_code)]

//! gridpanel public facade crate.
//!
//! Re-exports the geometry, solver and runtime types a host application
//! needs, plus a prelude for day-to-day usage.
//!
//! ```
//! use gridpanel::prelude::*;
//! use std::rc::Rc;
//!
//! let store = Rc::new(PlacementStore::new());
//! let panel = GridPanel::new(Rc::clone(&store));
//! let item = Item::new();
//! panel.add_item(&item);
//! store.set_placement(&item, ItemPlacement::at(0, 10).span(1, 5));
//!
//! panel.on_resize(1288.0, 400.0);
//! assert_eq!(item.geometry().map(|r| r.width), Some(232.0));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use gridpanel_core::geometry::{Rect, Sides, SizeLimits};

// --- Layout re-exports -----------------------------------------------------

pub use gridpanel_layout::{
    GridItem, GridLayout, GridPassRecord, GridResolver, ItemPlacement, LayoutData,
    LayoutDebugger, LayoutMode, PanelConfig,
};

// --- Runtime re-exports ----------------------------------------------------

pub use gridpanel_runtime::{
    BatchScope, Container, ContentExtent, GridPanel, Item, PanelHost, PendingUpdate,
    PlacementStore, item_attr, panel_attr,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gridpanel hosts.
#[derive(Debug)]
pub enum Error {
    /// A configuration file could not be loaded.
    #[cfg(feature = "config-files")]
    Config(gridpanel_runtime::ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            #[cfg(feature = "config-files")]
            Self::Config(ref err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            #[cfg(feature = "config-files")]
            Self::Config(ref err) => Some(err),
        }
    }
}

#[cfg(feature = "config-files")]
impl From<gridpanel_runtime::ConfigError> for Error {
    fn from(err: gridpanel_runtime::ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for gridpanel APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load a `.toml` / `.json` panel configuration and apply it to `panel`.
///
/// Values go through the panel's store, so they are coerced and the panel
/// is scheduled for a refit. Returns the number of fields that changed.
#[cfg(feature = "config-files")]
pub fn apply_config_file(panel: &GridPanel, path: impl AsRef<std::path::Path>) -> Result<usize> {
    let config = gridpanel_runtime::load_panel_config_file(path)?;
    Ok(panel.store().apply_config(panel, &config))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BatchScope, ContentExtent, Error, GridPanel, Item, ItemPlacement, LayoutMode, PanelConfig,
        PanelHost, PlacementStore, Rect, Result, Sides, SizeLimits, item_attr, panel_attr,
    };

    pub use crate::{core, layout, runtime};
}

pub use gridpanel_core as core;
pub use gridpanel_layout as layout;
pub use gridpanel_runtime as runtime;
