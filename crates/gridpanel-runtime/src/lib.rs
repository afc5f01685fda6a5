#![forbid(unsafe_code)]

//! Reactive side of gridpanel.
//!
//! This crate ties the pure solver in `gridpanel-layout` to long-lived,
//! mutable state.
//!
//! # Key Components
//!
//! - [`PlacementStore`] - Coerced panel configuration and item placement values
//! - [`Attribute`] / [`AttributeStore`] - Generic descriptor plus per-owner storage
//! - [`GridPanel`] - Ordered children, pending-work flags, the layout pass
//! - [`Item`] - Positionable child with size limits and a weak parent link
//! - [`BatchScope`] - Coalesces change hooks across many writes
//!
//! # How it fits in the system
//! Writes go through the store, whose hooks mark panels dirty. The embedding
//! loop calls [`GridPanel::flush`] once per tick; the panel snapshots its
//! configuration and children, runs [`gridpanel_layout::GridResolver`], and
//! pushes geometry to items and the content extent to its [`PanelHost`].

pub mod attribute;
#[cfg(feature = "config-files")]
pub mod config;
pub mod item;
pub mod panel;
pub mod placement;
pub mod reactive;

pub use attribute::{Attribute, AttributeId, AttributeOwner, AttributeStore, AttributeValue, OwnerId};
#[cfg(feature = "config-files")]
pub use config::{ConfigError, load_panel_config_file, load_panel_config_json, load_panel_config_toml};
pub use item::{Container, Item};
pub use panel::{ContentExtent, GridPanel, PanelHost, PendingUpdate};
pub use placement::{PlacementStore, item_attr, panel_attr};
pub use reactive::BatchScope;
