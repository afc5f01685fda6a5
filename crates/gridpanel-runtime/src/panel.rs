#![forbid(unsafe_code)]

//! Grid panel: owns an ordered list of items and keeps their geometry current.
//!
//! A [`GridPanel`] never lays out on its own initiative. Configuration and
//! placement hooks only record what is owed in [`PendingUpdate`] flags;
//! the embedding event loop calls [`GridPanel::flush`] once per tick, which
//! honours everything recorded since the last flush with at most one pass.
//! [`GridPanel::on_resize`] is the exception: a new size is laid out
//! immediately.
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use gridpanel_runtime::{GridPanel, Item, PlacementStore, item_attr};
//!
//! let store = Rc::new(PlacementStore::new());
//! let panel = GridPanel::new(Rc::clone(&store));
//! let item = Item::new();
//! panel.add_item(&item);
//! store.set_item(&item, &item_attr::COLUMN, 2.0);
//!
//! panel.on_resize(1288.0, 600.0);
//! assert_eq!(item.geometry().map(|r| r.x), Some(216.0));
//! ```
//!
//! # Invariants
//!
//! 1. Every pass assigns geometry to each item exactly once.
//! 2. No panel borrow is held while host or item callbacks run.
//! 3. A hidden panel keeps its pending work until it is shown again.
//! 4. Zero items means no pass: no geometry, no extent write.
//!
//! # Failure Modes
//!
//! - **No size known**: a flush without a prior resize asks the host to
//!   measure; without a host there is nothing to lay out against and the
//!   pending work is dropped. The next `on_resize` lays out regardless.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use bitflags::bitflags;
use gridpanel_core::geometry::{Sides, SizeLimits};
use gridpanel_layout::{GridItem, GridLayout, GridPassRecord, GridResolver, LayoutDebugger};
use tracing::{debug, info_span, trace};
use web_time::Instant;

use crate::attribute::{AttributeOwner, OwnerId};
use crate::item::{Container, Item};
use crate::placement::PlacementStore;

bitflags! {
    /// Work a panel owes at its next flush.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PendingUpdate: u8 {
        /// Recompute item geometry.
        const LAYOUT = 0b01;
        /// Re-derive reported size limits and ask the host to fit.
        const FIT = 0b10;
    }
}

/// Content size a panel reports after a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentExtent {
    /// The panel's reported minimum width.
    pub width: f64,
    /// Total content height, box sizing included.
    pub height: f64,
}

/// The panel's view of whatever embeds it.
pub trait PanelHost {
    /// Current outer size of the panel.
    fn measure(&self) -> (f64, f64);

    /// The panel's size limits changed; the host should refit it.
    fn fit_request(&self, _limits: SizeLimits) {}

    /// A pass finished with the given content extent.
    fn set_content_extent(&self, _extent: ContentExtent) {}
}

struct PanelInner {
    id: OwnerId,
    name: String,
    store: Rc<PlacementStore>,
    host: RefCell<Option<Rc<dyn PanelHost>>>,
    items: RefCell<Vec<Item>>,
    box_sizing: Cell<Sides>,
    visible: Cell<bool>,
    pending: Cell<PendingUpdate>,
    size: Cell<Option<(f64, f64)>>,
    reported: Cell<SizeLimits>,
    last_layout: RefCell<Option<GridLayout>>,
    debugger: RefCell<Option<Arc<LayoutDebugger>>>,
    passes: Cell<u64>,
}

impl PanelInner {
    fn schedule(&self, update: PendingUpdate) {
        let pending = self.pending.get() | update;
        trace!(panel = %self.name, ?pending, "update scheduled");
        self.pending.set(pending);
    }

    fn release(&self, item: &Item) -> bool {
        let removed = {
            let mut items = self.items.borrow_mut();
            let before = items.len();
            items.retain(|child| !child.ptr_eq(item));
            items.len() != before
        };
        if removed {
            self.schedule(PendingUpdate::LAYOUT);
        }
        removed
    }
}

impl Container for PanelInner {
    fn as_grid_panel(self: Rc<Self>) -> Option<GridPanel> {
        Some(GridPanel { inner: self })
    }

    fn release_child(&self, item: &Item) {
        self.release(item);
    }
}

impl Drop for PanelInner {
    fn drop(&mut self) {
        self.store.forget_panel(self.id);
    }
}

/// Handle to a grid panel. Clones share state.
#[derive(Clone)]
pub struct GridPanel {
    inner: Rc<PanelInner>,
}

impl GridPanel {
    /// A visible panel with default configuration, no host and no items.
    pub fn new(store: Rc<PlacementStore>) -> Self {
        Self::named(store, "grid-panel")
    }

    /// Like [`new`](Self::new) with a name used in tracing and debug records.
    pub fn named(store: Rc<PlacementStore>, name: impl Into<String>) -> Self {
        let panel = Self {
            inner: Rc::new(PanelInner {
                id: OwnerId::next(),
                name: name.into(),
                store,
                host: RefCell::new(None),
                items: RefCell::new(Vec::new()),
                box_sizing: Cell::new(Sides::default()),
                visible: Cell::new(true),
                pending: Cell::new(PendingUpdate::empty()),
                size: Cell::new(None),
                reported: Cell::new(SizeLimits::UNBOUNDED),
                last_layout: RefCell::new(None),
                debugger: RefCell::new(None),
                passes: Cell::new(0),
            }),
        };
        panel.inner.reported.set(panel.resolver().reported_limits());
        panel
    }

    /// Attach a host (builder pattern).
    #[must_use]
    pub fn with_host(self, host: Rc<dyn PanelHost>) -> Self {
        self.set_host(Some(host));
        self
    }

    pub fn set_host(&self, host: Option<Rc<dyn PanelHost>>) {
        *self.inner.host.borrow_mut() = host;
    }

    pub fn id(&self) -> OwnerId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The store holding this panel's configuration and its items' placements.
    pub fn store(&self) -> &Rc<PlacementStore> {
        &self.inner.store
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// Append `item`, taking it from its previous container if any.
    pub fn add_item(&self, item: &Item) {
        self.insert_item(usize::MAX, item);
    }

    /// Insert `item` at `index` (clamped to the current length).
    pub fn insert_item(&self, index: usize, item: &Item) {
        item.detach();
        {
            let mut items = self.inner.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, item.clone());
        }
        let weak: Weak<PanelInner> = Rc::downgrade(&self.inner);
        item.set_parent(Some(weak as Weak<dyn Container>));
        item.bind_store(&self.inner.store);
        self.inner.schedule(PendingUpdate::LAYOUT);
    }

    /// Remove `item`. Returns `false` if it was not a child of this panel.
    pub fn remove_item(&self, item: &Item) -> bool {
        if !self.contains(item) {
            return false;
        }
        item.detach();
        true
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.inner.items.borrow().iter().any(|child| child.ptr_eq(item))
    }

    /// Snapshot of the children in container order.
    pub fn items(&self) -> Vec<Item> {
        self.inner.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    // ------------------------------------------------------------------
    // Appearance
    // ------------------------------------------------------------------

    pub fn box_sizing(&self) -> Sides {
        self.inner.box_sizing.get()
    }

    /// Set border plus padding. Changes the reported limits, so it refits.
    pub fn set_box_sizing(&self, box_sizing: Sides) {
        if self.inner.box_sizing.replace(box_sizing) != box_sizing {
            self.on_structural_config_changed();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    /// Show or hide the panel. Showing it schedules a pass.
    pub fn set_visible(&self, visible: bool) {
        let was_visible = self.inner.visible.replace(visible);
        if visible && !was_visible {
            self.inner.schedule(PendingUpdate::LAYOUT);
        }
    }

    /// Attach a layout debugger; every pass is recorded while it is enabled.
    pub fn set_debugger(&self, debugger: Option<Arc<LayoutDebugger>>) {
        *self.inner.debugger.borrow_mut() = debugger;
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// A configuration value that changes the panel's own size limits moved.
    pub fn on_structural_config_changed(&self) {
        self.inner.schedule(PendingUpdate::FIT | PendingUpdate::LAYOUT);
    }

    /// A value that only moves items changed.
    pub fn on_visual_config_changed(&self) {
        self.inner.schedule(PendingUpdate::LAYOUT);
    }

    /// The container resized the panel.
    ///
    /// A negative component means "unknown": the host is asked to measure.
    /// The pass runs immediately unless the panel is hidden.
    pub fn on_resize(&self, width: f64, height: f64) {
        let size = if width < 0.0 || height < 0.0 {
            self.measure()
        } else {
            Some((width, height))
        };
        if let Some(size) = size {
            self.inner.size.set(Some(size));
        }

        if !self.is_visible() {
            self.inner.schedule(PendingUpdate::LAYOUT);
            return;
        }

        let pending = self.inner.pending.replace(PendingUpdate::empty());
        if pending.contains(PendingUpdate::FIT) {
            self.fit();
        }
        self.layout();
    }

    /// Honour all pending work with at most one pass.
    ///
    /// Returns `true` if a pass ran.
    pub fn flush(&self) -> bool {
        if !self.is_visible() {
            return false;
        }
        let pending = self.inner.pending.replace(PendingUpdate::empty());
        if pending.is_empty() {
            return false;
        }
        if pending.contains(PendingUpdate::FIT) {
            self.fit();
        }
        self.layout()
    }

    /// Work recorded since the last flush.
    pub fn pending(&self) -> PendingUpdate {
        self.inner.pending.get()
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Size limits last reported to the host.
    pub fn reported_limits(&self) -> SizeLimits {
        self.inner.reported.get()
    }

    /// Result of the most recent non-empty pass.
    pub fn last_layout(&self) -> Option<GridLayout> {
        self.inner.last_layout.borrow().clone()
    }

    /// Number of passes run so far.
    pub fn pass_count(&self) -> u64 {
        self.inner.passes.get()
    }

    /// Last known outer size.
    pub fn size(&self) -> Option<(f64, f64)> {
        self.inner.size.get()
    }

    /// A resolver for the current configuration and box sizing.
    pub fn resolver(&self) -> GridResolver {
        GridResolver::new(self.inner.store.panel_config(self)).box_sizing(self.box_sizing())
    }

    /// Whether both handles refer to the same panel.
    #[inline]
    pub fn ptr_eq(&self, other: &GridPanel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------
    // Pass
    // ------------------------------------------------------------------

    fn host(&self) -> Option<Rc<dyn PanelHost>> {
        self.inner.host.borrow().clone()
    }

    fn measure(&self) -> Option<(f64, f64)> {
        self.host().map(|host| host.measure())
    }

    fn fit(&self) {
        let limits = self.resolver().reported_limits();
        self.inner.reported.set(limits);
        debug!(
            panel = %self.inner.name,
            min_width = limits.min_width,
            min_height = limits.min_height,
            "reported limits changed"
        );
        if let Some(host) = self.host() {
            host.fit_request(limits);
        }
    }

    fn layout(&self) -> bool {
        let size = match self.inner.size.get() {
            Some(size) => Some(size),
            None => {
                let measured = self.measure();
                self.inner.size.set(measured);
                measured
            }
        };
        let Some((width, _height)) = size else {
            trace!(panel = %self.inner.name, "layout skipped: size unknown");
            return false;
        };

        let items = self.items();
        if items.is_empty() {
            trace!(panel = %self.inner.name, "layout skipped: no items");
            return false;
        }

        let resolver = self.resolver();
        let store = &self.inner.store;
        let grid_items: Vec<GridItem> = items
            .iter()
            .map(|item| GridItem::new(store.placement(item)).limits(item.size_limits()))
            .collect();

        let pass_start = Instant::now();
        let span = info_span!(
            "gridpanel.layout",
            panel = %self.inner.name,
            items = grid_items.len() as u64,
            mode = tracing::field::Empty,
            duration_us = tracing::field::Empty
        );
        let _guard = span.enter();

        let layout = resolver.solve(width, &grid_items);
        span.record("mode", layout.data.mode.as_str());
        debug!(
            mode = %layout.data.mode,
            column_size = layout.data.column_size,
            row_size = layout.data.row_size,
            "layout data resolved"
        );

        for &index in &layout.visit_order {
            items[index].set_geometry(layout.rects[index]);
        }

        if let Some(height) = layout.extent
            && let Some(host) = self.host()
        {
            host.set_content_extent(ContentExtent {
                width: resolver.reported_limits().min_width,
                height,
            });
        }

        let elapsed = pass_start.elapsed();
        span.record("duration_us", elapsed.as_micros() as u64);

        let debugger = self.inner.debugger.borrow().clone();
        if let Some(debugger) = debugger
            && debugger.enabled()
        {
            debugger.record(
                GridPassRecord::from_layout(
                    self.inner.name.clone(),
                    &resolver,
                    width,
                    self.box_sizing(),
                    &layout,
                )
                .with_solve_time(elapsed),
            );
        }

        self.inner.passes.set(self.inner.passes.get() + 1);
        *self.inner.last_layout.borrow_mut() = Some(layout);
        true
    }
}

impl AttributeOwner for GridPanel {
    fn owner_id(&self) -> OwnerId {
        self.inner.id
    }
}

impl PartialEq for GridPanel {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for GridPanel {}

impl fmt::Debug for GridPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridPanel")
            .field("name", &self.inner.name)
            .field("items", &self.len())
            .field("visible", &self.is_visible())
            .field("pending", &self.pending())
            .field("passes", &self.pass_count())
            .finish()
    }
}
