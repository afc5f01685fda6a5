#![forbid(unsafe_code)]

//! Positionable items and the containers that hold them.
//!
//! An [`Item`] is a cheap, reference-counted handle. It carries the size
//! limits its owner imposes, the geometry the last layout pass assigned,
//! and a non-owning reference to its current container. Placement values
//! (row, column, spans) are not stored here but in the
//! [`PlacementStore`](crate::placement::PlacementStore).
//!
//! # Invariants
//!
//! 1. The parent reference is weak: an item never keeps its container alive.
//! 2. An item belongs to at most one container at a time.
//! 3. Geometry callbacks run with no item borrow held.
//! 4. Once adopted by a panel, the item's placement values live exactly as
//!    long as the item: the last handle to drop clears them from the
//!    panel's store.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use gridpanel_core::geometry::{Rect, SizeLimits};

use crate::attribute::{AttributeOwner, OwnerId};
use crate::panel::GridPanel;
use crate::placement::PlacementStore;

/// A container that can hold items.
///
/// Every method has a default so foreign containers only implement what
/// they support.
pub trait Container {
    /// Capability check: the grid panel behind this container, if any.
    fn as_grid_panel(self: Rc<Self>) -> Option<GridPanel> {
        None
    }

    /// Forget `item` as a child. Called when the item moves elsewhere.
    fn release_child(&self, _item: &Item) {}
}

type GeometryCallback = Rc<dyn Fn(Rect)>;

struct ItemInner {
    id: OwnerId,
    limits: Cell<SizeLimits>,
    geometry: Cell<Option<Rect>>,
    geometry_writes: Cell<u64>,
    parent: RefCell<Option<Weak<dyn Container>>>,
    on_geometry: RefCell<Option<GeometryCallback>>,
    store: RefCell<Weak<PlacementStore>>,
}

impl Drop for ItemInner {
    fn drop(&mut self) {
        if let Some(store) = self.store.get_mut().upgrade() {
            store.forget_item(self.id);
        }
    }
}

/// Handle to one laid-out item.
///
/// Clones share state; equality is identity.
#[derive(Clone)]
pub struct Item {
    inner: Rc<ItemInner>,
}

impl Item {
    /// A new unparented item without size limits.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ItemInner {
                id: OwnerId::next(),
                limits: Cell::new(SizeLimits::UNBOUNDED),
                geometry: Cell::new(None),
                geometry_writes: Cell::new(0),
                parent: RefCell::new(None),
                on_geometry: RefCell::new(None),
                store: RefCell::new(Weak::new()),
            }),
        }
    }

    /// Set initial size limits (builder pattern).
    #[must_use]
    pub fn with_limits(self, limits: SizeLimits) -> Self {
        self.inner.limits.set(limits);
        self
    }

    pub fn id(&self) -> OwnerId {
        self.inner.id
    }

    pub fn size_limits(&self) -> SizeLimits {
        self.inner.limits.get()
    }

    /// Replace the item's size limits.
    ///
    /// A grid parent is asked for a relayout when the limits change.
    pub fn set_size_limits(&self, limits: SizeLimits) {
        if self.inner.limits.replace(limits) == limits {
            return;
        }
        if let Some(panel) = self.grid_parent() {
            panel.on_visual_config_changed();
        }
    }

    /// Geometry assigned by the most recent pass.
    pub fn geometry(&self) -> Option<Rect> {
        self.inner.geometry.get()
    }

    /// How many times a pass assigned geometry to this item.
    pub fn geometry_writes(&self) -> u64 {
        self.inner.geometry_writes.get()
    }

    /// Apply a rectangle computed by a layout pass.
    pub fn set_geometry(&self, rect: Rect) {
        self.inner.geometry.set(Some(rect));
        self.inner
            .geometry_writes
            .set(self.inner.geometry_writes.get() + 1);
        let callback = self.inner.on_geometry.borrow().clone();
        if let Some(callback) = callback {
            callback(rect);
        }
    }

    /// Run `f` every time geometry is applied. Replaces any earlier callback.
    pub fn on_geometry(&self, f: impl Fn(Rect) + 'static) {
        *self.inner.on_geometry.borrow_mut() = Some(Rc::new(f));
    }

    /// The current container, if it is still alive.
    pub fn parent(&self) -> Option<Rc<dyn Container>> {
        self.inner.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// The current container, if it is a grid panel.
    pub fn grid_parent(&self) -> Option<GridPanel> {
        self.parent().and_then(|parent| parent.as_grid_panel())
    }

    /// Record `parent` as the item's container without notifying anyone.
    ///
    /// Containers call this when adopting the item; foreign containers may
    /// call it directly.
    pub fn set_parent(&self, parent: Option<Weak<dyn Container>>) {
        *self.inner.parent.borrow_mut() = parent;
    }

    /// Tie the item's stored values to `store`.
    ///
    /// Values left in a previously bound store are cleared.
    pub(crate) fn bind_store(&self, store: &Rc<PlacementStore>) {
        let previous = self.inner.store.replace(Rc::downgrade(store));
        if let Some(previous) = previous.upgrade()
            && !Rc::ptr_eq(&previous, store)
        {
            previous.forget_item(self.inner.id);
        }
    }

    /// Leave the current container, if any.
    pub fn detach(&self) {
        let parent = self.inner.parent.borrow_mut().take();
        if let Some(parent) = parent.as_ref().and_then(Weak::upgrade) {
            parent.release_child(self);
        }
    }

    /// Whether both handles refer to the same item.
    #[inline]
    pub fn ptr_eq(&self, other: &Item) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Item {}

impl AttributeOwner for Item {
    fn owner_id(&self) -> OwnerId {
        self.inner.id
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.inner.id.get())
            .field("limits", &self.inner.limits.get())
            .field("geometry", &self.inner.geometry.get())
            .field("parented", &self.parent().is_some())
            .finish()
    }
}
