#![forbid(unsafe_code)]

//! Typed attribute descriptors and per-owner value storage.
//!
//! An [`Attribute`] describes one named, coerced value that any owner of a
//! given type can carry: its default, the pure function that maps raw input
//! into the legal range, and an optional hook run when the stored value
//! actually changes. An [`AttributeStore`] holds the values for many owners.
//!
//! # Usage
//!
//! ```
//! use gridpanel_runtime::attribute::{Attribute, AttributeOwner, AttributeStore, OwnerId};
//!
//! #[derive(Clone)]
//! struct Knob(OwnerId);
//!
//! impl AttributeOwner for Knob {
//!     fn owner_id(&self) -> OwnerId {
//!         self.0
//!     }
//! }
//!
//! static LEVEL: Attribute<Knob, u32> =
//!     Attribute::detached("level", 1, |raw| raw.clamp(1.0, 10.0) as u32);
//!
//! let store = AttributeStore::new();
//! let knob = Knob(OwnerId::next());
//! assert_eq!(store.get(&knob, &LEVEL), 1);
//! assert!(store.set(&knob, &LEVEL, 42.0));
//! assert_eq!(store.get(&knob, &LEVEL), 10);
//! ```
//!
//! # Invariants
//!
//! 1. Writes never fail: every raw value is coerced before it is stored.
//! 2. The change hook runs only when the coerced value differs from the
//!    previous one (the default counts as previous when nothing is stored).
//! 3. No store borrow is held while a hook runs, so hooks may read and
//!    write the same store.
//! 4. Inside a [`BatchScope`](crate::reactive::BatchScope) hooks are keyed
//!    by `(owner, attribute)` and run at most once when the scope exits.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::reactive::batch;

/// Identity of an attribute owner (panel or item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Identity of an attribute descriptor, unique per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeId(&'static str);

impl AttributeId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The attribute's name.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Anything that can carry attribute values.
///
/// Owners are cheap handles: the store clones one into every deferred hook.
pub trait AttributeOwner: Clone + 'static {
    fn owner_id(&self) -> OwnerId;
}

/// Value types an attribute can hold.
///
/// Values are kept as `f64` internally; every implementation must round-trip
/// its own legal range exactly.
pub trait AttributeValue: Copy + PartialEq + fmt::Debug + 'static {
    fn to_raw(self) -> f64;
    fn from_raw(raw: f64) -> Self;
}

impl AttributeValue for f64 {
    #[inline]
    fn to_raw(self) -> f64 {
        self
    }

    #[inline]
    fn from_raw(raw: f64) -> Self {
        raw
    }
}

impl AttributeValue for u32 {
    #[inline]
    fn to_raw(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_raw(raw: f64) -> Self {
        raw as u32
    }
}

/// Descriptor for one attribute of owners of type `O`.
pub struct Attribute<O, V> {
    name: &'static str,
    default: V,
    coerce: fn(f64) -> V,
    on_change: Option<fn(&O)>,
}

impl<O, V: Copy> Attribute<O, V> {
    /// An attribute that runs `on_change` after every observed change.
    pub const fn new(
        name: &'static str,
        default: V,
        coerce: fn(f64) -> V,
        on_change: fn(&O),
    ) -> Self {
        Self {
            name,
            default,
            coerce,
            on_change: Some(on_change),
        }
    }

    /// An attribute without a change hook.
    pub const fn detached(name: &'static str, default: V, coerce: fn(f64) -> V) -> Self {
        Self {
            name,
            default,
            coerce,
            on_change: None,
        }
    }

    #[inline]
    pub const fn id(&self) -> AttributeId {
        AttributeId::new(self.name)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Value reported for owners that never wrote this attribute.
    #[inline]
    pub const fn default_value(&self) -> V {
        self.default
    }

    /// Map a raw input into the attribute's legal range.
    #[inline]
    pub fn coerce(&self, raw: f64) -> V {
        (self.coerce)(raw)
    }

    /// Whether writes to this attribute notify anyone.
    #[inline]
    pub const fn has_hook(&self) -> bool {
        self.on_change.is_some()
    }
}

impl<O, V: fmt::Debug> fmt::Debug for Attribute<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("hooked", &self.on_change.is_some())
            .finish()
    }
}

/// Attribute values for every owner of type `O`.
pub struct AttributeStore<O> {
    values: RefCell<FxHashMap<(OwnerId, AttributeId), f64>>,
    _owner: PhantomData<fn(&O)>,
}

impl<O: AttributeOwner> AttributeStore<O> {
    pub fn new() -> Self {
        Self {
            values: RefCell::new(FxHashMap::default()),
            _owner: PhantomData,
        }
    }

    /// Current value, or the attribute's default when never written.
    pub fn get<V: AttributeValue>(&self, owner: &O, attr: &Attribute<O, V>) -> V {
        self.values
            .borrow()
            .get(&(owner.owner_id(), attr.id()))
            .map_or(attr.default, |&raw| V::from_raw(raw))
    }

    /// Whether `owner` has an explicit value for `attr`.
    pub fn is_set<V: AttributeValue>(&self, owner: &O, attr: &Attribute<O, V>) -> bool {
        self.values
            .borrow()
            .contains_key(&(owner.owner_id(), attr.id()))
    }

    /// Coerce and store `value`.
    ///
    /// Returns `true` if the stored value changed. The hook, if any, runs
    /// (or is queued in the active batch) only in that case.
    pub fn set<V: AttributeValue>(&self, owner: &O, attr: &Attribute<O, V>, value: f64) -> bool {
        let next = attr.coerce(value);
        let key = (owner.owner_id(), attr.id());

        let previous = {
            let mut values = self.values.borrow_mut();
            let previous = values
                .get(&key)
                .map_or(attr.default, |&raw| V::from_raw(raw));
            if previous == next {
                return false;
            }
            values.insert(key, next.to_raw());
            previous
        };

        trace!(
            attribute = attr.name,
            owner = key.0.get(),
            ?previous,
            ?next,
            "attribute changed"
        );

        if let Some(hook) = attr.on_change {
            let owner = owner.clone();
            batch::schedule(key, move || hook(&owner));
        }
        true
    }

    /// Drop every value stored for `owner`. No hooks run.
    ///
    /// Returns the number of values removed.
    pub fn clear(&self, owner: OwnerId) -> usize {
        let mut values = self.values.borrow_mut();
        let before = values.len();
        values.retain(|(id, _), _| *id != owner);
        before - values.len()
    }

    /// Number of explicitly stored values across all owners.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl<O: AttributeOwner> Default for AttributeStore<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for AttributeStore<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeStore")
            .field("values", &self.values.borrow().len())
            .finish()
    }
}
