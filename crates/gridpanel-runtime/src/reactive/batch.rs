#![forbid(unsafe_code)]

//! Deferred attribute hooks.
//!
//! Writing several attributes in a row (applying a loaded config, moving an
//! item to a new cell) changes several values, each with its own hook. While
//! a [`BatchScope`] is alive the store queues those hooks instead of running
//! them, one slot per `(owner, attribute)`, and the outermost scope runs the
//! queue when it drops.
//!
//! # Usage
//!
//! ```ignore
//! use gridpanel_runtime::BatchScope;
//!
//! {
//!     let _batch = BatchScope::new();
//!     store.set_item(&item, &item_attr::ROW, 3.0);     // queued
//!     store.set_item(&item, &item_attr::COLUMN, 4.0);  // queued
//!     store.set_item(&item, &item_attr::ROW, 5.0);     // reuses the ROW slot
//! }  // two hooks run here
//! ```
//!
//! # Invariants
//!
//! 1. Scopes nest; only the outermost one runs the queue.
//! 2. Stored values update immediately; only hooks wait.
//! 3. A slot keeps the position of its first write and the hook of its last.
//! 4. The queue is detached from the thread before any hook runs, so a hook
//!    that writes attributes sees no batch and runs its own hooks inline.
//!
//! # Failure Modes
//!
//! - **Hook panics while the queue runs**: the hooks after it are dropped
//!   unrun. The thread is left without an active batch, so the next scope
//!   starts clean. Under the release profile (`panic = "abort"`) the
//!   process stops instead.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use tracing::{info, info_span};
use web_time::Instant;

use crate::attribute::{AttributeId, OwnerId};

/// Slot identity for a queued hook.
pub(crate) type HookKey = (OwnerId, AttributeId);

type Hook = Box<dyn FnOnce()>;

#[derive(Default)]
struct HookQueue {
    depth: u32,
    hooks: Vec<Hook>,
    slots: FxHashMap<HookKey, usize>,
    /// Value-changing writes routed through the queue.
    writes: u64,
}

impl HookQueue {
    fn push(&mut self, key: HookKey, hook: Hook) {
        self.writes = self.writes.saturating_add(1);
        match self.slots.get(&key) {
            Some(&slot) => self.hooks[slot] = hook,
            None => {
                self.slots.insert(key, self.hooks.len());
                self.hooks.push(hook);
            }
        }
    }

    fn run(self) {
        let Self { hooks, writes, .. } = self;
        if hooks.is_empty() {
            return;
        }

        let hooks_fired = hooks.len() as u64;
        let start = Instant::now();
        let span = info_span!(
            "gridpanel.attribute_flush",
            writes,
            hooks_fired,
            duration_us = tracing::field::Empty
        );
        let _guard = span.enter();

        for hook in hooks {
            hook();
        }

        let duration_us = start.elapsed().as_micros() as u64;
        span.record("duration_us", duration_us);
        info!(writes, hooks_fired, duration_us, "attribute hooks flushed");
    }
}

thread_local! {
    static QUEUE: RefCell<Option<HookQueue>> = const { RefCell::new(None) };
}

/// Run `hook` now, or queue it under `key` if a batch is open.
///
/// Returns `true` if the hook was queued.
pub(crate) fn schedule(key: HookKey, hook: impl FnOnce() + 'static) -> bool {
    let queued = QUEUE.with(|queue| match queue.borrow_mut().as_mut() {
        Some(open) => {
            open.push(key, Box::new(hook));
            None
        }
        None => Some(hook),
    });
    match queued {
        None => true,
        Some(hook) => {
            hook();
            false
        }
    }
}

/// RAII guard that holds attribute hooks until the outermost scope drops.
#[must_use]
pub struct BatchScope {
    is_root: bool,
}

impl BatchScope {
    pub fn new() -> Self {
        let is_root = QUEUE.with(|queue| {
            let mut queue = queue.borrow_mut();
            let open = queue.get_or_insert_with(HookQueue::default);
            open.depth += 1;
            open.depth == 1
        });
        Self { is_root }
    }

    /// Distinct hooks waiting in the open batch.
    pub fn pending_count(&self) -> usize {
        QUEUE.with(|queue| queue.borrow().as_ref().map_or(0, |open| open.hooks.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let finished = QUEUE.with(|queue| {
            let mut queue = queue.borrow_mut();
            let open = queue.as_mut()?;
            open.depth = open.depth.saturating_sub(1);
            if open.depth == 0 { queue.take() } else { None }
        });
        if let Some(finished) = finished {
            finished.run();
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}
