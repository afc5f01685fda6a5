#![forbid(unsafe_code)]

//! Layout pass debugging utilities.
//!
//! Provides introspection into grid passes:
//! - Recording of resolved mode, cell sizes, and output rectangles
//! - Detection of items spilling past the panel's content box
//! - A plain-text report across all recorded passes
//!
//! # Feature Gating
//!
//! This module is always compiled (the types are useful for testing),
//! but recording is a no-op unless explicitly enabled at runtime.
//!
//! # Usage
//!
//! ```ignore
//! use gridpanel_layout::debug::LayoutDebugger;
//!
//! let debugger = LayoutDebugger::new();
//! debugger.set_enabled(true);
//! panel.set_debugger(Some(Arc::clone(&debugger)));
//!
//! // ... run layout passes ...
//!
//! for record in debugger.snapshot() {
//!     if record.has_overflow() {
//!         eprintln!("{}", record.summary());
//!     }
//! }
//! ```

use crate::grid::{GridLayout, GridResolver, LayoutMode};
use gridpanel_core::geometry::{Rect, Sides};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Slack for float comparisons against the content box.
const EPSILON: f64 = 1e-6;

/// A record of a single grid pass.
#[derive(Debug, Clone)]
pub struct GridPassRecord {
    /// User-provided name for identification.
    pub name: String,
    /// Mode the pass resolved to.
    pub mode: LayoutMode,
    /// Outer width handed to the resolver.
    pub outer_width: f64,
    /// Width left after box sizing.
    pub inner_width: f64,
    /// Configured column count.
    pub column_count: u32,
    /// Resolved column width.
    pub column_size: f64,
    /// Resolved row height.
    pub row_size: f64,
    /// Border plus padding.
    pub box_sizing: Sides,
    /// The resulting rectangles, indexed like the input items.
    pub result_rects: Vec<Rect>,
    /// Content extent, if any item was placed.
    pub extent: Option<f64>,
    /// Time taken to solve (if measured).
    pub solve_time: Option<Duration>,
}

impl GridPassRecord {
    /// Create a new, empty record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: LayoutMode::default(),
            outer_width: 0.0,
            inner_width: 0.0,
            column_count: 0,
            column_size: 0.0,
            row_size: 0.0,
            box_sizing: Sides::default(),
            result_rects: Vec::new(),
            extent: None,
            solve_time: None,
        }
    }

    /// Capture a finished pass.
    pub fn from_layout(
        name: impl Into<String>,
        resolver: &GridResolver,
        outer_width: f64,
        box_sizing: Sides,
        layout: &GridLayout,
    ) -> Self {
        Self {
            name: name.into(),
            mode: layout.data.mode,
            outer_width,
            inner_width: resolver.inner_width(outer_width),
            column_count: resolver.config().column_count,
            column_size: layout.data.column_size,
            row_size: layout.data.row_size,
            box_sizing,
            result_rects: layout.rects.clone(),
            extent: layout.extent,
            solve_time: None,
        }
    }

    /// Attach the measured solve time (builder pattern).
    #[must_use]
    pub fn with_solve_time(mut self, solve_time: Duration) -> Self {
        self.solve_time = Some(solve_time);
        self
    }

    /// Right edge of the content box in panel coordinates.
    fn content_right(&self) -> f64 {
        self.box_sizing.left + self.inner_width
    }

    /// Check if any rectangle extends past the right edge of the content box.
    ///
    /// Happens in single-column mode when `min_column_size` exceeds the
    /// available width, or when an item's own minimum width is larger than
    /// its cells.
    pub fn has_overflow(&self) -> bool {
        let right = self.content_right();
        self.result_rects
            .iter()
            .any(|r| r.right() > right + EPSILON)
    }

    /// Percentage of the content width covered by the widest item.
    pub fn utilization(&self) -> f64 {
        if self.inner_width <= 0.0 {
            return 0.0;
        }
        let widest = self
            .result_rects
            .iter()
            .map(|r| r.right() - self.box_sizing.left)
            .fold(0.0_f64, f64::max);
        (widest / self.inner_width).min(1.0) * 100.0
    }

    /// Generate a human-readable summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "{} ({}):", self.name, self.mode);
        let _ = writeln!(
            s,
            "  Width: {:.1} outer, {:.1} inner",
            self.outer_width, self.inner_width
        );
        let _ = writeln!(
            s,
            "  Cells: {} cols @ {:.1} x {:.1}",
            self.column_count, self.column_size, self.row_size
        );

        for (i, r) in self.result_rects.iter().enumerate() {
            let _ = writeln!(
                s,
                "  [{i}] ({:.1},{:.1} {:.1}x{:.1})",
                r.x, r.y, r.width, r.height
            );
        }

        match self.extent {
            Some(extent) => {
                let _ = writeln!(s, "  Extent: {extent:.1}");
            }
            None => {
                let _ = writeln!(s, "  Extent: none (no items)");
            }
        }
        let _ = writeln!(s, "  Utilization: {:.1}%", self.utilization());
        if self.has_overflow() {
            let _ = writeln!(s, "  ⚠ OVERFLOW");
        }
        if let Some(t) = self.solve_time {
            let _ = writeln!(s, "  Solve time: {:?}", t);
        }
        s
    }
}

/// Layout pass debugger.
///
/// Collects pass records for introspection. Thread-safe via internal
/// synchronization; can be shared across the application.
#[derive(Debug)]
pub struct LayoutDebugger {
    enabled: AtomicBool,
    records: Mutex<Vec<GridPassRecord>>,
}

impl LayoutDebugger {
    /// Create a new debugger wrapped in Arc (disabled by default).
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            enabled: AtomicBool::new(false),
            records: Mutex::new(Vec::new()),
        })
    }

    /// Check if debugging is enabled.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enable or disable debugging.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Toggle debugging on/off. Returns the new state.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::Relaxed)
    }

    /// Clear all recorded data.
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }

    /// Record a pass.
    pub fn record(&self, record: GridPassRecord) {
        if !self.enabled() {
            return;
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    /// Get a snapshot of all records.
    pub fn snapshot(&self) -> Vec<GridPassRecord> {
        self.records
            .lock()
            .ok()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Get records with overflow conditions.
    pub fn overflows(&self) -> Vec<GridPassRecord> {
        self.snapshot()
            .into_iter()
            .filter(|r| r.has_overflow())
            .collect()
    }

    /// Generate a summary report of all recorded passes.
    pub fn report(&self) -> String {
        let records = self.snapshot();
        let single = records
            .iter()
            .filter(|r| r.mode == LayoutMode::SingleColumn)
            .count();

        let mut s = String::new();
        let _ = writeln!(
            s,
            "=== Layout Debug Report ({} passes, {} single-column) ===",
            records.len(),
            single
        );

        let overflows: Vec<_> = records.iter().filter(|r| r.has_overflow()).collect();
        if !overflows.is_empty() {
            let _ = writeln!(s, "\n⚠ {} passes have OVERFLOW:", overflows.len());
            for r in &overflows {
                let _ = writeln!(s, "  - {}", r.name);
            }
        }

        for record in &records {
            let _ = write!(s, "\n{}", record.summary());
        }
        s
    }
}
