//! Golden checksum verification for grid passes.
//!
//! Every scenario is solved several ways that must agree bit for bit:
//! repeated solves, split `layout_data` + `place` calls, and solves over a
//! shuffled copy of the input (mapped back to the original order). BLAKE3
//! digests of the raw rectangle bits make mismatches cheap to report.
//!
//! Run with: `cargo test -p gridpanel-layout --test golden_layout -- --nocapture`

use gridpanel_layout::{
    GridItem, GridLayout, GridResolver, ItemPlacement, LayoutMode, PanelConfig, Rect, Sides,
    SizeLimits,
};
use serde_json::json;
use std::io::Write as _;
use std::time::Instant;

// ============================================================================
// JSONL logging
// ============================================================================

struct JsonlLog {
    entries: Vec<serde_json::Value>,
}

impl JsonlLog {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn emit(&mut self, entry: serde_json::Value) {
        self.entries.push(entry);
    }

    fn flush(&self, test_name: &str) {
        let mut stderr = std::io::stderr().lock();
        for entry in &self.entries {
            let _ = writeln!(stderr, "[GOLDEN] {test_name}: {entry}");
        }
    }
}

fn elapsed_ns(start: &Instant) -> u64 {
    start.elapsed().as_nanos() as u64
}

// ============================================================================
// Helpers
// ============================================================================

/// Deterministic xorshift32 PRNG.
fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// BLAKE3 digest over the raw bits of every rect plus the extent.
fn layout_checksum(layout: &GridLayout) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(layout.data.mode.as_str().as_bytes());
    for rect in &layout.rects {
        for bits in rect.to_bits() {
            hasher.update(&bits.to_le_bytes());
        }
    }
    if let Some(extent) = layout.extent {
        hasher.update(&extent.to_bits().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Build `n` items with distinct (row, column) keys.
fn scattered_items(n: usize, seed: u32) -> Vec<GridItem> {
    let mut state = seed.max(1);
    (0..n)
        .map(|i| {
            let r = xorshift32(&mut state);
            let placement = ItemPlacement::at(i as u32 / 4, (i as u32 % 4) * 3 + r % 3)
                .span(1 + r % 3, 1 + (r >> 4) % 6);
            let limits = match r % 5 {
                0 => SizeLimits::at_most(70.0, f64::INFINITY),
                1 => SizeLimits::flexible(0.0, 90.0),
                _ => SizeLimits::UNBOUNDED,
            };
            GridItem::new(placement).limits(limits)
        })
        .collect()
}

/// Shuffle with a seeded Fisher-Yates; returns the permutation applied.
fn shuffled(items: &[GridItem], seed: u32) -> (Vec<GridItem>, Vec<usize>) {
    let mut state = seed.max(1);
    let mut perm: Vec<usize> = (0..items.len()).collect();
    for i in (1..perm.len()).rev() {
        let j = xorshift32(&mut state) as usize % (i + 1);
        perm.swap(i, j);
    }
    (perm.iter().map(|&i| items[i]).collect(), perm)
}

fn unshuffle(layout: &GridLayout, perm: &[usize]) -> GridLayout {
    let mut rects = vec![Rect::default(); perm.len()];
    for (pos, &original) in perm.iter().enumerate() {
        rects[original] = layout.rects[pos];
    }
    GridLayout {
        rects,
        visit_order: Vec::new(),
        ..layout.clone()
    }
}

struct Scenario {
    name: &'static str,
    config: PanelConfig,
    box_sizing: Sides,
    width: f64,
    items: usize,
}

fn scenarios() -> Vec<Scenario> {
    let base = PanelConfig::default();
    vec![
        Scenario {
            name: "default_boundary_grid",
            config: base,
            box_sizing: Sides::default(),
            width: 688.0,
            items: 24,
        },
        Scenario {
            name: "default_boundary_stacked",
            config: base,
            box_sizing: Sides::default(),
            width: 687.0,
            items: 24,
        },
        Scenario {
            name: "wide_golden_ratio",
            config: PanelConfig {
                aspect_ratio: 0.618,
                ..base
            },
            box_sizing: Sides::all(6.0),
            width: 1920.0,
            items: 48,
        },
        Scenario {
            name: "capped_cells",
            config: PanelConfig {
                max_column_size: 90.0,
                max_row_size: 60.0,
                ..base
            },
            box_sizing: Sides::new(2.0, 4.0, 2.0, 4.0),
            width: 2560.0,
            items: 32,
        },
        Scenario {
            name: "four_columns_no_gaps",
            config: PanelConfig {
                column_count: 4,
                row_spacing: 0,
                column_spacing: 0,
                ..base
            },
            box_sizing: Sides::default(),
            width: 333.3,
            items: 16,
        },
        Scenario {
            name: "min_exceeds_max",
            config: PanelConfig {
                min_column_size: 80.0,
                max_column_size: 40.0,
                ..base
            },
            box_sizing: Sides::default(),
            width: 1500.0,
            items: 12,
        },
        Scenario {
            name: "zero_aspect",
            config: PanelConfig {
                aspect_ratio: 0.0,
                min_row_size: 0.0,
                ..base
            },
            box_sizing: Sides::default(),
            width: 1288.0,
            items: 8,
        },
    ]
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn golden_repeated_and_split_solves_match() {
    let mut log = JsonlLog::new();

    for (idx, scenario) in scenarios().into_iter().enumerate() {
        let start = Instant::now();
        let resolver = GridResolver::new(scenario.config).box_sizing(scenario.box_sizing);
        let items = scattered_items(scenario.items, 0xC0FFEE + idx as u32);

        let first = resolver.solve(scenario.width, &items);
        let second = resolver.solve(scenario.width, &items);
        let data = resolver.layout_data(scenario.width);
        let split = resolver.place(&data, &items);

        let golden = layout_checksum(&first);
        assert_eq!(golden, layout_checksum(&second), "{}: repeat", scenario.name);
        assert_eq!(golden, layout_checksum(&split), "{}: split", scenario.name);

        log.emit(json!({
            "scenario": scenario.name,
            "mode": first.data.mode.as_str(),
            "items": items.len(),
            "checksum": golden,
            "elapsed_ns": elapsed_ns(&start),
        }));
    }

    log.flush("golden_repeated_and_split_solves_match");
}

#[test]
fn golden_input_order_only_permutes_output() {
    let mut log = JsonlLog::new();

    for (idx, scenario) in scenarios().into_iter().enumerate() {
        let resolver = GridResolver::new(scenario.config).box_sizing(scenario.box_sizing);
        let items = scattered_items(scenario.items, 0xBEEF + idx as u32);
        let reference = resolver.solve(scenario.width, &items);

        for shuffle_seed in [7_u32, 99, 12345] {
            let (mixed, perm) = shuffled(&items, shuffle_seed);
            let restored = unshuffle(&resolver.solve(scenario.width, &mixed), &perm);
            assert_eq!(
                layout_checksum(&reference),
                layout_checksum(&restored),
                "{}: shuffle seed {shuffle_seed}",
                scenario.name
            );
        }

        log.emit(json!({
            "scenario": scenario.name,
            "mode": reference.data.mode.as_str(),
            "checksum": layout_checksum(&reference),
        }));
    }

    log.flush("golden_input_order_only_permutes_output");
}

#[test]
fn golden_modes_match_expectations() {
    let modes: Vec<LayoutMode> = scenarios()
        .iter()
        .map(|s| {
            GridResolver::new(s.config)
                .box_sizing(s.box_sizing)
                .layout_data(s.width)
                .mode
        })
        .collect();
    assert_eq!(
        modes,
        vec![
            LayoutMode::Grid,
            LayoutMode::SingleColumn,
            LayoutMode::Grid,
            LayoutMode::Grid,
            LayoutMode::Grid,
            LayoutMode::Grid,
            LayoutMode::Grid,
        ]
    );
}

#[test]
fn golden_hand_computed_grid() {
    // column 100, row 100, spacing 8
    let resolver = GridResolver::new(PanelConfig::default());
    let items = [
        GridItem::new(ItemPlacement::at(0, 0).span(2, 6)),
        GridItem::new(ItemPlacement::at(0, 6).span(1, 6)),
        GridItem::new(ItemPlacement::at(1, 6).span(1, 3)),
        GridItem::new(ItemPlacement::at(1, 9).span(1, 3)),
    ];
    let layout = resolver.solve(1288.0, &items);
    assert_eq!(
        layout.rects,
        vec![
            Rect::new(0.0, 0.0, 640.0, 208.0),
            Rect::new(648.0, 0.0, 640.0, 100.0),
            Rect::new(648.0, 108.0, 316.0, 100.0),
            Rect::new(972.0, 108.0, 316.0, 100.0),
        ]
    );
    assert_eq!(layout.extent, Some(208.0));
}
