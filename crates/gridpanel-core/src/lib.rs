#![forbid(unsafe_code)]

//! Core: geometry primitives shared by the gridpanel crates.
//!
//! # Role in gridpanel
//! `gridpanel-core` is the vocabulary layer. It owns the pixel rectangle,
//! box-sizing sides, and per-item size limits that both the pure solver
//! (`gridpanel-layout`) and the reactive runtime (`gridpanel-runtime`)
//! exchange.
//!
//! # How it fits in the system
//! The solver turns configuration plus placements into [`geometry::Rect`]
//! values; the runtime applies those rectangles to items. Neither side needs
//! anything from this crate beyond plain `Copy` data.

pub mod geometry;

pub use geometry::{Rect, Sides, SizeLimits, clamp_to};
