#![forbid(unsafe_code)]

//! Change-hook scheduling shared by every attribute store.

pub mod batch;

pub use batch::BatchScope;
