//! Hexcast RT — the operator execution protocol.
//!
//! Provides the casting environment seam, the operator contract with its
//! evaluate/commit split, argument extraction, a reference dispatcher that
//! sequences operators and accounts for media, configuration loading, and an
//! in-memory sandbox world for tests and tooling.
#![warn(clippy::all)]

pub mod action;
pub mod args;
pub mod config;
pub mod env;
pub mod harness;
pub mod sandbox;

// Re-export the value model so operator crates need a single dependency.
pub use hexcast_core::{entity, iota, item, media, mishap, particles};
