//! Hexcast Ops
//!
//! The operator library: list and math operators, entity queries, and the
//! media-transfer spells. Operators are stateless unit structs; look them up by
//! pattern name through [`registry`].

pub mod lists;
pub mod math;
pub mod query;
pub mod registry;
pub mod spells;

pub use registry::{lookup, names, resolve};
