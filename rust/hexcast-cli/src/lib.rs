//! Hexcast CLI support: scenario files and the `init`/`ops` commands for the
//! `hexcast` binary.

pub mod commands;
pub mod scenario;
