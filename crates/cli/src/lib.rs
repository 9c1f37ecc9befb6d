//! Command-line surface for f4scan.

pub mod commands;
