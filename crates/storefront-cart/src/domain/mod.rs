//! Cart domain: commands, quantity rules and totals.

pub mod commands;
pub mod policy;
pub mod totals;
