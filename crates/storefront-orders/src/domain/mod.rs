//! Order domain.

pub mod commands;
