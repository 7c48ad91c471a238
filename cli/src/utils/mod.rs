//! Shared helpers for command implementations

pub mod args;
pub mod formatting;
