//! Command-line interface: argument definitions, command implementations
//! and shell completions.

pub mod args;
pub mod commands;
pub mod completions;
