//! CLI subcommand implementations.

pub mod candidates;
pub mod common;
pub mod config;
pub mod fetch;
pub mod locate;
pub mod travel;
