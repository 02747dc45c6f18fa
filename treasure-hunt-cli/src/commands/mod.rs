//! CLI subcommand implementations.

pub mod clear;
pub mod common;
pub mod config;
pub mod hunt;
pub mod list;
pub mod place;
