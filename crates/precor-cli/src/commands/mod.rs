//! CLI subcommands.

pub mod batch;
pub mod calculate;
pub mod config;
pub mod index;
pub mod process;
