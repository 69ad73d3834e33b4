//! CLI, config loading, fetch/filter/format/merge pipeline
//!
//! This crate provides the `evsync` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;

pub use cli::Cli;
pub use config::{Config, ResolvedConfig, RunSettings};
pub use error::{ClientError, ClientResult};
pub use pipeline::{Pipeline, RunSummary};
