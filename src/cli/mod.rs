//! CLI module
//!
//! Command-line interface and HTTP front door for the execution engine.
//!
//! # Commands
//!
//! - `execute` - Run one endpoint and print the execution result
//! - `validate` - Check a connector definition
//! - `endpoints` - List endpoint ids, methods and paths
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, ApiError, AppState, ServerConfig, USER_ID_HEADER};
