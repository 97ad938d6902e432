//! # Shell Module
//!
//! Entry point and CLI logic for the `aitta_mcp` binary: argument parsing,
//! logging setup, allowlist assembly, and the stdio server mode.

pub mod cli;
pub mod server;

pub use cli::{Cli, run};
