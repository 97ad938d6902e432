//! Test helper utilities for Aitta MCP.
//!
//! Reusable helpers for integration and unit tests: temporary sandbox
//! scaffolding and MCP client conveniences. These APIs are intended for
//! test-only code paths.

pub mod client;
pub mod project;

pub use client::{ClientBuilder, get_workspace_dir};
pub use project::SandboxFixture;
