//! # Aitta MCP
//!
//! Aitta (Finnish for a storehouse on stilts) is a filesystem access server for
//! AI agents, speaking the Model Context Protocol (MCP) over stdio.
//!
//! ## Core Mission
//!
//! `aitta_mcp` exposes a narrow, read-only window onto the local filesystem.
//! The operator decides which directory trees and which file extensions are
//! visible; everything else is denied with a machine-readable reason. The AI
//! agent on the other end of the pipe can browse, read, and enumerate, but it
//! can never write, and it can never see outside the allowlist.
//!
//! ## Key Behaviors
//!
//! - **Allowlist Scoping**: Access is granted per directory tree, configured via
//!   `config.json` or CLI flags. No configuration means no access.
//! - **Symlink-Safe Containment**: Paths are fully resolved (symlinks, `..`, `.`)
//!   *before* the containment check, so links cannot smuggle reads outside the
//!   allowed trees.
//! - **Extension Gate**: Text reads are additionally filtered by extension.
//!   Binary reads bypass the gate but still honor directory containment.
//! - **Structured Denials**: Every refusal carries a stable code
//!   (`OUTSIDE_ALLOWED_DIRS`, `EXTENSION_NOT_ALLOWED`, `NOT_FOUND`, ...) in the
//!   tool result rather than a protocol error, so agents can branch on it.
//! - **Batched Enumeration**: Directory listings can report per-batch progress
//!   for large trees without holding the client in the dark.
//!
//! ## Architecture
//!
//! A request flows through three layers:
//!
//! 1. **`mcp_service`**: The `rmcp::ServerHandler` implementation. Parses tool
//!    arguments, dispatches, and renders results or tagged errors.
//! 2. **`ops`**: The operations themselves (list, read, catalog, availability).
//!    Pure functions over an [`AccessGuard`], independent of the wire protocol.
//! 3. **`guard`**: The security core. Normalizes paths, enforces directory
//!    containment and the extension allowlist, and classifies filesystem nodes.
//!
//! ## Modules
//!
//! - **`config`**: `config.json` loading and CLI merging.
//! - **`guard`**: Path normalization, allowlist policy, access decisions.
//! - **`ops`**: Directory listing, file reads, resource catalog, startup checks.
//! - **`mcp_service`**: MCP tool surface and argument handling.
//! - **`shell`**: CLI entry point and server lifecycle.
//! - **`utils`**: Logging setup.

// Public modules
pub mod config;
pub mod guard;
pub mod mcp_service;
pub mod ops;
pub mod shell;
pub mod utils;

// Test utilities
pub mod test_utils;

// Re-export main types for easier use
pub use guard::{AccessGuard, AllowlistPolicy};

pub use mcp_service::AittaMcpService;
