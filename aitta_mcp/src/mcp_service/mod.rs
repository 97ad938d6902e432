//! # Aitta MCP Service Implementation
//!
//! `AittaMcpService` implements the `rmcp::ServerHandler` trait and is the
//! central point for handling incoming MCP requests.
//!
//! ## Tool surface
//!
//! - **`list_directory`**: entry names of an allowed directory, with
//!   optional batched progress summaries.
//! - **`read_file`**: UTF-8 contents of an allowed file, gated by the
//!   extension allowlist.
//! - **`read_file_binary`**: base64 contents of any allowed file; the
//!   extension gate does not apply.
//! - **`list_resources`** / **`get_resource`**: descriptors (kind, size,
//!   modification time, applicable tools) for browsing without reading.
//! - **`init`**: accessibility report for the configured directories.
//!
//! ## Error contract
//!
//! Authorization denials and I/O failures surface as tool results flagged
//! with `is_error` and a JSON body of `{code, message}`. Protocol-level
//! errors are reserved for unknown tools and missing required arguments.

mod handlers;

use std::sync::Arc;

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool, ToolsCapability,
    },
    service::{NotificationContext, RequestContext, RoleServer},
};
use tracing;

use crate::guard::AccessGuard;

/// Server handler exposing read-only filesystem access behind the guard.
#[derive(Clone)]
pub struct AittaMcpService {
    pub guard: Arc<AccessGuard>,
}

impl AittaMcpService {
    pub fn new(guard: Arc<AccessGuard>) -> Self {
        Self { guard }
    }
}

#[allow(clippy::manual_async_fn)] // Required by rmcp ServerHandler trait
impl ServerHandler for AittaMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    // The tool set is static.
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some(env!("CARGO_PKG_NAME").to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "Read-only filesystem access scoped to an allowlist of directories"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: None,
        }
    }

    fn on_initialized(
        &self,
        context: NotificationContext<RoleServer>,
    ) -> impl std::future::Future<Output = ()> + Send + '_ {
        async move {
            tracing::info!("Client connected: {context:?}");
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            let mut tools = Vec::new();

            tools.push(Tool {
                name: "list_directory".into(),
                title: Some("list_directory".to_string()),
                icons: None,
                description: Some("List the names of entries in an allowed directory. Set report_progress to receive per-batch counts and timing for large directories.".into()),
                input_schema: self.list_directory_schema(),
                output_schema: None,
                annotations: None,
                execution: None,
                meta: None,
            });

            tools.push(Tool {
                name: "read_file".into(),
                title: Some("read_file".to_string()),
                icons: None,
                description: Some("Read a UTF-8 text file from an allowed directory. Only files whose extension is on the configured allowlist can be read; use read_file_binary for anything else.".into()),
                input_schema: self.read_file_schema(),
                output_schema: None,
                annotations: None,
                execution: None,
                meta: None,
            });

            tools.push(Tool {
                name: "read_file_binary".into(),
                title: Some("read_file_binary".to_string()),
                icons: None,
                description: Some("Read any file from an allowed directory as base64-encoded binary. The extension allowlist does not apply; directory containment still does.".into()),
                input_schema: self.read_file_binary_schema(),
                output_schema: None,
                annotations: None,
                execution: None,
                meta: None,
            });

            tools.push(Tool {
                name: "list_resources".into(),
                title: Some("list_resources".to_string()),
                icons: None,
                description: Some("Describe the files and directories under an allowed directory, or under every allowed directory when none is given. Descriptors carry kind, size, modification time and the tools that accept each path.".into()),
                input_schema: self.list_resources_schema(),
                output_schema: None,
                annotations: None,
                execution: None,
                meta: None,
            });

            tools.push(Tool {
                name: "get_resource".into(),
                title: Some("get_resource".to_string()),
                icons: None,
                description: Some("Describe a single allowed file or directory by path.".into()),
                input_schema: self.get_resource_schema(),
                output_schema: None,
                annotations: None,
                execution: None,
                meta: None,
            });

            tools.push(Tool {
                name: "init".into(),
                title: Some("init".to_string()),
                icons: None,
                description: Some("Check the server's access configuration and report which allowed directories are currently accessible.".into()),
                input_schema: self.init_schema(),
                output_schema: None,
                annotations: None,
                execution: None,
                meta: None,
            });

            Ok(ListToolsResult {
                meta: None,
                tools,
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let args = params.arguments.unwrap_or_default();
            let tool_name = params.name.as_ref();
            tracing::debug!(tool = tool_name, "tools/call received");

            match tool_name {
                "list_directory" => self.handle_list_directory(args).await,
                "read_file" => self.handle_read_file(args).await,
                "read_file_binary" => self.handle_read_file_binary(args).await,
                "list_resources" => self.handle_list_resources(args).await,
                "get_resource" => self.handle_get_resource(args).await,
                "init" => self.handle_init().await,
                _ => {
                    let error_message = format!("Tool '{}' not found.", tool_name);
                    tracing::error!("{}", error_message);
                    Err(McpError::invalid_params(
                        error_message,
                        Some(serde_json::json!({ "tool_name": tool_name })),
                    ))
                }
            }
        }
    }
}
