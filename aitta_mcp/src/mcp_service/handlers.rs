use rmcp::model::{CallToolResult, Content, ErrorData as McpError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing;

use super::AittaMcpService;
use crate::ops::{self, DEFAULT_BATCH_SIZE, OpError};

impl AittaMcpService {
    /// Pulls a required string argument out of the JSON args.
    ///
    /// A missing or mistyped required argument is a protocol fault, not a
    /// tool-level error, so this is the one place a handler raises instead
    /// of returning a tagged result.
    fn require_string_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str, McpError> {
        args.get(key).and_then(Value::as_str).ok_or_else(|| {
            McpError::invalid_params(
                format!("Missing required string parameter '{key}'."),
                Some(serde_json::json!({ "parameter": key })),
            )
        })
    }

    fn optional_string_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        args.get(key).and_then(Value::as_str)
    }

    fn bool_arg(args: &Map<String, Value>, key: &str) -> bool {
        args.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Reads `batch_size`, defaulting when absent. Zero, negative, and
    /// non-integer values are caller errors reported as tagged results.
    fn batch_size_arg(args: &Map<String, Value>) -> Result<usize, OpError> {
        match args.get("batch_size") {
            None => Ok(DEFAULT_BATCH_SIZE),
            Some(value) => match value.as_i64() {
                Some(size) if size >= 1 => Ok(size as usize),
                _ => Err(OpError::InvalidArgument(format!(
                    "batch_size must be a positive integer, got {value}"
                ))),
            },
        }
    }

    fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, McpError> {
        serde_json::to_string_pretty(value).map_err(|e| {
            tracing::error!("Serialization error: {}", e);
            McpError::internal_error(format!("Failed to serialize response: {e}"), None)
        })
    }

    /// Wraps an operation failure as an error-flagged tool result carrying
    /// the stable code and message. Denials never become protocol errors.
    fn error_result(error: &OpError) -> CallToolResult {
        let payload = serde_json::json!({
            "code": error.code(),
            "message": error.to_string(),
        });
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        let mut result = CallToolResult::success(vec![Content::text(text)]);
        result.is_error = Some(true);
        result
    }

    pub fn list_directory_schema(&self) -> Arc<Map<String, Value>> {
        let mut properties = Map::new();
        properties.insert(
            "directory".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "Path of the directory to list. Must be inside an allowed directory.",
                "format": "path"
            }),
        );
        properties.insert(
            "batch_size".to_string(),
            serde_json::json!({
                "type": "integer",
                "minimum": 1,
                "default": DEFAULT_BATCH_SIZE,
                "description": "Entries per progress batch when report_progress is set"
            }),
        );
        properties.insert(
            "report_progress".to_string(),
            serde_json::json!({
                "type": "boolean",
                "default": false,
                "description": "Include per-batch counts and timing in the result"
            }),
        );

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert(
            "required".to_string(),
            Value::Array(vec![Value::String("directory".to_string())]),
        );
        Arc::new(schema)
    }

    pub fn read_file_schema(&self) -> Arc<Map<String, Value>> {
        let mut properties = Map::new();
        properties.insert(
            "file_path".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "Path of the file to read. Must be inside an allowed directory and have an allowed extension.",
                "format": "path"
            }),
        );

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert(
            "required".to_string(),
            Value::Array(vec![Value::String("file_path".to_string())]),
        );
        Arc::new(schema)
    }

    pub fn read_file_binary_schema(&self) -> Arc<Map<String, Value>> {
        let mut properties = Map::new();
        properties.insert(
            "file_path".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "Path of the file to read as base64. Must be inside an allowed directory; any extension is accepted.",
                "format": "path"
            }),
        );

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert(
            "required".to_string(),
            Value::Array(vec![Value::String("file_path".to_string())]),
        );
        Arc::new(schema)
    }

    pub fn list_resources_schema(&self) -> Arc<Map<String, Value>> {
        let mut properties = Map::new();
        properties.insert(
            "directory".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "Directory to describe. When omitted, every allowed directory is enumerated.",
                "format": "path"
            }),
        );
        properties.insert(
            "batch_size".to_string(),
            serde_json::json!({
                "type": "integer",
                "minimum": 1,
                "default": DEFAULT_BATCH_SIZE,
                "description": "Resources per progress batch when report_progress is set"
            }),
        );
        properties.insert(
            "report_progress".to_string(),
            serde_json::json!({
                "type": "boolean",
                "default": false,
                "description": "Include per-batch counts and timing in the result"
            }),
        );

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        Arc::new(schema)
    }

    pub fn get_resource_schema(&self) -> Arc<Map<String, Value>> {
        let mut properties = Map::new();
        properties.insert(
            "path".to_string(),
            serde_json::json!({
                "type": "string",
                "description": "Path of the file or directory to describe",
                "format": "path"
            }),
        );

        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert(
            "required".to_string(),
            Value::Array(vec![Value::String("path".to_string())]),
        );
        Arc::new(schema)
    }

    pub fn init_schema(&self) -> Arc<Map<String, Value>> {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema.insert("properties".to_string(), Value::Object(Map::new()));
        Arc::new(schema)
    }

    /// Handles the `list_directory` tool call.
    pub async fn handle_list_directory(
        &self,
        args: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let directory = Self::require_string_arg(&args, "directory")?;
        let report_progress = Self::bool_arg(&args, "report_progress");
        let batch_size = match Self::batch_size_arg(&args) {
            Ok(size) => size,
            Err(error) => return Ok(Self::error_result(&error)),
        };

        match ops::list_directory(&self.guard, directory, batch_size, report_progress) {
            Ok(listing) => {
                // Without progress reporting the result is just the names;
                // with it, the full listing including batch summaries.
                let text = if listing.batches.is_some() {
                    Self::to_pretty_json(&listing)?
                } else {
                    Self::to_pretty_json(&listing.entries)?
                };
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(error) => Ok(Self::error_result(&error)),
        }
    }

    /// Handles the `read_file` tool call. The file contents are returned
    /// verbatim, not wrapped in JSON.
    pub async fn handle_read_file(
        &self,
        args: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let file_path = Self::require_string_arg(&args, "file_path")?;
        match ops::read_text(&self.guard, file_path) {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(error) => Ok(Self::error_result(&error)),
        }
    }

    /// Handles the `read_file_binary` tool call.
    pub async fn handle_read_file_binary(
        &self,
        args: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let file_path = Self::require_string_arg(&args, "file_path")?;
        match ops::read_binary(&self.guard, file_path) {
            Ok(binary) => Ok(CallToolResult::success(vec![Content::text(
                Self::to_pretty_json(&binary)?,
            )])),
            Err(error) => Ok(Self::error_result(&error)),
        }
    }

    /// Handles the `list_resources` tool call.
    pub async fn handle_list_resources(
        &self,
        args: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let directory = Self::optional_string_arg(&args, "directory");
        let report_progress = Self::bool_arg(&args, "report_progress");
        let batch_size = match Self::batch_size_arg(&args) {
            Ok(size) => size,
            Err(error) => return Ok(Self::error_result(&error)),
        };

        match ops::collect_resources(&self.guard, directory, batch_size, report_progress) {
            Ok(listing) => {
                let text = if listing.batches.is_some() {
                    Self::to_pretty_json(&listing)?
                } else {
                    Self::to_pretty_json(&listing.resources)?
                };
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(error) => Ok(Self::error_result(&error)),
        }
    }

    /// Handles the `get_resource` tool call.
    pub async fn handle_get_resource(
        &self,
        args: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let path = Self::require_string_arg(&args, "path")?;
        match ops::describe_resource(&self.guard, path) {
            Ok(descriptor) => Ok(CallToolResult::success(vec![Content::text(
                Self::to_pretty_json(&descriptor)?,
            )])),
            Err(error) => Ok(Self::error_result(&error)),
        }
    }

    /// Handles the `init` tool call: re-probe the configured directories and
    /// report their accessibility.
    pub async fn handle_init(&self) -> Result<CallToolResult, McpError> {
        let report = ops::check_configuration(&self.guard);
        let message = if report.is_empty() {
            "No allowed directories configured - all access will be denied".to_string()
        } else if report.all_accessible() {
            "OK".to_string()
        } else {
            format!(
                "Some allowed directories are not accessible: {} of {} unavailable",
                report.inaccessible_dirs.len(),
                report.total_allowed
            )
        };
        let is_error = !report.all_accessible();
        let payload = serde_json::json!({
            "message": message,
            "isError": is_error,
            "details": report,
        });

        let mut result =
            CallToolResult::success(vec![Content::text(Self::to_pretty_json(&payload)?)]);
        if is_error {
            result.is_error = Some(true);
        }
        Ok(result)
    }
}
