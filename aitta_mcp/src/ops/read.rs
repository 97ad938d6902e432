//! Text and binary file reads.
//!
//! The text path enforces the extension gate and requires valid UTF-8. The
//! binary path serves any regular file inside the allowed directories as
//! base64, deliberately bypassing the extension gate; containment is the
//! security boundary, the gate only keeps accidental binary reads out of the
//! text path.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use schemars::JsonSchema;
use serde::Serialize;

use crate::guard::{AccessGuard, AccessKind, DenyReason};

use super::OpError;

/// Payload returned by the binary read.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BinaryContent {
    /// Canonical path that was read.
    pub path: String,
    pub content_base64: String,
    /// Always `"base64"`.
    pub encoding: String,
    /// Decoded length in bytes.
    pub size_bytes: u64,
}

/// Read an authorized file as UTF-8 text. The extension gate applies.
pub fn read_text(guard: &AccessGuard, file_path: &str) -> Result<String, OpError> {
    let authorized = guard.authorize(file_path, AccessKind::Read)?;
    let bytes = std::fs::read(authorized.canonical()).map_err(|source| OpError::Io {
        path: authorized.canonical().to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %authorized.canonical().display(),
        size = bytes.len(),
        "read text file"
    );
    String::from_utf8(bytes).map_err(|_| OpError::NotText {
        path: authorized.canonical().to_path_buf(),
    })
}

/// Read any authorized regular file as base64. No extension gate.
pub fn read_binary(guard: &AccessGuard, file_path: &str) -> Result<BinaryContent, OpError> {
    let authorized = guard.inspect(file_path)?;
    if !authorized.is_file() {
        return Err(DenyReason::NotAFile.into());
    }
    let bytes = std::fs::read(authorized.canonical()).map_err(|source| OpError::Io {
        path: authorized.canonical().to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %authorized.canonical().display(),
        size = bytes.len(),
        "read binary file"
    );
    Ok(BinaryContent {
        path: authorized.canonical().display().to_string(),
        size_bytes: bytes.len() as u64,
        content_base64: BASE64.encode(&bytes),
        encoding: "base64".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SandboxFixture;

    #[test]
    fn test_text_read_returns_contents() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("notes.txt", "hello sandbox\n");
        let guard = sandbox.guard(&["txt"]);

        let text = read_text(&guard, file.to_str().unwrap()).unwrap();
        assert_eq!(text, "hello sandbox\n");
    }

    #[test]
    fn test_text_read_rejects_non_utf8_bytes() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("raw.txt", [0xffu8, 0xfe, 0x00, 0x01]);
        let guard = sandbox.guard(&["txt"]);

        let error = read_text(&guard, file.to_str().unwrap()).unwrap_err();
        assert_eq!(error.code(), "NOT_TEXT");
    }

    #[test]
    fn test_binary_read_bypasses_the_extension_gate() {
        let sandbox = SandboxFixture::new();
        let file = sandbox.write_allowed("image.bin", [0xffu8, 0xd8, 0xff, 0xe0]);
        let guard = sandbox.guard(&["txt"]);

        let gated = read_text(&guard, file.to_str().unwrap()).unwrap_err();
        assert_eq!(gated.code(), "EXTENSION_NOT_ALLOWED");

        let binary = read_binary(&guard, file.to_str().unwrap()).unwrap();
        assert_eq!(binary.size_bytes, 4);
        assert_eq!(binary.encoding, "base64");
        assert_eq!(binary.content_base64, "/9j/4A==");
        assert_eq!(binary.path, file.display().to_string());
    }

    #[test]
    fn test_binary_read_of_a_directory_is_not_a_file() {
        let sandbox = SandboxFixture::new();
        let dir = sandbox.subdir("inner");
        let guard = sandbox.guard(&["txt"]);

        let error = read_binary(&guard, dir.to_str().unwrap()).unwrap_err();
        assert_eq!(error.code(), "NOT_A_FILE");
    }

    #[test]
    fn test_binary_read_still_respects_containment() {
        let sandbox = SandboxFixture::new();
        let secret = sandbox.write_outside("secret.bin", [1u8, 2, 3]);
        let guard = sandbox.guard(&["txt"]);

        let error = read_binary(&guard, secret.to_str().unwrap()).unwrap_err();
        assert_eq!(error.code(), "OUTSIDE_ALLOWED_DIRS");
    }
}
