//! File reading tests for the text and binary paths.
//!
//! Covers:
//! - Exact round-trips for UTF-8 text, including multi-byte characters
//! - The `NOT_TEXT` refusal for files that are not valid UTF-8
//! - Base64 output of the binary path and its indifference to extensions
//! - Containment applying equally to both read paths

use aitta_mcp::ops;
use aitta_mcp::test_utils::SandboxFixture;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

#[test]
fn test_text_read_returns_exact_contents() {
    let sandbox = SandboxFixture::new();
    let contents = "ensimmäinen rivi\ntoinen rivi\n";
    let file = sandbox.write_allowed("notes.txt", contents);
    let guard = sandbox.guard(&["txt"]);

    assert_eq!(ops::read_text(&guard, file.to_str().unwrap()).unwrap(), contents);
}

#[test]
fn test_invalid_utf8_is_refused_with_a_binary_hint() {
    let sandbox = SandboxFixture::new();
    // 0xff can never begin a UTF-8 sequence.
    let file = sandbox.write_allowed("broken.txt", [0xffu8, 0xfe, 0x00, 0x41]);
    let guard = sandbox.guard(&["txt"]);

    let error = ops::read_text(&guard, file.to_str().unwrap()).unwrap_err();
    assert_eq!(error.code(), "NOT_TEXT");
    assert!(
        error.to_string().contains("binary read"),
        "message should point at the binary fallback. Got: {error}"
    );
}

#[test]
fn test_binary_read_encodes_the_exact_bytes() {
    let sandbox = SandboxFixture::new();
    let bytes = [0xffu8, 0xd8, 0xff, 0xe0];
    let file = sandbox.write_allowed("photo.jpg", bytes);
    let guard = sandbox.guard(&["txt"]);

    let binary = ops::read_binary(&guard, file.to_str().unwrap()).unwrap();
    assert_eq!(binary.encoding, "base64");
    assert_eq!(binary.size_bytes, bytes.len() as u64);
    assert_eq!(binary.content_base64, BASE64.encode(bytes));
    assert_eq!(BASE64.decode(&binary.content_base64).unwrap(), bytes);
}

#[test]
fn test_binary_read_ignores_the_extension_gate() {
    let sandbox = SandboxFixture::new();
    let file = sandbox.write_allowed("data.sqlite", [1u8, 2, 3]);
    let guard = sandbox.guard(&["txt"]);

    assert_eq!(
        ops::read_text(&guard, file.to_str().unwrap())
            .unwrap_err()
            .code(),
        "EXTENSION_NOT_ALLOWED"
    );
    assert!(ops::read_binary(&guard, file.to_str().unwrap()).is_ok());
}

#[test]
fn test_binary_read_still_requires_containment() {
    let sandbox = SandboxFixture::new();
    let secret = sandbox.write_outside("secret.bin", [1u8, 2, 3]);
    let guard = sandbox.guard(&["txt"]);

    let error = ops::read_binary(&guard, secret.to_str().unwrap()).unwrap_err();
    assert_eq!(error.code(), "OUTSIDE_ALLOWED_DIRS");
}

#[test]
fn test_binary_read_of_a_directory_is_refused() {
    let sandbox = SandboxFixture::new();
    let dir = sandbox.subdir("archive");
    let guard = sandbox.guard(&["txt"]);

    let error = ops::read_binary(&guard, dir.to_str().unwrap()).unwrap_err();
    assert_eq!(error.code(), "NOT_A_FILE");
}

#[test]
fn test_empty_files_read_as_empty() {
    let sandbox = SandboxFixture::new();
    let file = sandbox.write_allowed("empty.txt", "");
    let guard = sandbox.guard(&["txt"]);

    assert_eq!(ops::read_text(&guard, file.to_str().unwrap()).unwrap(), "");
    let binary = ops::read_binary(&guard, file.to_str().unwrap()).unwrap();
    assert_eq!(binary.content_base64, "");
    assert_eq!(binary.size_bytes, 0);
}

#[test]
fn test_reads_reach_into_nested_subdirectories() {
    let sandbox = SandboxFixture::new();
    sandbox.subdir("a/b/c");
    let file = sandbox.write_allowed("a/b/c/leaf.txt", "deep");
    let guard = sandbox.guard(&["txt"]);

    assert_eq!(ops::read_text(&guard, file.to_str().unwrap()).unwrap(), "deep");
}

#[test]
fn test_several_extensions_can_be_allowed_at_once() {
    let sandbox = SandboxFixture::new();
    let md = sandbox.write_allowed("doc.md", "# title");
    let json = sandbox.write_allowed("data.json", "{}");
    let rs = sandbox.write_allowed("main.rs", "fn main() {}");
    let guard = sandbox.guard(&["md", "json"]);

    assert!(ops::read_text(&guard, md.to_str().unwrap()).is_ok());
    assert!(ops::read_text(&guard, json.to_str().unwrap()).is_ok());
    assert_eq!(
        ops::read_text(&guard, rs.to_str().unwrap())
            .unwrap_err()
            .code(),
        "EXTENSION_NOT_ALLOWED"
    );
}
