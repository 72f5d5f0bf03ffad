//! Utility functions for string manipulation, file system checks, and the
//! repository pull.
//!
//! This module provides helper functions used throughout the application:
//! - Character-based prefix slicing for previews and duplicate checks
//! - Filename sanitizing for vault exports
//! - String truncation for logging
//! - File system validation for output directories
//! - Best-effort `git pull` for the sync pipeline

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// First `n` characters of a string as a borrowed slice.
///
/// Slicing is by `char`, never by byte, so this is safe on multibyte
/// content. Returns the whole string if it is shorter than `n`.
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and a
/// byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head = char_prefix(s, max);
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Sanitize a title for use in a vault filename.
///
/// Strips characters that are invalid in filenames on common platforms and
/// caps the result at 50 characters, matching the vault's naming scheme
/// `{date}_{title}.md`.
pub fn safe_filename_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    char_prefix(&cleaned, 50).to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Run `git pull origin main` in the given repository directory.
///
/// Used by the sync pipeline to pick up posts committed by other machines
/// before exporting to the vault. Failures are logged and reported but the
/// caller treats them as non-fatal.
#[instrument(level = "info", skip_all, fields(repo_dir = %repo_dir))]
pub async fn git_pull(repo_dir: &str) -> Result<(), Box<dyn Error>> {
    let output = Command::new("git")
        .args(["pull", "origin", "main"])
        .current_dir(repo_dir)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if output.status.success() {
        info!(output = %stdout.trim(), "git pull completed");
        Ok(())
    } else {
        warn!(status = ?output.status.code(), stderr = %stderr.trim(), "git pull failed");
        Err(format!("git pull exited with {:?}", output.status.code()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_prefix_short_string() {
        assert_eq!(char_prefix("hello", 10), "hello");
    }

    #[test]
    fn test_char_prefix_cuts_at_chars() {
        assert_eq!(char_prefix("hello world", 5), "hello");
        // 3 chars of multibyte text, not 3 bytes
        assert_eq!(char_prefix("こんにちは", 3), "こんに");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_safe_filename_title_strips_invalid_chars() {
        assert_eq!(
            safe_filename_title("Work/Life: Balance? \"Yes\"<no>|*"),
            "WorkLife Balance Yesno"
        );
    }

    #[test]
    fn test_safe_filename_title_caps_length() {
        let long = "x".repeat(80);
        assert_eq!(safe_filename_title(&long).chars().count(), 50);
    }
}
