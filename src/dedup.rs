//! Four-layer duplicate detection for candidate articles.
//!
//! Every candidate is checked against the *entire* history log — unlike
//! theme selection, which only looks back 100 entries. Duplicate prevention
//! must be exhaustive; theme variety only needs recency.
//!
//! The four checks, OR'd and short-circuited:
//! 1. Exact title match
//! 2. Fuzzy title similarity (Ratcliff/Obershelp ratio above 0.8)
//! 3. First 200 characters of the body equal to the first 200 characters
//!    of a stored preview
//! 4. Exact content digest match
//!
//! Layering the cheap exact checks with one expensive fuzzy check keeps
//! recall high without scanning every body pairwise.

use crate::models::HistoryEntry;
use crate::similarity::similarity_ratio;
use crate::utils::{char_prefix, truncate_for_log};
use sha2::{Digest, Sha256};
use tracing::{instrument, warn};

/// Characters of body stored verbatim in each history entry.
pub const PREVIEW_CHARS: usize = 500;

/// Characters compared in the prefix-collision check.
pub const PREFIX_CHARS: usize = 200;

/// Fuzzy title similarity above this ratio counts as a duplicate.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Hex SHA-256 digest of an article body.
pub fn content_hash(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// The stored preview for a body: its first 500 characters, verbatim.
pub fn preview_of(body: &str) -> String {
    char_prefix(body, PREVIEW_CHARS).to_string()
}

/// Check a candidate `(title, body)` against every entry in the log.
///
/// Returns `true` as soon as any single check matches any entry. Each hit
/// is logged with the matching historical title so rejected attempts can be
/// diagnosed from the run log.
#[instrument(level = "debug", skip_all, fields(title = %title, history = log.len()))]
pub fn is_duplicate(title: &str, body: &str, log: &[HistoryEntry]) -> bool {
    let candidate_prefix = char_prefix(body, PREFIX_CHARS);
    let candidate_hash = content_hash(body);

    for entry in log {
        if entry.title == title {
            warn!(matched = %entry.title, "Exact title match");
            return true;
        }

        let ratio = similarity_ratio(title, &entry.title);
        if ratio > TITLE_SIMILARITY_THRESHOLD {
            warn!(matched = %entry.title, ratio, "Title too similar");
            return true;
        }

        if !candidate_prefix.is_empty() && char_prefix(&entry.preview, PREFIX_CHARS) == candidate_prefix
        {
            warn!(
                matched = %entry.title,
                prefix = %truncate_for_log(candidate_prefix, 60),
                "Body prefix collision"
            );
            return true;
        }

        if entry.content_hash == candidate_hash {
            warn!(matched = %entry.title, "Content hash match");
            return true;
        }
    }

    false
}
