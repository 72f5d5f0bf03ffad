//! Data models for generated articles and the post history.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Category`]: the coarse subject grouping that drives theme catalogs and prompts
//! - [`HistoryEntry`]: one record per accepted article in the append-only history log
//! - [`Draft`]: a raw `(title, body)` pair returned by the producer
//! - [`FinishedArticle`]: the full record handed to the publish sinks
//! - Frontmatter schemas for the posts directory and the notes vault
//!
//! The frontmatter structs use camelCase field names to stay byte-compatible
//! with the files the original deployment wrote, hence the serde renames.

use serde::{Deserialize, Serialize};

/// A coarse subject grouping governing which theme catalog and prompt apply.
///
/// The deployment rotates through the three categories by day of year, so
/// each category publishes roughly every third day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Relationship,
    Health,
    Exercise,
}

impl Category {
    /// The stable machine-readable key, as stored in history and frontmatter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Relationship => "relationship",
            Category::Health => "health",
            Category::Exercise => "exercise",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record per accepted article in the post history log.
///
/// Entries are immutable once appended and never removed. The `preview`
/// holds the first 500 characters of the body verbatim for cheap prefix
/// comparison; `content_hash` is a hex SHA-256 digest of the full body for
/// exact-duplicate detection. The JSON key stays `hash` for compatibility
/// with history files written by earlier deployments.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub title: String,
    pub theme: String,
    pub category: Category,
    /// Generation date, `YYYY-MM-DD`.
    pub date: String,
    pub preview: String,
    #[serde(rename = "hash")]
    pub content_hash: String,
}

/// A raw `(title, body)` pair as returned by the article producer,
/// before any validation.
#[derive(Debug, Clone)]
pub struct Draft {
    pub title: String,
    pub body: String,
}

/// Photographer attribution for a downloaded stock photo.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoCredit {
    pub photographer: String,
    /// Link to the photo page on the stock site.
    pub link: String,
}

/// A fully accepted article, ready for the publish sinks.
///
/// Produced by the generation controller once a candidate passes the length
/// floor and the duplicate checks. `image` and `photo_credit` are filled in
/// afterwards by the cover-photo fetch, which is best effort.
#[derive(Debug, Clone)]
pub struct FinishedArticle {
    pub title: String,
    pub body: String,
    pub theme: String,
    pub category: Category,
    /// Human-readable category name for display surfaces.
    pub category_name: String,
    /// Generation date, `YYYY-MM-DD`; also used as the slug.
    pub date: String,
    pub slug: String,
    /// Web path of the downloaded cover image, e.g. `/images/2025-05-06.jpg`.
    pub image: Option<String>,
    pub photo_credit: Option<PhotoCredit>,
    /// Body length in characters (not bytes).
    pub char_count: usize,
}

impl FinishedArticle {
    /// Public URL of the post on the blog.
    pub fn blog_url(&self, base: &str) -> String {
        format!("{}/blog/{}", base.trim_end_matches('/'), self.slug)
    }
}

/// YAML frontmatter schema for files in the posts directory.
///
/// Field names match the original deployment's frontmatter exactly so the
/// static site keeps rendering old and new posts alike.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFrontmatter {
    pub title: String,
    pub date: String,
    pub theme: String,
    pub category: String,
    pub category_name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub photographer: String,
    #[serde(default)]
    pub photo_link: String,
    pub char_count: usize,
}

/// YAML frontmatter schema for files exported to the notes vault.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFrontmatter {
    pub title: String,
    pub date: String,
    pub theme: String,
    /// Display name of the category, not the machine key.
    pub category: String,
    pub char_count: usize,
    pub tags: Vec<String>,
    pub blog_url: String,
    /// Set on bulk sync only; single-article export leaves it out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        let json = serde_json::to_string(&Category::Health).unwrap();
        assert_eq!(json, "\"health\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Health);
    }

    #[test]
    fn test_history_entry_uses_hash_key() {
        let entry = HistoryEntry {
            title: "A title".to_string(),
            theme: "A theme".to_string(),
            category: Category::Exercise,
            date: "2025-05-06".to_string(),
            preview: "body".to_string(),
            content_hash: "abc123".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"hash\":\"abc123\""));
        assert!(json.contains("\"category\":\"exercise\""));
    }

    #[test]
    fn test_history_entry_deserializes_original_format() {
        let json = r#"{
            "title": "Better sleep",
            "theme": "Sleep science",
            "category": "health",
            "date": "2025-05-06",
            "preview": "Sleep matters...",
            "hash": "d41d8cd98f00b204e9800998ecf8427e"
        }"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.category, Category::Health);
        assert_eq!(entry.content_hash, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_post_frontmatter_yaml_field_names() {
        let fm = PostFrontmatter {
            title: "T".to_string(),
            date: "2025-05-06".to_string(),
            theme: "Theme".to_string(),
            category: "health".to_string(),
            category_name: "Health".to_string(),
            image: "/images/2025-05-06.jpg".to_string(),
            photographer: "Jane Doe".to_string(),
            photo_link: "https://unsplash.com/photos/x".to_string(),
            char_count: 5000,
        };
        let yaml = serde_yaml::to_string(&fm).unwrap();
        assert!(yaml.contains("categoryName:"));
        assert!(yaml.contains("photoLink:"));
        assert!(yaml.contains("charCount: 5000"));
    }

    #[test]
    fn test_vault_frontmatter_skips_absent_synced() {
        let fm = VaultFrontmatter {
            title: "T".to_string(),
            date: "2025-05-06".to_string(),
            theme: "Theme".to_string(),
            category: "Health".to_string(),
            char_count: 4200,
            tags: vec!["blog".to_string()],
            blog_url: "https://example.com/blog/2025-05-06".to_string(),
            synced: None,
        };
        let yaml = serde_yaml::to_string(&fm).unwrap();
        assert!(!yaml.contains("synced"));
    }

    #[test]
    fn test_blog_url_strips_trailing_slash() {
        let article = FinishedArticle {
            title: "T".to_string(),
            body: String::new(),
            theme: "Theme".to_string(),
            category: Category::Relationship,
            category_name: "Relationships".to_string(),
            date: "2025-05-06".to_string(),
            slug: "2025-05-06".to_string(),
            image: None,
            photo_credit: None,
            char_count: 0,
        };
        assert_eq!(
            article.blog_url("https://example.com/"),
            "https://example.com/blog/2025-05-06"
        );
    }
}
