//! Markdown post files with schema-validated YAML frontmatter.
//!
//! Posts are written as `{posts_dir}/{slug}.md`, a `---` fenced YAML
//! frontmatter block followed by the markdown body. The frontmatter is a
//! typed serde struct on both the write and the read path, so a malformed
//! key or value is a parse error instead of silent corruption.

use crate::models::{FinishedArticle, PostFrontmatter};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Build the frontmatter record for an accepted article.
pub fn frontmatter_for(article: &FinishedArticle) -> PostFrontmatter {
    let (photographer, photo_link) = match &article.photo_credit {
        Some(credit) => (credit.photographer.clone(), credit.link.clone()),
        None => (String::new(), String::new()),
    };
    PostFrontmatter {
        title: article.title.clone(),
        date: article.date.clone(),
        theme: article.theme.clone(),
        category: article.category.as_str().to_string(),
        category_name: article.category_name.clone(),
        image: article.image.clone().unwrap_or_default(),
        photographer,
        photo_link,
        char_count: article.char_count,
    }
}

/// Render a full post file: fenced frontmatter plus body.
pub fn render_post(article: &FinishedArticle) -> Result<String, Box<dyn Error>> {
    let yaml = serde_yaml::to_string(&frontmatter_for(article))?;
    Ok(format!("---\n{yaml}---\n\n{}\n", article.body.trim_end()))
}

/// Write the post file to the posts directory, creating it if needed.
#[instrument(level = "info", skip_all, fields(posts_dir = %posts_dir, slug = %article.slug))]
pub async fn write_post(
    article: &FinishedArticle,
    posts_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(posts_dir).await?;
    let path = PathBuf::from(posts_dir).join(format!("{}.md", article.slug));
    fs::write(&path, render_post(article)?).await?;
    info!(path = %path.display(), "Wrote post");
    Ok(path)
}

/// Split a post file into its raw frontmatter and body.
///
/// Returns `None` when the file carries no `---` fenced frontmatter.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---\n")?;
    let end = rest.find("\n---\n")?;
    let frontmatter = &rest[..end];
    let body = rest[end + 5..].trim_start_matches('\n');
    Some((frontmatter, body))
}

/// Parse a post file into its typed frontmatter and body.
pub fn parse_post(content: &str) -> Result<(PostFrontmatter, String), Box<dyn Error>> {
    let (raw, body) =
        split_frontmatter(content).ok_or("post file has no frontmatter block")?;
    let frontmatter: PostFrontmatter = serde_yaml::from_str(raw)?;
    Ok((frontmatter, body.to_string()))
}
