//! Notes-vault export.
//!
//! Accepted articles are mirrored into a local notes vault as
//! `{date}_{sanitized-title}.md` with vault-flavored frontmatter (tags,
//! blog URL). Two entry points:
//!
//! - [`export_article`]: one article, right after publishing
//! - [`sync_posts`]: bulk sync of the whole posts directory, used by the
//!   `sync` subcommand after a repo pull; existing vault files are never
//!   overwritten

use crate::config::Catalog;
use crate::models::{Category, FinishedArticle, VaultFrontmatter};
use crate::outputs::posts::parse_post;
use crate::utils::safe_filename_title;
use chrono::Local;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Vault filename for an article: `{date}_{title}.md`, title sanitized and
/// capped at 50 characters.
pub fn vault_filename(date: &str, title: &str) -> String {
    format!("{date}_{}.md", safe_filename_title(title))
}

fn render_vault_note(
    title: &str,
    body: &str,
    frontmatter: &VaultFrontmatter,
) -> Result<String, Box<dyn Error>> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{yaml}---\n\n# {title}\n\n{body}"))
}

fn tags_for(tag: &str) -> Vec<String> {
    vec!["blog".to_string(), tag.to_string(), "auto-generated".to_string()]
}

/// Export one freshly published article into the vault.
#[instrument(level = "info", skip_all, fields(vault_dir = %vault_dir, title = %article.title))]
pub async fn export_article(
    article: &FinishedArticle,
    vault_dir: &str,
    blog_url_base: &str,
    category_tag: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(vault_dir).await?;

    let frontmatter = VaultFrontmatter {
        title: article.title.clone(),
        date: article.date.clone(),
        theme: article.theme.clone(),
        category: article.category_name.clone(),
        char_count: article.char_count,
        tags: tags_for(category_tag),
        blog_url: article.blog_url(blog_url_base),
        synced: None,
    };

    let path = PathBuf::from(vault_dir).join(vault_filename(&article.date, &article.title));
    fs::write(&path, render_vault_note(&article.title, &article.body, &frontmatter)?).await?;
    info!(path = %path.display(), "Exported article to vault");
    Ok(path)
}

/// Counters reported by a bulk sync.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Sync every post in the posts directory into the vault.
///
/// Posts that fail to parse are counted and skipped; vault files that
/// already exist are left untouched. Newly synced notes carry a `synced`
/// timestamp in their frontmatter.
#[instrument(level = "info", skip_all, fields(posts_dir = %posts_dir, vault_dir = %vault_dir))]
pub async fn sync_posts(
    posts_dir: &str,
    vault_dir: &str,
    blog_url_base: &str,
    catalog: &Catalog,
) -> Result<SyncStats, Box<dyn Error>> {
    fs::create_dir_all(vault_dir).await?;

    let mut paths = Vec::new();
    let mut dir = fs::read_dir(posts_dir).await?;
    while let Some(dirent) = dir.next_entry().await? {
        let path = dirent.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut stats = SyncStats::default();
    for path in paths {
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read post; skipping");
                stats.failed += 1;
                continue;
            }
        };
        let (post, body) = match parse_post(&content) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not parse post; skipping");
                stats.failed += 1;
                continue;
            }
        };

        let dest = PathBuf::from(vault_dir).join(vault_filename(&post.date, &post.title));
        if fs::try_exists(&dest).await? {
            stats.skipped += 1;
            continue;
        }

        // Posts written before this tool may carry unknown category keys;
        // tag those with the raw key rather than dropping them.
        let tag = serde_json::from_value::<Category>(serde_json::Value::String(
            post.category.clone(),
        ))
        .map(|category| catalog.profile(category).tag.clone())
        .unwrap_or_else(|_| post.category.clone());

        let slug = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| post.date.clone());
        let frontmatter = VaultFrontmatter {
            title: post.title.clone(),
            date: post.date.clone(),
            theme: post.theme.clone(),
            category: post.category_name.clone(),
            char_count: post.char_count,
            tags: tags_for(&tag),
            blog_url: format!("{}/blog/{}", blog_url_base.trim_end_matches('/'), slug),
            synced: Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        };

        fs::write(&dest, render_vault_note(&post.title, &body, &frontmatter)?).await?;
        info!(path = %dest.display(), "Synced post into vault");
        stats.synced += 1;
    }

    info!(
        synced = stats.synced,
        skipped = stats.skipped,
        failed = stats.failed,
        "Vault sync finished"
    );
    Ok(stats)
}
