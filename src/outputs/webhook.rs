//! Chat webhook notification.
//!
//! Posts a short JSON summary of a freshly published article to a
//! configured webhook URL (`{"content": "..."}`, the shape Discord-style
//! webhooks accept). Best effort: the caller logs failures and moves on.

use crate::models::FinishedArticle;
use std::error::Error;
use tracing::{info, instrument};
use url::Url;

/// The notification text for an article.
fn message(article: &FinishedArticle, blog_url_base: &str) -> String {
    format!(
        "New post published: {}\n{} · {} · {} chars\n{}",
        article.title,
        article.category_name,
        article.theme,
        article.char_count,
        article.blog_url(blog_url_base),
    )
}

/// Send the publish notification.
#[instrument(level = "info", skip_all, fields(title = %article.title))]
pub async fn notify(
    webhook_url: &str,
    article: &FinishedArticle,
    blog_url_base: &str,
) -> Result<(), Box<dyn Error>> {
    let url = Url::parse(webhook_url)?;

    reqwest::Client::new()
        .post(url)
        .json(&serde_json::json!({ "content": message(article, blog_url_base) }))
        .send()
        .await?
        .error_for_status()?;

    info!("Webhook notified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_message_includes_title_stats_and_url() {
        let article = FinishedArticle {
            title: "Stay Active".to_string(),
            body: String::new(),
            theme: "Exercise and longevity".to_string(),
            category: Category::Exercise,
            category_name: "Exercise".to_string(),
            date: "2025-05-06".to_string(),
            slug: "2025-05-06".to_string(),
            image: None,
            photo_credit: None,
            char_count: 5120,
        };
        let text = message(&article, "https://example.com");
        assert!(text.contains("Stay Active"));
        assert!(text.contains("Exercise and longevity"));
        assert!(text.contains("5120 chars"));
        assert!(text.contains("https://example.com/blog/2025-05-06"));
    }

    #[tokio::test]
    async fn test_notify_rejects_invalid_url() {
        let article = FinishedArticle {
            title: "T".to_string(),
            body: String::new(),
            theme: "Theme".to_string(),
            category: Category::Health,
            category_name: "Health".to_string(),
            date: "2025-05-06".to_string(),
            slug: "2025-05-06".to_string(),
            image: None,
            photo_credit: None,
            char_count: 0,
        };
        assert!(notify("not a url", &article, "https://example.com").await.is_err());
    }
}
