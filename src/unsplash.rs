//! Cover photo lookup against the Unsplash API.
//!
//! Fetches one random landscape photo for a keyword query, downloads it
//! into the images directory as `{date}.jpg`, and returns the web path
//! plus photographer attribution. The whole sink is best effort: callers
//! publish without a cover when anything here fails.

use crate::models::PhotoCredit;
use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

const RANDOM_PHOTO_URL: &str = "https://api.unsplash.com/photos/random";

#[derive(Debug, Deserialize)]
struct RandomPhoto {
    urls: PhotoUrls,
    user: PhotoUser,
    links: PhotoLinks,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    #[serde(default = "unknown_photographer")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct PhotoLinks {
    #[serde(default)]
    html: String,
}

fn unknown_photographer() -> String {
    "Unknown".to_string()
}

/// Client for the Unsplash random-photo endpoint.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http: reqwest::Client,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_key: access_key.into(),
        }
    }

    /// Fetch a random photo for `keywords` and save it as
    /// `{images_dir}/{date}.jpg`.
    ///
    /// Returns the web path (`/images/{date}.jpg`) and the photographer
    /// credit for the frontmatter.
    #[instrument(level = "info", skip_all, fields(keywords = %keywords, date = %date))]
    pub async fn fetch_cover(
        &self,
        keywords: &str,
        images_dir: &str,
        date: &str,
    ) -> Result<(String, PhotoCredit), Box<dyn Error>> {
        let photo: RandomPhoto = self
            .http
            .get(RANDOM_PHOTO_URL)
            .query(&[
                ("query", keywords),
                ("orientation", "landscape"),
                ("content_filter", "high"),
            ])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let bytes = self
            .http
            .get(&photo.urls.regular)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        fs::create_dir_all(images_dir).await?;
        let filename = format!("{date}.jpg");
        let filepath = format!("{}/{}", images_dir.trim_end_matches('/'), filename);
        fs::write(&filepath, &bytes).await?;

        info!(
            path = %filepath,
            photographer = %photo.user.name,
            bytes = bytes.len(),
            "Saved cover photo"
        );

        Ok((
            format!("/images/{filename}"),
            PhotoCredit {
                photographer: photo.user.name,
                link: photo.links.html,
            },
        ))
    }
}
