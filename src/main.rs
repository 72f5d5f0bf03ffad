//! # Blogsmith
//!
//! An automated blog pipeline that generates themed wellness articles
//! through an OpenAI-compatible LLM API and distributes them to a posts
//! directory, a local notes vault, and a chat webhook.
//!
//! ## Features
//!
//! - Rotates through three categories (relationships, health, exercise)
//!   by day of year
//! - Picks a fresh theme per run from a per-category catalog, with a
//!   bounded 100-entry lookback and a sub-theme fallback on exhaustion
//! - Rejects duplicates with a four-layer check over the full post history
//!   (exact title, fuzzy title similarity, body prefix, content digest)
//! - Bounded-retry generation: up to 5 independent attempts per run
//! - Fetches a cover photo from Unsplash with generated keywords
//! - Exports posts into a notes vault and notifies a chat webhook
//!
//! ## Usage
//!
//! ```sh
//! blogsmith generate -p ./content/posts -i ./public/images
//! blogsmith sync --vault-dir ~/vault/blog
//! ```
//!
//! ## Architecture
//!
//! One synchronous logical run per invocation:
//! 1. **Select**: today's category, then a fresh theme against history
//! 2. **Produce**: two chained chat calls concatenated into one draft
//! 3. **Validate**: length floor, then the duplicate checks
//! 4. **Commit**: append to history and persist before any sink runs
//! 5. **Distribute**: post file, cover photo, vault note, webhook ping

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dedup;
mod generator;
mod history;
mod models;
mod openai;
mod outputs;
mod similarity;
mod themes;
mod unsplash;
mod utils;

use cli::{Cli, Command, GenerateArgs, SyncArgs};
use config::{Config, category_for_date, load_config};
use generator::GenerationController;
use history::HistoryStore;
use openai::{ChatClient, TwoPartProducer};
use outputs::{posts, vault, webhook};
use themes::ThemeSelector;
use unsplash::UnsplashClient;
use utils::{ensure_writable_dir, git_pull};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("blogsmith starting up");

    let args = Cli::parse();
    debug!(?args.config, "Parsed CLI arguments");
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Generate(generate_args) => run_generate(&config, &generate_args).await?,
        Command::Sync(sync_args) => run_sync(&config, &sync_args).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Generate today's article and distribute it to every configured sink.
#[instrument(level = "info", skip_all)]
async fn run_generate(config: &Config, args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    // Early check: the posts directory must be writable or the whole run
    // is pointless
    if let Err(e) = ensure_writable_dir(&args.posts_dir).await {
        error!(
            path = %args.posts_dir,
            error = %e,
            "Posts directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let today = Local::now().date_naive();
    let date = today.to_string();
    let category = category_for_date(today);
    let profile = config.catalog.profile(category);
    info!(%date, category = %category, category_name = %profile.name, "Today's schedule");

    // ---- Generate ----
    let store = HistoryStore::new(&args.history_file);
    let chat = ChatClient::new(&config.api_base_url, &args.openai_api_key, &config.model);
    let producer = TwoPartProducer::new(&chat, &config.catalog);
    let controller = GenerationController::new(
        ThemeSelector::new(&config.catalog),
        &store,
        &producer,
        config.min_chars,
        config.max_retries,
    );
    let mut article = controller.run(category, &profile.name, &date).await?;
    info!(
        title = %article.title,
        theme = %article.theme,
        char_count = article.char_count,
        "Article generated"
    );

    // ---- Cover photo (best effort) ----
    match &args.unsplash_access_key {
        Some(access_key) => {
            let keywords = chat
                .image_keywords(&article.theme, &profile.image_keywords)
                .await;
            info!(keywords = %keywords, "Searching for a cover photo");
            match UnsplashClient::new(access_key)
                .fetch_cover(&keywords, &args.images_dir, &article.date)
                .await
            {
                Ok((image, credit)) => {
                    info!(image = %image, photographer = %credit.photographer, "Cover photo attached");
                    article.image = Some(image);
                    article.photo_credit = Some(credit);
                }
                Err(e) => warn!(error = %e, "Cover photo fetch failed; publishing without one"),
            }
        }
        None => info!("No Unsplash access key; publishing without a cover photo"),
    }

    // ---- Distribute ----
    let post_path = posts::write_post(&article, &args.posts_dir).await?;
    info!(path = %post_path.display(), "Post published");

    if let Some(vault_dir) = &args.vault_dir {
        match vault::export_article(&article, vault_dir, &config.blog_url, &profile.tag).await {
            Ok(path) => info!(path = %path.display(), "Vault export complete"),
            Err(e) => error!(error = %e, "Vault export failed"),
        }
    }

    if let Some(webhook_url) = &config.webhook_url {
        if let Err(e) = webhook::notify(webhook_url, &article, &config.blog_url).await {
            error!(error = %e, "Webhook notification failed");
        }
    }

    info!(
        title = %article.title,
        category = %profile.name,
        char_count = article.char_count,
        url = %article.blog_url(&config.blog_url),
        "Run finished"
    );
    Ok(())
}

/// Pull the repository and bulk-sync posts into the notes vault.
#[instrument(level = "info", skip_all)]
async fn run_sync(config: &Config, args: &SyncArgs) -> Result<(), Box<dyn Error>> {
    if !args.no_pull {
        // Posts may have been committed from another machine; a failed
        // pull still leaves the local copies syncable
        if let Err(e) = git_pull(&args.repo_dir).await {
            warn!(error = %e, "Repository pull failed; syncing local posts only");
        }
    }

    let stats = vault::sync_posts(
        &args.posts_dir,
        &args.vault_dir,
        &config.blog_url,
        &config.catalog,
    )
    .await?;
    info!(
        synced = stats.synced,
        skipped = stats.skipped,
        failed = stats.failed,
        vault_dir = %args.vault_dir,
        "Sync finished"
    );
    Ok(())
}
