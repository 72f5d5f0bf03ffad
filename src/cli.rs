//! Command-line interface definitions for Blogsmith.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys can be provided via flags or environment variables.

use clap::{Args, Parser, Subcommand};

/// Command-line arguments for the Blogsmith application.
///
/// # Examples
///
/// ```sh
/// # Generate and publish today's article
/// blogsmith generate -p ./content/posts -i ./public/images
///
/// # Pull the repo and sync every post into the notes vault
/// blogsmith sync --vault-dir ~/vault/blog
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file (theme catalog, model, blog URL)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate today's article and publish it to all sinks
    Generate(GenerateArgs),
    /// Pull the repository and sync posts into the notes vault
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory for post markdown files
    #[arg(short, long, default_value = "content/posts")]
    pub posts_dir: String,

    /// Output directory for downloaded cover images
    #[arg(short, long, default_value = "public/images")]
    pub images_dir: String,

    /// Path of the post history JSON file
    #[arg(long, default_value = "scripts/post_history.json")]
    pub history_file: String,

    /// Notes vault directory; omit to skip the vault export
    #[arg(long)]
    pub vault_dir: Option<String>,

    /// API key for the OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: String,

    /// Unsplash access key; omit to publish without a cover photo
    #[arg(long, env = "UNSPLASH_ACCESS_KEY")]
    pub unsplash_access_key: Option<String>,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory holding post markdown files
    #[arg(short, long, default_value = "content/posts")]
    pub posts_dir: String,

    /// Notes vault directory to sync into
    #[arg(long)]
    pub vault_dir: String,

    /// Repository directory to `git pull` before syncing
    #[arg(long, default_value = ".")]
    pub repo_dir: String,

    /// Skip the repository pull
    #[arg(long, default_value_t = false)]
    pub no_pull: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_parsing() {
        let cli = Cli::parse_from([
            "blogsmith",
            "generate",
            "--posts-dir",
            "./posts",
            "--images-dir",
            "./images",
            "--openai-api-key",
            "sk-test",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.posts_dir, "./posts");
                assert_eq!(args.images_dir, "./images");
                assert_eq!(args.history_file, "scripts/post_history.json");
                assert!(args.vault_dir.is_none());
            }
            _ => panic!("expected generate subcommand"),
        }
    }

    #[test]
    fn test_generate_short_flags() {
        let cli = Cli::parse_from([
            "blogsmith",
            "generate",
            "-p",
            "/tmp/posts",
            "-i",
            "/tmp/images",
            "--openai-api-key",
            "sk-test",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.posts_dir, "/tmp/posts");
                assert_eq!(args.images_dir, "/tmp/images");
            }
            _ => panic!("expected generate subcommand"),
        }
    }

    #[test]
    fn test_sync_parsing() {
        let cli = Cli::parse_from([
            "blogsmith",
            "sync",
            "--vault-dir",
            "/home/u/vault/blog",
            "--no-pull",
        ]);
        match cli.command {
            Command::Sync(args) => {
                assert_eq!(args.vault_dir, "/home/u/vault/blog");
                assert_eq!(args.repo_dir, ".");
                assert!(args.no_pull);
            }
            _ => panic!("expected sync subcommand"),
        }
    }
}
