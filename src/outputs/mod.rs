//! Publish sinks for accepted articles.
//!
//! Each sink receives the finished article record and owns its own
//! formatting and transport:
//!
//! - [`posts`]: markdown files with YAML frontmatter in the blog's posts
//!   directory
//! - [`vault`]: exports into the local notes vault, single-article and
//!   bulk sync
//! - [`webhook`]: a JSON notification to a chat webhook
//!
//! Only the posts directory write is fatal to a run; the vault and
//! webhook sinks are best effort.

pub mod posts;
pub mod vault;
pub mod webhook;
