//! The generation controller: a bounded-retry loop around theme selection,
//! production, validation, and the history commit.
//!
//! Each run makes at most `max_retries` fully independent attempts. Every
//! attempt draws a fresh theme, produces a candidate, validates its length
//! against the configured floor, then checks it against the whole history
//! log for duplicates. The first accepted candidate is appended to the
//! in-memory log, persisted, and returned; exhausting all attempts is a
//! terminal error and leaves history untouched.
//!
//! The history log is read once at the start of the run and not re-read
//! between attempts — no other writer is assumed for the run's duration.
//!
//! Production sits behind the [`ProduceArticle`] trait so the controller
//! can be exercised with a stub, the same seam the LLM client uses for its
//! retry decorator.

use crate::dedup::{content_hash, is_duplicate, preview_of};
use crate::history::{HistoryError, HistoryStore};
use crate::models::{Category, Draft, FinishedArticle, HistoryEntry};
use crate::themes::ThemeSelector;
use std::error::Error;
use thiserror::Error as ThisError;
use tracing::{info, instrument, warn};

/// Produces one candidate `(title, body)` draft for a theme.
///
/// Any failure is treated as a rejected attempt by the controller; the
/// implementation is free to retry transient transport errors internally.
pub trait ProduceArticle {
    async fn produce(&self, theme: &str, category: Category) -> Result<Draft, Box<dyn Error>>;
}

/// Terminal failures of a generation run.
///
/// Transient produce failures and validation rejections never surface
/// here; they only consume attempts.
#[derive(Debug, ThisError)]
pub enum GenerateError {
    #[error("could not produce an acceptable article after {attempts} attempts")]
    Exhausted { attempts: usize },
    /// Losing the history write would undermine future duplicate
    /// detection, so a failed save aborts the run.
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Orchestrates one run: theme → produce → validate → dedup → commit.
pub struct GenerationController<'a, P> {
    selector: ThemeSelector<'a>,
    store: &'a HistoryStore,
    producer: &'a P,
    min_chars: usize,
    max_retries: usize,
}

impl<'a, P: ProduceArticle> GenerationController<'a, P> {
    pub fn new(
        selector: ThemeSelector<'a>,
        store: &'a HistoryStore,
        producer: &'a P,
        min_chars: usize,
        max_retries: usize,
    ) -> Self {
        Self {
            selector,
            store,
            producer,
            min_chars,
            max_retries,
        }
    }

    /// Run the retry loop until a candidate is accepted or attempts are
    /// exhausted.
    ///
    /// On acceptance the new [`HistoryEntry`] is appended and the full log
    /// persisted before the article is returned; on exhaustion nothing has
    /// been appended or saved.
    #[instrument(level = "info", skip_all, fields(category = %category, date = %date))]
    pub async fn run(
        &self,
        category: Category,
        category_name: &str,
        date: &str,
    ) -> Result<FinishedArticle, GenerateError> {
        let mut history = self.store.load().await;

        for attempt in 1..=self.max_retries {
            info!(attempt, max = self.max_retries, "Generation attempt");

            let theme = self.selector.select(category, &history);
            info!(theme = %theme, "Theme selected");

            let draft = match self.producer.produce(&theme, category).await {
                Ok(draft) => draft,
                Err(e) => {
                    warn!(attempt, error = %e, "Production failed; retrying with a fresh theme");
                    continue;
                }
            };

            let char_count = draft.body.chars().count();
            if char_count < self.min_chars {
                warn!(
                    attempt,
                    char_count,
                    floor = self.min_chars,
                    "Body below length floor; retrying"
                );
                continue;
            }

            if is_duplicate(&draft.title, &draft.body, &history) {
                warn!(attempt, title = %draft.title, "Duplicate detected; retrying");
                continue;
            }

            history.push(HistoryEntry {
                title: draft.title.clone(),
                theme: theme.clone(),
                category,
                date: date.to_string(),
                preview: preview_of(&draft.body),
                content_hash: content_hash(&draft.body),
            });
            self.store.save(&history).await?;

            info!(title = %draft.title, char_count, attempt, "Article accepted");
            return Ok(FinishedArticle {
                title: draft.title,
                body: draft.body,
                theme,
                category,
                category_name: category_name.to_string(),
                date: date.to_string(),
                slug: date.to_string(),
                image: None,
                photo_credit: None,
                char_count,
            });
        }

        Err(GenerateError::Exhausted {
            attempts: self.max_retries,
        })
    }
}
