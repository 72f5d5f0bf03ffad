//! Theme selection with a bounded lookback window.
//!
//! The selector owns no mutable state: it reads the injected catalog and
//! the history log and picks a theme the target category has not used
//! within the most recent 100 log entries. The window is over the whole
//! log, *then* filtered by category — not a per-category window. Duplicate
//! detection deliberately does not share this window (see `dedup`).
//!
//! When every catalog theme for the category has been used inside the
//! window, the selector falls back to a random catalog theme qualified by
//! a random sub-theme, so it can always produce a non-empty theme string.

use crate::config::Catalog;
use crate::models::{Category, HistoryEntry};
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// How many recent log entries are scanned for used themes.
pub const LOOKBACK_ENTRIES: usize = 100;

/// Picks fresh themes for a category against the history log.
#[derive(Debug)]
pub struct ThemeSelector<'a> {
    catalog: &'a Catalog,
}

impl<'a> ThemeSelector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Select a theme for `category` that is fresh within the lookback
    /// window, or a qualified repeat when the catalog is exhausted.
    ///
    /// Never fails and never returns an empty string as long as the
    /// catalog has at least one theme for the category.
    #[instrument(level = "debug", skip_all, fields(category = %category, history = log.len()))]
    pub fn select(&self, category: Category, log: &[HistoryEntry]) -> String {
        let profile = self.catalog.profile(category);
        if profile.themes.is_empty() {
            // Degenerate catalog; still honor the never-empty contract.
            return profile.name.clone();
        }

        let window_start = log.len().saturating_sub(LOOKBACK_ENTRIES);
        let used: HashSet<&str> = log[window_start..]
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.theme.as_str())
            .collect();

        let available: Vec<&String> = profile
            .themes
            .iter()
            .filter(|theme| !used.contains(theme.as_str()))
            .collect();
        debug!(
            catalog = profile.themes.len(),
            used = used.len(),
            available = available.len(),
            "Computed theme availability"
        );

        let mut rng = rand::rng();
        if let Some(theme) = available.choose(&mut rng) {
            info!(theme = %theme, "Selected unused theme");
            return (*theme).clone();
        }

        // Catalog exhausted within the window: repeat a theme but
        // differentiate it with a sub-theme qualifier.
        let theme = profile
            .themes
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| profile.name.clone());
        let qualified = match self.catalog.sub_themes.choose(&mut rng) {
            Some(sub) => format!("{theme} ({sub})"),
            None => theme,
        };
        info!(theme = %qualified, "Catalog exhausted; selected qualified theme");
        qualified
    }
}
