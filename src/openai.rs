//! OpenAI-compatible chat API client and the two-part article producer.
//!
//! The client speaks the plain `/chat/completions` protocol over reqwest
//! and retries transient failures with exponential backoff and jitter:
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```
//!
//! The producer builds an article in two sequential calls — a front half
//! that carries the title, and a back half seeded with a summary of the
//! front half — and concatenates them. Splitting the generation keeps each
//! call comfortably inside the model's output budget while still landing
//! bodies past the length floor.

use crate::config::{Catalog, CategoryProfile};
use crate::generator::ProduceArticle;
use crate::models::{Category, Draft};
use crate::utils::{char_prefix, truncate_for_log};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

const MAX_API_RETRIES: usize = 5;
const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Characters of the front half passed to the back-half prompt as context.
const PART1_SUMMARY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Minimal client for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// One chat completion with backoff on transient failures.
    ///
    /// Retries up to 5 times with exponential backoff (1s doubling, capped
    /// at 30s) plus 0–250 ms of jitter to avoid thundering herd against a
    /// rate-limited endpoint.
    #[instrument(level = "info", skip_all)]
    pub async fn chat(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.chat_once(system, user, max_tokens, temperature).await {
                Ok(text) => {
                    info!(
                        elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                        "chat completed"
                    );
                    return Ok(text);
                }
                Err(e) => {
                    attempt += 1;
                    if attempt > MAX_API_RETRIES {
                        warn!(
                            attempt,
                            max = MAX_API_RETRIES,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            "chat exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = BASE_DELAY.saturating_mul(1 << (attempt - 1));
                    if delay > MAX_DELAY {
                        delay = MAX_DELAY;
                    }
                    let jitter_ms: u64 = rand::rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = MAX_API_RETRIES,
                        elapsed_ms_attempt = attempt_t0.elapsed().as_millis() as u128,
                        ?delay,
                        error = %e,
                        "chat attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn chat_once(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, Box<dyn Error>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens,
            temperature,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or("chat response contained no choices")?;
        debug!(preview = %truncate_for_log(&content, 200), "chat response");
        Ok(content.trim().to_string())
    }

    /// Generate 2–3 English stock-photo keywords for a theme, falling back
    /// to the category's static keywords if the call fails.
    #[instrument(level = "info", skip_all, fields(theme = %theme))]
    pub async fn image_keywords(&self, theme: &str, base_keywords: &str) -> String {
        let system = format!(
            "Generate 2-3 English keywords for stock photo search based on the given \
             blog article theme. Base theme area: {base_keywords}. Return only keywords \
             separated by spaces. Focus on positive, inspiring imagery."
        );
        match self.chat(&system, theme, 50, 0.7).await {
            Ok(keywords) => keywords,
            Err(e) => {
                warn!(error = %e, "Keyword generation failed; using category defaults");
                base_keywords.to_string()
            }
        }
    }
}

/// Splits the article across two chat calls and concatenates the halves.
///
/// Implements [`ProduceArticle`] so the generation controller can drive it
/// (or a test stub) interchangeably.
#[derive(Debug)]
pub struct TwoPartProducer<'a> {
    client: &'a ChatClient,
    catalog: &'a Catalog,
}

impl<'a> TwoPartProducer<'a> {
    pub fn new(client: &'a ChatClient, catalog: &'a Catalog) -> Self {
        Self { client, catalog }
    }

    async fn front_half(
        &self,
        theme: &str,
        profile: &CategoryProfile,
    ) -> Result<(String, String), Box<dyn Error>> {
        let user = format!(
            "Write the FIRST HALF of an article on the following theme.\n\n\
             Theme: {theme}\n\n\
             Cover, in order:\n\
             1. Title: put a compelling title on a line starting with \"Title:\"\n\
             2. ## An introduction that empathizes deeply with the reader's struggle \
             (at least 600 characters), opens with a \"does this sound familiar?\" \
             question, and states what the reader gains from the article\n\
             3. ## Why this problem happens, with scientific background, concrete \
             failure examples, and research data (at least 700 characters)\n\
             4. ## Solution 1, named concretely, with practical examples (at least \
             800 characters)\n\
             5. ## Solution 2, named concretely, with practical examples or research \
             data (at least 800 characters)\n\n\
             Important: headings must describe content, never character counts. \
             Write each section in detail so the half totals at least 3000 characters."
        );

        let content = self.client.chat(&profile.system_prompt, &user, 5000, 0.8).await?;
        let (title, body) = extract_title(&content, theme);
        info!(chars = body.chars().count(), "Front half generated");
        Ok((title, body))
    }

    async fn back_half(
        &self,
        theme: &str,
        title: &str,
        front_half: &str,
        profile: &CategoryProfile,
    ) -> Result<String, Box<dyn Error>> {
        let summary = char_prefix(front_half, PART1_SUMMARY_CHARS);
        let user = format!(
            "Write the SECOND HALF of the article, consistent with the first half.\n\n\
             Theme: {theme}\n\
             Title: {title}\n\n\
             Summary of the first half:\n{summary}\n\n\
             Cover, in order:\n\
             1. ## Solution 3, named concretely, with practical examples or research \
             data (at least 800 characters)\n\
             2. ## Solution 4, named concretely, with practice pointers (at least \
             600 characters)\n\
             3. ## Practical tips to start today: 3-5 simple everyday techniques with \
             step-by-step instructions (at least 600 characters)\n\
             4. ## A closing summary that recaps the key points, encourages the \
             reader, and suggests a next action (at least 500 characters)\n\n\
             Important: headings must describe content, never character counts. \
             Write each section in detail so the half totals at least 2500 characters."
        );

        let content = self.client.chat(&profile.system_prompt, &user, 5000, 0.8).await?;
        info!(chars = content.chars().count(), "Back half generated");
        Ok(content)
    }

}

impl ProduceArticle for TwoPartProducer<'_> {
    async fn produce(&self, theme: &str, category: Category) -> Result<Draft, Box<dyn Error>> {
        let profile = self.catalog.profile(category);
        let (title, front) = self.front_half(theme, profile).await?;
        let back = self.back_half(theme, &title, &front, profile).await?;
        let body = format!("{front}\n\n{back}");
        Ok(Draft { title, body })
    }
}

/// Pull the title out of a generated front half.
///
/// Accepts either a `Title:` line or a leading `# ` heading; whichever
/// comes first wins and is removed from the body. Falls back to the theme
/// string when the model produced neither.
fn extract_title(content: &str, fallback: &str) -> (String, String) {
    let mut title = String::new();
    let mut body_lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if title.is_empty() {
            if let Some(rest) = trimmed.strip_prefix("Title:") {
                title = rest.trim().to_string();
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("# ") {
                title = rest.trim().to_string();
                continue;
            }
        }
        body_lines.push(line);
    }

    if title.is_empty() {
        title = fallback.to_string();
    }
    (title, body_lines.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_from_title_line() {
        let content = "Title: Five Ways to Sleep Better\n\n## Introduction\nBody text.";
        let (title, body) = extract_title(content, "fallback theme");
        assert_eq!(title, "Five Ways to Sleep Better");
        assert!(body.starts_with("## Introduction"));
        assert!(!body.contains("Title:"));
    }

    #[test]
    fn test_extract_title_from_heading() {
        let content = "# Sleep Better Tonight\n\n## Introduction\nBody text.";
        let (title, body) = extract_title(content, "fallback theme");
        assert_eq!(title, "Sleep Better Tonight");
        assert!(body.starts_with("## Introduction"));
    }

    #[test]
    fn test_extract_title_falls_back_to_theme() {
        let content = "## Introduction\nNo title anywhere.";
        let (title, body) = extract_title(content, "Science-backed ways to sleep better");
        assert_eq!(title, "Science-backed ways to sleep better");
        assert_eq!(body, content);
    }

    #[test]
    fn test_extract_title_only_takes_the_first() {
        let content = "Title: The Real One\n# Not This One\nBody.";
        let (title, body) = extract_title(content, "fallback");
        assert_eq!(title, "The Real One");
        // The stray heading stays in the body untouched
        assert!(body.contains("# Not This One"));
    }

    #[test]
    fn test_subheadings_are_not_mistaken_for_titles() {
        let content = "## Why this happens\nBody.";
        let (title, body) = extract_title(content, "fallback");
        assert_eq!(title, "fallback");
        assert!(body.starts_with("## Why this happens"));
    }

    #[test]
    fn test_chat_request_serializes_expected_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a writer.",
                },
                ChatMessage {
                    role: "user",
                    content: "Write.",
                },
            ],
            max_tokens: 5000,
            temperature: 0.8,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Write.");
        assert_eq!(json["max_tokens"], 5000);
    }

    #[test]
    fn test_chat_response_parses_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Hello")
        );
    }
}
