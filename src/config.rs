//! Run configuration and the theme catalog.
//!
//! The catalog (category profiles, theme lists, prompts, sub-theme
//! qualifiers) is immutable configuration data, built in with sensible
//! defaults and optionally overridden wholesale from a YAML file. It is
//! injected into the selector and producer at construction; nothing
//! mutates it at runtime.
//!
//! Categories rotate by day of year, so each category publishes roughly
//! every third day.

use crate::models::Category;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{info, instrument};

/// Rotation order for the daily category schedule.
pub const CATEGORY_ORDER: [Category; 3] =
    [Category::Relationship, Category::Health, Category::Exercise];

/// The category scheduled for a calendar date: day-of-year modulo the
/// rotation order.
pub fn category_for_date(date: NaiveDate) -> Category {
    CATEGORY_ORDER[date.ordinal() as usize % CATEGORY_ORDER.len()]
}

/// Everything the run needs besides paths (which come from the CLI) and
/// API keys (which come from the environment).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Public base URL of the blog, used in vault frontmatter and
    /// notifications.
    pub blog_url: String,
    /// OpenAI-compatible API base, e.g. `https://api.openai.com/v1`.
    pub api_base_url: String,
    pub model: String,
    /// Minimum accepted body length in characters.
    pub min_chars: usize,
    /// Maximum generation attempts per run.
    pub max_retries: usize,
    /// Chat webhook to notify after publishing; absent disables the sink.
    pub webhook_url: Option<String>,
    pub catalog: Catalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blog_url: "https://example.netlify.app".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            min_chars: 3000,
            max_retries: 5,
            webhook_url: None,
            catalog: Catalog::default(),
        }
    }
}

/// Load configuration from a YAML file, or fall back to the built-in
/// defaults when no path is given.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&raw)?
        }
        None => Config::default(),
    };
    info!(model = %config.model, min_chars = config.min_chars, "Configuration loaded");
    Ok(config)
}

/// One category's static configuration: display strings, stock-photo
/// keywords, the theme list, and the system prompt for the writer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryProfile {
    /// Human-readable category name.
    pub name: String,
    /// Tag applied to vault exports.
    pub tag: String,
    /// Fallback stock-photo search keywords.
    pub image_keywords: String,
    pub themes: Vec<String>,
    pub system_prompt: String,
}

/// The full theme catalog across all categories, plus the shared
/// sub-theme qualifiers used once a category's themes are exhausted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Catalog {
    pub relationship: CategoryProfile,
    pub health: CategoryProfile,
    pub exercise: CategoryProfile,
    pub sub_themes: Vec<String>,
}

impl Catalog {
    /// The profile for a category. Total over `Category`, so selection can
    /// never fail on a missing entry.
    pub fn profile(&self, category: Category) -> &CategoryProfile {
        match category {
            Category::Relationship => &self.relationship,
            Category::Health => &self.health,
            Category::Exercise => &self.exercise,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            relationship: default_relationship(),
            health: default_health(),
            exercise: default_exercise(),
            sub_themes: vec![
                "an evidence-based approach".to_string(),
                "seen through a psychology lens".to_string(),
                "with concrete worked examples".to_string(),
                "with a practice worksheet".to_string(),
                "learning from case studies".to_string(),
                "drawing on expert opinion".to_string(),
                "what the latest research says".to_string(),
                "simple techniques for everyday life".to_string(),
                "methods you can start today".to_string(),
                "habits that pay off long term".to_string(),
            ],
        }
    }
}

fn themes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_relationship() -> CategoryProfile {
    CategoryProfile {
        name: "Relationships".to_string(),
        tag: "relationships".to_string(),
        image_keywords: "people connection communication friendship".to_string(),
        themes: themes(&[
            "Communication habits that smooth out workplace relationships",
            "Getting along with people you find difficult",
            "Core principles for building trust",
            "Deepening your relationship with your partner",
            "Making friendships last",
            "Improving communication within your family",
            "Making a good first impression",
            "The art of saying no without hurting anyone",
            "Anger management and your relationships",
            "Improving relationships through active listening",
            "Balancing assertiveness and cooperation",
            "Building relationships in the social media age",
            "Bridging generational gaps",
            "Facing feelings of jealousy",
            "Relieving relationship stress",
            "Mindfulness for better relationships",
            "Setting boundaries to keep relationships healthy",
            "The power of forgiveness: healing old wounds",
            "Training your empathy",
            "Why nonverbal communication matters",
            "Accepting differences in values",
            "Practical techniques for overcoming shyness",
            "Building relationships in the remote-work era",
            "Building a good relationship with your boss",
            "Motivating the people who report to you",
            "Navigating friendships with other parents",
            "Neighborly relations and the right distance",
            "Keeping things warm with your in-laws",
            "Facing breakups and new encounters",
            "Easing loneliness by connecting with people",
            "Handling criticism well",
            "Techniques for apology and reconciliation",
            "The effects of expressing gratitude",
            "Seeing things from the other person's side",
            "Self-esteem and your relationships",
            "Finding your place within a group",
            "Balancing competition and cooperation",
            "Building trust by keeping confidences",
            "Dealing with gossip",
            "A relationship reset: making a fresh start",
            "Introvert strengths in relationships",
            "Getting along with extroverts",
            "Perfectionism and relationship trouble",
            "Breaking out of codependent patterns",
            "Keeping a healthy distance",
            "Resolving conflict constructively",
            "Communication that strengthens teamwork",
            "Mental health and your relationships",
            "Staying yourself while staying connected",
            "Recovering from relationship fatigue",
        ]),
        system_prompt: "You are a relationships expert and a professional blog writer. \
Write practical, evidence-based articles grounded in psychology and behavioral \
science research.\n\n\
Style:\n\
- Warm, approachable tone that speaks directly to the reader\n\
- Address the reader as \"you\"\n\n\
Must include:\n\
- Concrete example conversations\n\
- A comparison of a good example and a bad example\n\
- Citations of psychology research (e.g. \"a study at ... University found...\")\n\n\
Write headings in Markdown (## and ###)."
            .to_string(),
    }
}

fn default_health() -> CategoryProfile {
    CategoryProfile {
        name: "Health".to_string(),
        tag: "health".to_string(),
        image_keywords: "health wellness nutrition healthy lifestyle".to_string(),
        themes: themes(&[
            "Science-backed ways to sleep better",
            "Gut health and your immune system",
            "Daily habits that lower stress hormones",
            "Foods and nutrients that sharpen focus",
            "Habits that preserve cognitive function",
            "An anti-inflammatory way of eating",
            "A scientific approach to calming your nervous system",
            "How fatigue works and how to recover",
            "The science of aging well",
            "Blood sugar control and your health",
            "Why hydration matters and how to get it right",
            "Vitamin D and your health",
            "Omega-3s: benefits and how to get them",
            "The science of fasting",
            "Caffeine: effects and the best timing",
            "The gut-brain axis: how your gut talks to your brain",
            "Paying down sleep debt",
            "Habits that keep your circadian rhythm on track",
            "The health benefits of a digital detox",
            "What meditation does to your brain and body",
            "Breathing exercises for a calmer nervous system",
            "Posture and your health",
            "Science-backed relief for tired eyes",
            "The science of staying warm: fixing poor circulation",
            "Sauna and your health",
            "The science of bathing: ideal temperature and timing",
            "Morning routines and your health",
            "Evening routines and sleep quality",
            "Why fiber matters",
            "The health effects of fermented foods",
            "Antioxidants and slowing aging",
            "How much protein you actually need",
            "What sugar does to your body",
            "Alcohol and health: the honest picture",
            "Daily habits that strengthen immunity",
            "Overcoming chronic fatigue",
            "Daily habits that prevent headaches",
            "Science-backed relief for neck and back pain",
            "Habits that protect your eyes",
            "Oral health and whole-body health",
            "Keeping your hormones in balance",
            "Navigating menopause with science",
            "The science of longevity: lessons from the blue zones",
            "Ways to energize your mitochondria",
            "Telomeres and aging",
            "Building a stress-resilient body",
            "Staying healthy through seasonal changes",
            "A scientific approach to easing hay fever",
            "Meal timing and your health",
            "The effects of mindful eating",
        ]),
        system_prompt: "You are a health science expert and a professional blog writer. \
Write practical, evidence-based articles grounded in current medical and \
nutrition research.\n\n\
Style:\n\
- Warm, approachable tone that speaks directly to the reader\n\n\
Must include:\n\
- Concrete, actionable practices\n\
- Citations of scientific research (e.g. \"a study at ... University found...\", \
\"a paper in the journal ... reported...\")\n\
- Numbers and data (e.g. \"improved by ...%\", \"effective after ... minutes\")\n\
- Caveats and individual differences\n\n\
Write headings in Markdown (## and ###)."
            .to_string(),
    }
}

fn default_exercise() -> CategoryProfile {
    CategoryProfile {
        name: "Exercise".to_string(),
        tag: "exercise".to_string(),
        image_keywords: "fitness exercise workout training sports".to_string(),
        themes: themes(&[
            "What the science says about HIIT",
            "Strength training and your brain",
            "Aerobic exercise and heart health",
            "The science of stretching for flexibility",
            "The risks of sitting too much, and what to do",
            "How often and how long to exercise",
            "Exercise and mental health",
            "The science of efficient fat burning",
            "Making an exercise habit stick",
            "The health benefits of walking",
            "Running form and its benefits",
            "The science of the squat: doing it right",
            "Getting the most out of planks",
            "The science of core training",
            "Morning vs. evening workouts: the best time to train",
            "What to eat before and after exercise",
            "Muscle soreness: why it happens and how to recover",
            "Avoiding overtraining",
            "Why rest days matter and how to spend them",
            "Exercise as you age: training for every decade",
            "The science of strength training for women",
            "Exercise and bone density",
            "Exercise and sleep quality",
            "Exercise and hormonal balance",
            "How exercise reduces stress",
            "Using exercise to sharpen focus",
            "Exercise and creativity",
            "An exercise routine for desk workers",
            "Effective workouts you can do at home",
            "The science of yoga",
            "Pilates and core strength",
            "Swimming as a full-body workout",
            "The health benefits of cycling",
            "The surprising benefits of taking the stairs",
            "Jump rope: a lot of exercise in a little time",
            "Dance and brain activation",
            "Why balance training matters",
            "What interval training does for you",
            "Resistance training fundamentals",
            "Bodyweight training: benefits and methods",
            "Dumbbell training fundamentals",
            "Exercise and your immune system",
            "Recovery techniques after a workout",
            "Dynamic versus static stretching",
            "The science of warming up",
            "Why cooling down matters",
            "Exercise and longevity",
            "A hundred benefits of an exercise habit",
            "The science of staying motivated",
            "The social benefits of exercise",
        ]),
        system_prompt: "You are an exercise science and sports medicine expert and a \
professional blog writer. Write practical, evidence-based articles grounded in \
current sports science research.\n\n\
Style:\n\
- Warm, approachable tone that speaks directly to the reader\n\n\
Must include:\n\
- Concrete exercise prescriptions (sets, reps, durations)\n\
- Citations of scientific research (e.g. \"a study at ... University found...\")\n\
- Correct form explained\n\
- Injury-prevention caveats\n\
- Step-by-step guidance for beginners\n\n\
Write headings in Markdown (## and ###)."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_sizes() {
        let catalog = Catalog::default();
        assert_eq!(catalog.relationship.themes.len(), 50);
        assert_eq!(catalog.health.themes.len(), 50);
        assert_eq!(catalog.exercise.themes.len(), 50);
        assert_eq!(catalog.sub_themes.len(), 10);
    }

    #[test]
    fn test_rotation_cycles_every_three_days() {
        let d1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let d4 = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        assert_ne!(category_for_date(d1), category_for_date(d2));
        assert_eq!(category_for_date(d1), category_for_date(d4));
    }

    #[test]
    fn test_rotation_covers_all_categories() {
        let mut seen = std::collections::BTreeSet::new();
        for day in 1..=3 {
            let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
            seen.insert(category_for_date(date));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("model: gpt-4o\nmin_chars: 4500\n").unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.min_chars, 4500);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.catalog.relationship.themes.len(), 50);
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.model, config.model);
        assert_eq!(back.catalog.exercise.themes, config.catalog.exercise.themes);
    }

    #[test]
    fn test_profile_is_total_over_categories() {
        let catalog = Catalog::default();
        assert_eq!(catalog.profile(Category::Relationship).name, "Relationships");
        assert_eq!(catalog.profile(Category::Health).name, "Health");
        assert_eq!(catalog.profile(Category::Exercise).name, "Exercise");
    }
}
