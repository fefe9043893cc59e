// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity intent classification.
//!
//! Maps free-text activity input to one of five intent categories plus
//! extracted keywords and measurements. The primary path is a single
//! timeout-bounded Gemini `generateContent` call with a strict response
//! schema; any failure (missing or malformed credential, transport error,
//! non-2xx status, timeout, unparseable body) degrades to deterministic
//! keyword matching. Classification never fails on valid input.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{ClassificationSource, Intent};

/// Minimum plausible length of a Gemini API key.
const MIN_API_KEY_LEN: usize = 20;

/// Keyword list cap (3-5 keywords per classification).
const MAX_KEYWORDS: usize = 5;

/// Content words appended after the category tag.
const MAX_CONTENT_WORDS: usize = 3;

/// Category keyword sets, tested in priority order.
const WORKOUT_KEYWORDS: &[&str] = &["workout", "exercise", "run", "gym", "training", "yoga"];
const FOOD_KEYWORDS: &[&str] = &[
    "ate",
    "food",
    "lunch",
    "dinner",
    "breakfast",
    "meal",
    "snack",
];
const SUPPLEMENT_KEYWORDS: &[&str] = &["vitamin", "supplement", "pill", "took"];
const MEDITATION_KEYWORDS: &[&str] = &["meditat", "breathing", "mindful", "relax"];

/// Words skipped during content-word extraction.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "was", "were", "did", "had", "have", "has", "this", "that",
    "then", "just", "some", "today", "before", "after", "about", "into", "out", "very", "really",
    "went", "got",
];

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(minutes?|hours?|min|hr)\b").expect("duration regex")
});

static INTENSITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(light|low|easy|gentle|moderate|medium|intense|high|hard|vigorous)\b")
        .expect("intensity regex")
});

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d+)\s*(reps?|sets?|servings?|capsules?|pills?|tablets?|glasses?|cups?|grams?|mg|ml)\b",
    )
    .expect("quantity regex")
});

/// Result of classifying one activity input.
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    pub keywords: Vec<String>,
    pub duration: Option<String>,
    pub intensity: Option<String>,
    pub quantity: Option<String>,
    /// In [0, 1]
    pub confidence: f64,
    pub source: ClassificationSource,
}

/// Intent classification service.
///
/// Holds the optional Gemini client; without one (no credential, or a
/// credential that failed shape validation) every call uses the keyword
/// fallback.
#[derive(Clone)]
pub struct ClassifierService {
    client: Option<GeminiClient>,
    max_input_chars: usize,
}

impl ClassifierService {
    /// Build the service from an optional API key.
    ///
    /// A missing or implausible key is not an error: the service runs in
    /// fallback-only mode and reports it via [`ClassifierService::mode`].
    pub fn new(api_key: Option<String>, timeout_secs: u64, max_input_chars: usize) -> Self {
        let client = match api_key {
            Some(key) if valid_key_shape(&key) => {
                match GeminiClient::new(key, Duration::from_secs(timeout_secs)) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to build Gemini client, classifier running in fallback mode");
                        None
                    }
                }
            }
            Some(_) => {
                tracing::warn!("GEMINI_API_KEY failed shape validation, classifier running in fallback mode");
                None
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not configured, classifier running in fallback mode");
                None
            }
        };

        Self {
            client,
            max_input_chars,
        }
    }

    /// Which path classification currently takes.
    pub fn mode(&self) -> ClassificationSource {
        if self.client.is_some() {
            ClassificationSource::Ai
        } else {
            ClassificationSource::Fallback
        }
    }

    /// Validate free-text input before classification or any side effect.
    pub fn validate_text(&self, text: &str) -> Result<(), AppError> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Activity text cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > self.max_input_chars {
            return Err(AppError::BadRequest(format!(
                "Activity text too long (max {} characters)",
                self.max_input_chars
            )));
        }
        Ok(())
    }

    /// Classify activity text, degrading to keyword matching on any failure.
    ///
    /// `goal_hint` is the user's primary wellness goal, folded into the
    /// prompt so ambiguous inputs lean toward the user's stated focus.
    pub async fn classify(
        &self,
        text: &str,
        goal_hint: Option<&str>,
    ) -> Result<Classification, AppError> {
        self.validate_text(text)?;

        let Some(client) = &self.client else {
            tracing::debug!("No classifier credential, using keyword fallback");
            return Ok(fallback_classification(text));
        };

        match client.classify_activity(text, goal_hint).await {
            Ok(classification) => Ok(classification),
            Err(e) => {
                tracing::warn!(error = %e, "Gemini classification failed, using keyword fallback");
                Ok(fallback_classification(text))
            }
        }
    }
}

/// Basic shape validation for an API key: trimmed, no inner whitespace,
/// plausible length.
fn valid_key_shape(key: &str) -> bool {
    key.len() >= MIN_API_KEY_LEN && !key.chars().any(char::is_whitespace)
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyword fallback
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic keyword classification.
///
/// Pure function of the input text: category by keyword match in priority
/// order, keywords from the matched tag plus stopword-filtered content
/// words, measurements by regex. This is the ultimate error boundary for
/// classification and cannot fail.
///
/// Category keywords match as token prefixes: "run" covers "running" and
/// "meditat" covers "meditated", while "ate" only matches words that start
/// with it.
pub fn fallback_classification(text: &str) -> Classification {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    let matched = [
        (Intent::Workout, WORKOUT_KEYWORDS, "exercise"),
        (Intent::FoodIntake, FOOD_KEYWORDS, "food"),
        (Intent::SupplementIntake, SUPPLEMENT_KEYWORDS, "supplement"),
        (Intent::Meditation, MEDITATION_KEYWORDS, "meditation"),
    ]
    .into_iter()
    .find(|(_, set, _)| {
        tokens
            .iter()
            .any(|token| set.iter().any(|kw| token.starts_with(kw)))
    });

    let (intent, tag) = match matched {
        Some((intent, _, tag)) => (intent, Some(tag)),
        None => (Intent::GeneralActivityLog, None),
    };

    let mut keywords: Vec<String> = Vec::new();
    if let Some(tag) = tag {
        keywords.push(tag.to_string());
    }
    keywords.extend(content_words(&lower, &keywords));
    keywords.truncate(MAX_KEYWORDS);

    let duration = DURATION_RE
        .captures(text)
        .map(|c| format!("{} {}", &c[1], c[2].to_lowercase()));
    let intensity = INTENSITY_RE.captures(text).map(|c| c[1].to_lowercase());
    let quantity = QUANTITY_RE
        .captures(text)
        .map(|c| format!("{} {}", &c[1], c[2].to_lowercase()));

    // 0.6 base, bumped for a category match and for an extracted measurement
    let extracted = duration.is_some() || intensity.is_some() || quantity.is_some();
    let confidence = match (tag.is_some(), extracted) {
        (true, true) => 0.8,
        (true, false) | (false, true) => 0.7,
        (false, false) => 0.6,
    };

    Classification {
        intent,
        keywords,
        duration,
        intensity,
        quantity,
        confidence,
        source: ClassificationSource::Fallback,
    }
}

/// Up to three lowercased content words: longer than two characters, not a
/// stopword, not already collected.
fn content_words(lower: &str, taken: &[String]) -> Vec<String> {
    let mut words = Vec::new();
    for raw in lower.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if word.chars().count() <= 2
            || STOPWORDS.contains(&word)
            || taken.iter().any(|t| t == word)
            || words.iter().any(|w| w == word)
        {
            continue;
        }
        words.push(word.to_string());
        if words.len() == MAX_CONTENT_WORDS {
            break;
        }
    }
    words
}

// ─────────────────────────────────────────────────────────────────────────────
// GeminiClient - single-shot structured classification call
// ─────────────────────────────────────────────────────────────────────────────

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new client; the timeout bounds the whole request.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ClassifierApi(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Classify one activity input. Single attempt, no retries; the caller
    /// owns the fallback.
    pub async fn classify_activity(
        &self,
        text: &str,
        goal_hint: Option<&str>,
    ) -> Result<Classification, AppError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, GEMINI_MODEL
        );

        let body = serde_json::json!({
            "system_instruction": {
                "parts": [{ "text": system_prompt(goal_hint) }]
            },
            "contents": [{
                "parts": [{ "text": text }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "object",
                    "properties": {
                        "intent": {
                            "type": "string",
                            "enum": [
                                "workout",
                                "food_intake",
                                "supplement_intake",
                                "meditation",
                                "general_activity_log"
                            ]
                        },
                        "keywords": { "type": "array", "items": { "type": "string" } },
                        "duration": { "type": "string" },
                        "intensity": { "type": "string" },
                        "quantity": { "type": "string" },
                        "confidence": { "type": "number", "minimum": 0, "maximum": 1 }
                    },
                    "required": ["intent", "keywords", "confidence"]
                }
            }
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ClassifierApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ClassifierApi(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ClassifierApi(format!("JSON parse error: {}", e)))?;

        let raw = parsed
            .first_text()
            .ok_or_else(|| AppError::ClassifierApi("Empty response from model".to_string()))?;

        let output: AiClassification = serde_json::from_str(raw)
            .map_err(|e| AppError::ClassifierApi(format!("Schema violation: {}", e)))?;

        let mut keywords = output.keywords;
        keywords.truncate(MAX_KEYWORDS);

        Ok(Classification {
            intent: output.intent,
            keywords,
            duration: output.duration,
            intensity: output.intensity,
            quantity: output.quantity,
            confidence: output.confidence.unwrap_or(0.8).clamp(0.0, 1.0),
            source: ClassificationSource::Ai,
        })
    }
}

/// Fixed instruction prompt enumerating the five categories.
fn system_prompt(goal_hint: Option<&str>) -> String {
    let general_line = match goal_hint {
        Some(goal) => format!(
            "- general_activity_log: Any other wellness-related activity, especially related to: \"{}\"",
            goal
        ),
        None => "- general_activity_log: Any other wellness-related activity".to_string(),
    };

    format!(
        "You are an AI wellness assistant that classifies user activity logs into simple categories.\n\
         \n\
         INTENT CATEGORIES:\n\
         - workout: Physical exercise, fitness activities, sports\n\
         - food_intake: Eating, drinking, meals, snacks\n\
         - supplement_intake: Taking vitamins, supplements, medications\n\
         - meditation: Meditation, mindfulness, breathing exercises\n\
         {}\n\
         \n\
         TASK: Classify the user input and extract basic keywords.\n\
         Extract 3-5 relevant keywords. Include duration, intensity, or quantity only if explicitly mentioned.",
        general_line
    )
}

/// Response envelope from `generateContent`.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First text part of the first candidate, if any.
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// The model's structured output; unknown intent values fail
/// deserialization, which routes to the fallback.
#[derive(Debug, Deserialize)]
struct AiClassification {
    intent: Intent,
    #[serde(default)]
    keywords: Vec<String>,
    duration: Option<String>,
    intensity: Option<String>,
    quantity: Option<String>,
    confidence: Option<f64>,
}
