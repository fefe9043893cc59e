// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity log model and the intent category set.

use serde::{Deserialize, Serialize};

/// Closed set of activity intent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Physical exercise, fitness activities, sports
    Workout,
    /// Eating, drinking, meals, snacks
    FoodIntake,
    /// Taking vitamins, supplements, medications
    SupplementIntake,
    /// Meditation, mindfulness, breathing exercises
    Meditation,
    /// Any other wellness-related activity
    GeneralActivityLog,
}

impl Intent {
    /// All categories, in classification priority order.
    pub const ALL: [Intent; 5] = [
        Intent::Workout,
        Intent::FoodIntake,
        Intent::SupplementIntake,
        Intent::Meditation,
        Intent::GeneralActivityLog,
    ];

    /// Wire name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Workout => "workout",
            Intent::FoodIntake => "food_intake",
            Intent::SupplementIntake => "supplement_intake",
            Intent::Meditation => "meditation",
            Intent::GeneralActivityLog => "general_activity_log",
        }
    }

    /// Human-readable label used in confirmation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Workout => "workout activity",
            Intent::FoodIntake => "food intake",
            Intent::SupplementIntake => "supplement",
            Intent::Meditation => "meditation session",
            Intent::GeneralActivityLog => "wellness activity",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// External Gemini call
    Ai,
    /// Deterministic keyword matching
    Fallback,
}

/// Structured extraction attached to a logged activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedKeywords {
    /// 3-5 relevant keywords from the input
    pub keywords: Vec<String>,
    /// Duration as spoken, e.g. "30 minute"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Intensity as spoken, e.g. "high"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    /// Quantity as spoken, e.g. "3 sets"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Classifier confidence in [0, 1]
    pub confidence: f64,
    /// Classification provenance
    pub source: ClassificationSource,
}

/// Stored activity log record.
///
/// Immutable once created; there is no update or delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    /// Log ID (UUID v4, also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Raw text as entered or transcribed
    pub raw_text_input: String,
    /// Detected intent category
    pub detected_intent: Intent,
    /// Keywords and measurements extracted during classification
    pub extracted_keywords: ExtractedKeywords,
    /// Duration in minutes, when the extracted duration was parseable
    pub duration_minutes: Option<u32>,
    /// Completion timestamp (ISO 8601)
    pub completed_at: String,
}

impl ActivityLog {
    /// Whether this log was completed on the given "YYYY-MM-DD" date (UTC).
    pub fn completed_on(&self, date: &str) -> bool {
        self.completed_at.starts_with(date)
    }
}
