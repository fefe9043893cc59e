// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness service - orchestration layer.
//!
//! Handles the core logging workflow:
//! 1. Validate the free-text input
//! 2. Resolve the user (their goal becomes the classifier hint)
//! 3. Classify the text
//! 4. Persist the activity log
//! 5. Recompute the day's stats aggregate
//!
//! Plus the read-side operations: dashboard, activity stats, sign-in,
//! onboarding and profile updates.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    ActivityLog, ClassificationSource, DailyStats, ExtractedKeywords, User, UserUpdate,
};
use crate::services::classifier::{Classification, ClassifierService};
use crate::store::{Store, StoreHealth};

/// How many recent logs back the dashboard scan.
const DASHBOARD_RECENT_LIMIT: u32 = 10;

/// How many recent logs feed the daily-stats recompute and stats window.
const STATS_SCAN_LIMIT: u32 = 100;

/// Result of one voice/text logging request.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceLogResult {
    pub success: bool,
    pub intent: String,
    pub keywords: Vec<String>,
    pub message: String,
    pub confidence: f64,
    pub source: ClassificationSource,
}

/// Dashboard payload: the user plus aggregates over their recent logs.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: User,
    pub recent_activities: Vec<ActivityLog>,
    pub total_activities: u32,
    pub today_activities: u32,
    pub activity_breakdown: HashMap<String, u32>,
}

/// Windowed activity statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityStats {
    pub total: u32,
    pub by_intent: HashMap<String, u32>,
    pub by_day: HashMap<String, u32>,
    pub average_confidence: f64,
}

/// Subsystem degradation report for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Which path classification currently takes
    pub classifier_mode: ClassificationSource,
    pub store: StoreHealth,
}

/// Orchestrates classification, persistence and aggregation.
#[derive(Clone)]
pub struct WellnessService {
    store: Store,
    classifier: ClassifierService,
}

impl WellnessService {
    pub fn new(store: Store, classifier: ClassifierService) -> Self {
        Self { store, classifier }
    }

    // ─── Activity Logging ────────────────────────────────────────

    /// Process one free-text activity log.
    ///
    /// Input validation and user resolution happen before classification,
    /// so rejected requests leave no trace in the store.
    pub async fn log_activity(&self, user_id: &str, text: &str) -> Result<VoiceLogResult> {
        self.classifier.validate_text(text)?;

        let user = self
            .store
            .get_user(user_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        tracing::info!(
            user = %user.name,
            input = %truncate_for_log(text),
            "Processing activity input"
        );

        let classification = self
            .classifier
            .classify(text, user.primary_wellness_goal.as_deref())
            .await?;

        let now = chrono::Utc::now();
        let log = ActivityLog {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            raw_text_input: text.to_string(),
            detected_intent: classification.intent,
            extracted_keywords: ExtractedKeywords {
                keywords: classification.keywords.clone(),
                duration: classification.duration.clone(),
                intensity: classification.intensity.clone(),
                quantity: classification.quantity.clone(),
                confidence: classification.confidence,
                source: classification.source,
            },
            duration_minutes: classification
                .duration
                .as_deref()
                .and_then(parse_duration_minutes),
            completed_at: now.to_rfc3339(),
        };

        self.store.create_activity_log(&log).await;
        self.recompute_daily_stats(&user.id, &now.format("%Y-%m-%d").to_string())
            .await;

        tracing::info!(
            user_id = %user.id,
            intent = %classification.intent,
            confidence = classification.confidence,
            source = ?classification.source,
            "Activity logged"
        );

        Ok(VoiceLogResult {
            success: true,
            intent: classification.intent.as_str().to_string(),
            keywords: classification.keywords.clone(),
            message: confirmation_message(text, &classification),
            confidence: classification.confidence,
            source: classification.source,
        })
    }

    /// Recompute and upsert the daily aggregate from the day's logs.
    ///
    /// Concurrent recomputes for the same user and date race last-write-wins.
    async fn recompute_daily_stats(&self, user_id: &str, date: &str) {
        let recent = self.store.list_activity_logs(user_id, STATS_SCAN_LIMIT).await;
        let day_logs: Vec<ActivityLog> = recent
            .into_iter()
            .filter(|log| log.completed_on(date))
            .collect();

        let stats = DailyStats::recompute_from_logs(
            user_id,
            date,
            &day_logs,
            &chrono::Utc::now().to_rfc3339(),
        );
        self.store.upsert_daily_stats(&stats).await;
    }

    // ─── Dashboard & Stats ───────────────────────────────────────

    /// Aggregate the user's recent activity for the dashboard. Pure read.
    pub async fn get_dashboard(&self, user_id: &str) -> Result<Dashboard> {
        let user = self
            .store
            .get_user(user_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let recent = self
            .store
            .list_activity_logs(user_id, DASHBOARD_RECENT_LIMIT)
            .await;

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let today_activities = recent.iter().filter(|log| log.completed_on(&today)).count();

        let mut activity_breakdown: HashMap<String, u32> = HashMap::new();
        for log in &recent {
            *activity_breakdown
                .entry(log.detected_intent.as_str().to_string())
                .or_insert(0) += 1;
        }

        Ok(Dashboard {
            user,
            total_activities: recent.len() as u32,
            today_activities: today_activities as u32,
            activity_breakdown,
            recent_activities: recent,
        })
    }

    /// Windowed statistics over the last `days` days.
    pub async fn get_activity_stats(&self, user_id: &str, days: u32) -> Result<ActivityStats> {
        if self.store.get_user(user_id).await.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let logs = self.store.list_activity_logs(user_id, STATS_SCAN_LIMIT).await;
        let cutoff = (chrono::Utc::now() - chrono::Duration::days(days as i64)).to_rfc3339();

        let mut by_intent: HashMap<String, u32> = HashMap::new();
        let mut by_day: HashMap<String, u32> = HashMap::new();
        let mut total = 0u32;
        let mut confidence_sum = 0.0;

        for log in logs.iter().filter(|log| log.completed_at >= cutoff) {
            total += 1;
            confidence_sum += log.extracted_keywords.confidence;
            *by_intent
                .entry(log.detected_intent.as_str().to_string())
                .or_insert(0) += 1;
            if log.completed_at.len() >= 10 {
                *by_day
                    .entry(log.completed_at[..10].to_string())
                    .or_insert(0) += 1;
            }
        }

        let average_confidence = if total > 0 {
            confidence_sum / total as f64
        } else {
            0.0
        };

        Ok(ActivityStats {
            total,
            by_intent,
            by_day,
            average_confidence,
        })
    }

    /// Most recent activity logs for a user.
    pub async fn list_activities(&self, user_id: &str, limit: u32) -> Result<Vec<ActivityLog>> {
        if self.store.get_user(user_id).await.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(self.store.list_activity_logs(user_id, limit).await)
    }

    // ─── Users & Onboarding ──────────────────────────────────────

    /// Sign in by email, creating the user on first contact.
    ///
    /// Returns the user plus whether onboarding is still pending.
    pub async fn sign_in(
        &self,
        name: &str,
        email: &str,
        avatar: Option<String>,
    ) -> Result<(User, bool)> {
        if let Some(user) = self.store.get_user_by_email(email).await {
            let is_new = !user.has_onboarded();
            return Ok((user, is_new));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar,
            age: None,
            weight: None,
            height: None,
            primary_wellness_goal: None,
            goals: None,
            supplements: vec![],
            current_streak: 0,
            longest_streak: 0,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.create_user(&user).await;

        tracing::info!(user_id = %user.id, email = %user.email, "User created at sign-in");
        Ok((user, true))
    }

    /// Complete onboarding with age and the primary wellness goal.
    pub async fn complete_onboarding(
        &self,
        user_id: &str,
        age: Option<u32>,
        primary_wellness_goal: String,
    ) -> Result<User> {
        self.update_profile(
            user_id,
            UserUpdate {
                age,
                primary_wellness_goal: Some(primary_wellness_goal),
                ..Default::default()
            },
        )
        .await
    }

    /// Partial profile update.
    pub async fn update_profile(&self, user_id: &str, updates: UserUpdate) -> Result<User> {
        let mut user = self
            .store
            .get_user(user_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        updates.apply_to(&mut user);
        self.store.update_user(&user).await;
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.store
            .get_user(user_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    // ─── Health ──────────────────────────────────────────────────

    /// Degradation state of the classifier and the store.
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            classifier_mode: self.classifier.mode(),
            store: self.store.health(),
        }
    }
}

/// Confirmation message whose wording depends on the classification.
fn confirmation_message(text: &str, classification: &Classification) -> String {
    let mut message = format!("Logged \"{}\" as {}", text, classification.intent.label());

    if let Some(duration) = &classification.duration {
        message.push_str(&format!(" ({})", duration));
    }

    if classification.source == ClassificationSource::Fallback {
        message.push_str(" (using keyword matching)");
    }

    message
}

/// Parse a spoken duration like "30 minute" or "2 hours" into minutes.
fn parse_duration_minutes(duration: &str) -> Option<u32> {
    let mut parts = duration.split_whitespace();
    let value: u32 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;

    if unit.starts_with("min") {
        Some(value)
    } else if unit.starts_with("hour") || unit.starts_with("hr") {
        Some(value * 60)
    } else {
        None
    }
}

/// Keep log lines short for long inputs.
fn truncate_for_log(text: &str) -> String {
    const MAX: usize = 50;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(MAX).collect();
        format!("{}...", prefix)
    }
}
