//! In-memory fallback backend.
//!
//! Mirrors every operation of [`crate::store::FirestoreStore`] over
//! DashMap-backed tables, so the service keeps accepting logs when no
//! database is configured or reachable. Each operation is a single atomic
//! map access; none of them can fail.

use std::sync::Arc;

use dashmap::DashMap;

use crate::models::{
    ActivityLog, ClassificationSource, DailyStats, ExtractedKeywords, Intent, User, UserGoals,
};
use crate::store::daily_stats_key;

/// Fixed ID of the seeded demo user, so the zero-config path is usable
/// without a sign-in round-trip.
pub const DEMO_USER_ID: &str = "demo-user-alex";

/// In-memory store over concurrent maps.
#[derive(Clone)]
pub struct MemoryStore {
    users: Arc<DashMap<String, User>>,
    activity_logs: Arc<DashMap<String, ActivityLog>>,
    daily_stats: Arc<DashMap<String, DailyStats>>,
}

impl Default for MemoryStore {
    /// An in-memory store seeded with deterministic demo entities.
    fn default() -> Self {
        let store = Self::empty();
        store.seed_demo_data();
        store
    }
}

impl MemoryStore {
    /// An unseeded store, for tests that need a clean slate.
    pub fn empty() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            activity_logs: Arc::new(DashMap::new()),
            daily_stats: Arc::new(DashMap::new()),
        }
    }

    /// Number of users currently held (for health reporting).
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of activity logs currently held (for health reporting).
    pub fn activity_log_count(&self) -> usize {
        self.activity_logs.len()
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|u| u.value().clone())
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.value().clone())
    }

    pub fn upsert_user(&self, user: &User) {
        self.users.insert(user.id.clone(), user.clone());
    }

    // ─── Activity Log Operations ─────────────────────────────────

    pub fn create_activity_log(&self, log: &ActivityLog) {
        self.activity_logs.insert(log.id.clone(), log.clone());
    }

    /// Most recent logs for a user, newest first.
    pub fn list_activity_logs(&self, user_id: &str, limit: u32) -> Vec<ActivityLog> {
        let mut logs: Vec<ActivityLog> = self
            .activity_logs
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        // RFC 3339 timestamps sort chronologically as strings
        logs.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        logs.truncate(limit as usize);
        logs
    }

    // ─── Daily Stats Operations ──────────────────────────────────

    pub fn get_daily_stats(&self, user_id: &str, date: &str) -> Option<DailyStats> {
        self.daily_stats
            .get(&daily_stats_key(user_id, date))
            .map(|s| s.value().clone())
    }

    pub fn upsert_daily_stats(&self, stats: &DailyStats) {
        self.daily_stats.insert(
            daily_stats_key(&stats.user_id, &stats.date),
            stats.clone(),
        );
    }

    // ─── Demo Seed ───────────────────────────────────────────────

    /// Seed a demo user and a handful of sample logs.
    ///
    /// Names, emails and IDs are fixed; timestamps are taken at process
    /// start so the demo dashboard shows activity "today".
    fn seed_demo_data(&self) {
        let now = chrono::Utc::now().to_rfc3339();

        self.upsert_user(&User {
            id: DEMO_USER_ID.to_string(),
            name: "Alex Johnson".to_string(),
            email: "alex@evolveai.com".to_string(),
            avatar: None,
            age: Some(28),
            weight: None,
            height: None,
            primary_wellness_goal: Some(
                "I want to stay healthy and reduce stress through regular exercise and meditation"
                    .to_string(),
            ),
            goals: Some(UserGoals {
                body: vec![
                    "Exercise 3 times a week".to_string(),
                    "Maintain healthy weight".to_string(),
                ],
                mind: vec![
                    "Meditate daily".to_string(),
                    "Reduce work stress".to_string(),
                ],
                soul: vec![
                    "Practice gratitude".to_string(),
                    "Connect with nature".to_string(),
                ],
            }),
            supplements: vec![],
            current_streak: 0,
            longest_streak: 0,
            created_at: now.clone(),
        });

        let samples = [
            (
                "demo-log-1",
                "I did a 30 minute HIIT workout this morning",
                Intent::Workout,
                vec!["HIIT", "workout", "morning"],
                Some("30 minutes"),
                Some("high"),
                None,
                Some(30),
            ),
            (
                "demo-log-2",
                "Had a healthy chicken salad for lunch",
                Intent::FoodIntake,
                vec!["chicken", "salad", "lunch"],
                None,
                None,
                Some("1 serving"),
                None,
            ),
            (
                "demo-log-3",
                "Took my daily vitamin D supplement",
                Intent::SupplementIntake,
                vec!["vitamin", "supplement", "daily"],
                None,
                None,
                Some("1 capsule"),
                None,
            ),
            (
                "demo-log-4",
                "Meditated for 15 minutes before work",
                Intent::Meditation,
                vec!["meditated", "work", "morning"],
                Some("15 minutes"),
                None,
                None,
                Some(15),
            ),
        ];

        for (id, text, intent, keywords, duration, intensity, quantity, minutes) in samples {
            self.create_activity_log(&ActivityLog {
                id: id.to_string(),
                user_id: DEMO_USER_ID.to_string(),
                raw_text_input: text.to_string(),
                detected_intent: intent,
                extracted_keywords: ExtractedKeywords {
                    keywords: keywords.into_iter().map(String::from).collect(),
                    duration: duration.map(String::from),
                    intensity: intensity.map(String::from),
                    quantity: quantity.map(String::from),
                    confidence: 0.9,
                    source: ClassificationSource::Ai,
                },
                duration_minutes: minutes,
                completed_at: now.clone(),
            });
        }
    }
}
