//! Daily progress aggregates for efficient dashboard queries.
//!
//! These aggregates are recomputed from the day's activity logs whenever a
//! new activity is logged, and upserted keyed by (user_id, date).

use serde::{Deserialize, Serialize};

use crate::models::{ActivityLog, Intent};

/// Per-activity progress weight and duration divisor for each pillar.
///
/// A pillar reaches 100% through some mix of activity count and logged
/// minutes; the divisors mirror how much time a typical session takes.
const BODY_WEIGHT: f64 = 25.0;
const MIND_WEIGHT: f64 = 30.0;
const SOUL_WEIGHT: f64 = 35.0;
const BODY_MINUTES_PER_POINT: f64 = 6.0;
const MIND_MINUTES_PER_POINT: f64 = 3.0;
const SOUL_MINUTES_PER_POINT: f64 = 2.0;

/// Nested activity counts for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellnessCounts {
    #[serde(default)]
    pub workouts: u32,
    #[serde(default)]
    pub meals: u32,
    #[serde(default)]
    pub supplements: u32,
    #[serde(default)]
    pub meditation_minutes: u32,
    #[serde(default)]
    pub other: u32,
}

/// Pre-computed daily statistics for a user.
///
/// Stored in the `daily_stats` collection keyed by `{user_id}_{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStats {
    /// Owning user ID
    pub user_id: String,
    /// Calendar date, "YYYY-MM-DD" (UTC)
    pub date: String,
    /// Body pillar progress, 0-100
    #[serde(default)]
    pub body_progress: u8,
    /// Mind pillar progress, 0-100
    #[serde(default)]
    pub mind_progress: u8,
    /// Soul pillar progress, 0-100
    #[serde(default)]
    pub soul_progress: u8,
    /// Total activities logged this date
    #[serde(default)]
    pub total_activities: u32,
    /// Counts by activity kind
    #[serde(default)]
    pub counts: WellnessCounts,
    /// Last update timestamp (ISO 8601)
    #[serde(default)]
    pub updated_at: String,
}

impl DailyStats {
    /// Recompute the aggregate from all of the day's logs.
    ///
    /// `logs` must already be filtered to this user and date; the scan is
    /// linear and the result replaces any previously stored row.
    pub fn recompute_from_logs(
        user_id: &str,
        date: &str,
        logs: &[ActivityLog],
        now: &str,
    ) -> Self {
        let mut counts = WellnessCounts::default();
        let (mut body_count, mut body_minutes) = (0u32, 0u32);
        let (mut mind_count, mut mind_minutes) = (0u32, 0u32);
        let (mut soul_count, mut soul_minutes) = (0u32, 0u32);

        for log in logs {
            let minutes = log.duration_minutes.unwrap_or(0);
            match log.detected_intent {
                Intent::Workout => {
                    counts.workouts += 1;
                    body_count += 1;
                    body_minutes += minutes;
                }
                Intent::FoodIntake => {
                    counts.meals += 1;
                    body_count += 1;
                    body_minutes += minutes;
                }
                Intent::SupplementIntake => {
                    counts.supplements += 1;
                    body_count += 1;
                }
                Intent::Meditation => {
                    counts.meditation_minutes += minutes;
                    mind_count += 1;
                    mind_minutes += minutes;
                }
                Intent::GeneralActivityLog => {
                    counts.other += 1;
                    soul_count += 1;
                    soul_minutes += minutes;
                }
            }
        }

        Self {
            user_id: user_id.to_string(),
            date: date.to_string(),
            body_progress: progress(body_count, body_minutes, BODY_WEIGHT, BODY_MINUTES_PER_POINT),
            mind_progress: progress(mind_count, mind_minutes, MIND_WEIGHT, MIND_MINUTES_PER_POINT),
            soul_progress: progress(soul_count, soul_minutes, SOUL_WEIGHT, SOUL_MINUTES_PER_POINT),
            total_activities: logs.len() as u32,
            counts,
            updated_at: now.to_string(),
        }
    }
}

/// Progress from activity count plus logged minutes, clamped to [0, 100].
fn progress(count: u32, minutes: u32, weight: f64, minutes_per_point: f64) -> u8 {
    let raw = count as f64 * weight + minutes as f64 / minutes_per_point;
    raw.round().clamp(0.0, 100.0) as u8
}
