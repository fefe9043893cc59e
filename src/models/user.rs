//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (UUID v4, also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (unique; the sign-in key)
    pub email: String,
    /// Avatar URL
    pub avatar: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Height in centimeters
    pub height: Option<f64>,
    /// Free-text wellness goal; None until onboarding completes
    pub primary_wellness_goal: Option<String>,
    /// Goals grouped by pillar
    pub goals: Option<UserGoals>,
    /// Tracked supplements
    #[serde(default)]
    pub supplements: Vec<Supplement>,
    /// Consecutive days with logged activity
    #[serde(default)]
    pub current_streak: u32,
    /// Longest streak achieved
    #[serde(default)]
    pub longest_streak: u32,
    /// When the user first signed in (ISO 8601)
    pub created_at: String,
}

impl User {
    /// Onboarding is complete once a primary goal has been set.
    pub fn has_onboarded(&self) -> bool {
        self.primary_wellness_goal.is_some()
    }
}

/// Goal lists keyed by wellness pillar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGoals {
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default)]
    pub mind: Vec<String>,
    #[serde(default)]
    pub soul: Vec<String>,
}

/// A supplement the user tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplement {
    pub id: String,
    pub name: String,
    /// e.g. "1000 IU"
    pub dosage: String,
    /// e.g. "Daily"
    pub frequency: String,
}

/// Client-writable profile fields for partial updates.
///
/// `id`, `created_at` and the streak counters are never client-writable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub primary_wellness_goal: Option<String>,
    pub goals: Option<UserGoals>,
    pub supplements: Option<Vec<Supplement>>,
}

impl UserUpdate {
    /// Apply the present fields onto an existing user.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(age) = self.age {
            user.age = Some(age);
        }
        if let Some(weight) = self.weight {
            user.weight = Some(weight);
        }
        if let Some(height) = self.height {
            user.height = Some(height);
        }
        if let Some(goal) = self.primary_wellness_goal {
            user.primary_wellness_goal = Some(goal);
        }
        if let Some(goals) = self.goals {
            user.goals = Some(goals);
        }
        if let Some(supplements) = self.supplements {
            user.supplements = supplements;
        }
    }
}
