// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes: users, onboarding, activity logging, dashboard.

use crate::error::{AppError, Result};
use crate::models::{ActivityLog, User, UserUpdate};
use crate::services::{ActivityStats, Dashboard, VoiceLogResult};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

const DEFAULT_ACTIVITY_LIMIT: u32 = 20;
const MAX_ACTIVITY_LIMIT: u32 = 100;
const DEFAULT_STATS_DAYS: u32 = 7;
const MAX_STATS_DAYS: u32 = 365;

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(sign_in))
        .route("/api/users/{id}", get(get_user).patch(update_user))
        .route("/api/onboarding", post(complete_onboarding))
        .route("/api/activity-logs", post(log_activity))
        .route("/api/activity-logs/{user_id}", get(list_activities))
        .route("/api/dashboard/{user_id}", get(get_dashboard))
        .route("/api/stats/{user_id}", get(get_stats))
}

/// Map request body validation failures to a 400.
fn check<T: Validate>(payload: &T) -> Result<()> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ─── Users ───────────────────────────────────────────────────

/// Sign-in-or-create request.
#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub avatar: Option<String>,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub user: User,
    pub is_new_user: bool,
}

/// Sign in by email, creating the user on first contact.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SignInResponse>> {
    check(&payload)?;

    let (user, is_new_user) = state
        .wellness
        .sign_in(&payload.name, &payload.email, payload.avatar)
        .await?;

    Ok(Json(SignInResponse { user, is_new_user }))
}

/// Get a user profile.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    Ok(Json(state.wellness.get_user(&id).await?))
}

/// Partial profile update.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(updates): Json<UserUpdate>,
) -> Result<Json<User>> {
    Ok(Json(state.wellness.update_profile(&id, updates).await?))
}

// ─── Onboarding ──────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct OnboardingRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 13, max = 120))]
    pub age: Option<u32>,
    #[validate(length(min = 1, max = 500))]
    pub primary_wellness_goal: String,
}

/// Complete onboarding: age plus the primary wellness goal.
async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<User>> {
    check(&payload)?;

    let user = state
        .wellness
        .complete_onboarding(
            &payload.user_id,
            payload.age,
            payload.primary_wellness_goal,
        )
        .await?;

    Ok(Json(user))
}

// ─── Activity Logging ────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct LogActivityRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Free-text activity input; length is bounded by the service against
    /// the configured maximum
    pub text: String,
}

/// Log a free-text activity.
async fn log_activity(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LogActivityRequest>,
) -> Result<Json<VoiceLogResult>> {
    check(&payload)?;

    let result = state
        .wellness
        .log_activity(&payload.user_id, &payload.text)
        .await?;

    Ok(Json(result))
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    limit: Option<u32>,
}

/// Most recent activity logs for a user.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<ActivityLog>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .min(MAX_ACTIVITY_LIMIT);

    Ok(Json(state.wellness.list_activities(&user_id, limit).await?))
}

// ─── Dashboard & Stats ───────────────────────────────────────

/// Dashboard aggregates for a user.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Dashboard>> {
    Ok(Json(state.wellness.get_dashboard(&user_id).await?))
}

#[derive(Deserialize)]
struct StatsQuery {
    days: Option<u32>,
}

/// Windowed activity statistics for a user.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<ActivityStats>> {
    let days = params.days.unwrap_or(DEFAULT_STATS_DAYS).min(MAX_STATS_DAYS);

    Ok(Json(state.wellness.get_activity_stats(&user_id, days).await?))
}
