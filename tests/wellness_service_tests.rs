// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness service pipeline: validation, rejection branches, aggregation.

use evolve_wellness::error::AppError;
use evolve_wellness::models::{ClassificationSource, UserUpdate};

mod common;

#[tokio::test]
async fn test_empty_input_rejected_before_any_store_write() {
    let store = common::test_store();
    let service = common::test_service(store.clone());
    common::seed_user(&store, "u-1", "a@example.com").await;

    let err = service.log_activity("u-1", "").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert!(store.list_activity_logs("u-1", 10).await.is_empty());
}

#[tokio::test]
async fn test_oversized_input_rejected() {
    let store = common::test_store();
    let service = common::test_service(store.clone());
    common::seed_user(&store, "u-1", "a@example.com").await;

    let text = "workout ".repeat(200); // 1600 chars, limit 1000
    let err = service.log_activity("u-1", &text).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_unknown_user_rejected_before_classification() {
    let store = common::test_store();
    let service = common::test_service(store.clone());

    let err = service
        .log_activity("no-such-user", "went for a run")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(store.list_activity_logs("no-such-user", 10).await.is_empty());
}

#[tokio::test]
async fn test_log_activity_persists_and_reports_fallback_source() {
    let store = common::test_store();
    let service = common::test_service(store.clone());
    common::seed_user(&store, "u-1", "a@example.com").await;

    let result = service
        .log_activity("u-1", "I did a 30 minute HIIT workout")
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.intent, "workout");
    assert_eq!(result.source, ClassificationSource::Fallback);
    assert_eq!(result.confidence, 0.8);
    assert_eq!(
        result.message,
        "Logged \"I did a 30 minute HIIT workout\" as workout activity (30 minute) (using keyword matching)"
    );

    let logs = store.list_activity_logs("u-1", 10).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].raw_text_input, "I did a 30 minute HIIT workout");
    assert_eq!(logs[0].duration_minutes, Some(30));
}

#[tokio::test]
async fn test_log_activity_upserts_daily_stats() {
    let store = common::test_store();
    let service = common::test_service(store.clone());
    common::seed_user(&store, "u-1", "a@example.com").await;

    service
        .log_activity("u-1", "I did a 30 minute HIIT workout")
        .await
        .unwrap();
    service
        .log_activity("u-1", "meditated for 10 minutes")
        .await
        .unwrap();

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let stats = store
        .get_daily_stats("u-1", &today)
        .await
        .expect("stats upserted");

    assert_eq!(stats.total_activities, 2);
    assert_eq!(stats.counts.workouts, 1);
    assert_eq!(stats.counts.meditation_minutes, 10);
    assert!(stats.body_progress <= 100);
}

#[tokio::test]
async fn test_dashboard_breakdown_counts_by_intent() {
    let store = common::test_store();
    let service = common::test_service(store.clone());
    common::seed_user(&store, "u-1", "a@example.com").await;

    for text in [
        "morning run",
        "gym session",
        "quick workout",
        "meditated quietly",
    ] {
        service.log_activity("u-1", text).await.unwrap();
    }

    let dashboard = service.get_dashboard("u-1").await.unwrap();

    assert_eq!(dashboard.total_activities, 4);
    assert_eq!(dashboard.today_activities, 4);
    assert_eq!(dashboard.activity_breakdown.get("workout"), Some(&3));
    assert_eq!(dashboard.activity_breakdown.get("meditation"), Some(&1));
    assert_eq!(dashboard.recent_activities.len(), 4);
}

#[tokio::test]
async fn test_dashboard_unknown_user() {
    let service = common::test_service(common::test_store());

    let err = service.get_dashboard("ghost").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_sign_in_creates_then_finds_by_email() {
    let service = common::test_service(common::test_store());

    let (created, is_new) = service
        .sign_in("Jamie", "jamie@example.com", None)
        .await
        .unwrap();
    assert!(is_new);

    let (found, still_new) = service
        .sign_in("Jamie", "jamie@example.com", None)
        .await
        .unwrap();
    assert_eq!(found.id, created.id); // no duplicate user
    assert!(still_new); // onboarding not completed yet
}

#[tokio::test]
async fn test_onboarding_sets_goal_and_flips_is_new() {
    let service = common::test_service(common::test_store());

    let (user, _) = service
        .sign_in("Jamie", "jamie@example.com", None)
        .await
        .unwrap();

    let updated = service
        .complete_onboarding(&user.id, Some(31), "Sleep better and move more".to_string())
        .await
        .unwrap();
    assert_eq!(updated.age, Some(31));
    assert!(updated.has_onboarded());

    let (_, is_new) = service
        .sign_in("Jamie", "jamie@example.com", None)
        .await
        .unwrap();
    assert!(!is_new);
}

#[tokio::test]
async fn test_update_profile_preserves_protected_fields() {
    let store = common::test_store();
    let service = common::test_service(store.clone());
    let seeded = common::seed_user(&store, "u-1", "a@example.com").await;

    let updated = service
        .update_profile(
            "u-1",
            UserUpdate {
                name: Some("New Name".to_string()),
                weight: Some(72.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.weight, Some(72.5));
    assert_eq!(updated.id, seeded.id);
    assert_eq!(updated.created_at, seeded.created_at);
}

#[tokio::test]
async fn test_activity_stats_window_and_average() {
    let store = common::test_store();
    let service = common::test_service(store.clone());
    common::seed_user(&store, "u-1", "a@example.com").await;

    service.log_activity("u-1", "morning run").await.unwrap();
    service
        .log_activity("u-1", "ate a salad for lunch")
        .await
        .unwrap();

    let stats = service.get_activity_stats("u-1", 7).await.unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_intent.get("workout"), Some(&1));
    assert_eq!(stats.by_intent.get("food_intake"), Some(&1));
    assert!(stats.average_confidence > 0.0 && stats.average_confidence <= 1.0);
}

#[tokio::test]
async fn test_status_reports_fallback_modes() {
    let service = common::test_service(common::test_store());

    let status = service.status();
    assert_eq!(status.classifier_mode, ClassificationSource::Fallback);
    assert_eq!(status.store.status, "degraded");
}
