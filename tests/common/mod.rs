// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use evolve_wellness::config::Config;
use evolve_wellness::models::User;
use evolve_wellness::routes::create_router;
use evolve_wellness::services::{ClassifierService, WellnessService};
use evolve_wellness::store::{MemoryStore, Store};
use evolve_wellness::AppState;
use std::sync::Arc;

/// An offline store: no Firestore connection, empty memory backend.
#[allow(dead_code)]
pub fn test_store() -> Store {
    Store::memory_only(MemoryStore::empty())
}

/// A wellness service over the given store, classifier in fallback mode.
#[allow(dead_code)]
pub fn test_service(store: Store) -> WellnessService {
    let config = Config::test_default();
    let classifier = ClassifierService::new(
        None,
        config.classifier_timeout_secs,
        config.max_input_chars,
    );
    WellnessService::new(store, classifier)
}

/// Insert a user directly into the store and return it.
#[allow(dead_code)]
pub async fn seed_user(store: &Store, id: &str, email: &str) -> User {
    let user = User {
        id: id.to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        avatar: None,
        age: None,
        weight: None,
        height: None,
        primary_wellness_goal: None,
        goals: None,
        supplements: vec![],
        current_streak: 0,
        longest_streak: 0,
        created_at: "2024-03-01T00:00:00Z".to_string(),
    };
    store.create_user(&user).await;
    user
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let store = test_store();
    let wellness = test_service(store.clone());

    let state = Arc::new(AppState {
        config,
        store,
        wellness,
    });

    (create_router(state.clone()), state)
}
