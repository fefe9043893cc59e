// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Evolve Wellness API Server
//!
//! Accepts free-text wellness activity logs, classifies them into intent
//! categories (Gemini with keyword fallback), and serves progress
//! dashboards. Runs against Firestore when configured, with a transparent
//! in-memory fallback otherwise.

use evolve_wellness::{
    config::Config,
    routes::create_router,
    services::{ClassifierService, WellnessService},
    store::{FirestoreStore, MemoryStore, Store},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Evolve Wellness API");

    // Connect the primary store; a missing project or failed connection
    // leaves the service running on the in-memory fallback.
    let primary = match &config.gcp_project_id {
        Some(project_id) => match FirestoreStore::connect(project_id).await {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "Firestore unavailable, running on memory store");
                FirestoreStore::offline()
            }
        },
        None => {
            tracing::warn!("GCP_PROJECT_ID not configured, running on memory store");
            FirestoreStore::offline()
        }
    };
    let store = Store::new(primary, MemoryStore::default());
    tracing::info!("Store initialized");

    // Initialize the intent classifier (fallback-only without a credential)
    let classifier = ClassifierService::new(
        config.gemini_api_key.clone(),
        config.classifier_timeout_secs,
        config.max_input_chars,
    );
    tracing::info!(mode = ?classifier.mode(), "Classifier initialized");

    let wellness = WellnessService::new(store.clone(), classifier);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        wellness,
    });

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("evolve_wellness=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
