// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Evolve: wellness activity tracking backend
//!
//! This crate provides the backend API for logging free-text wellness
//! activities, classifying them into intent categories, and serving
//! progress dashboards.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use services::WellnessService;
use store::Store;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub wellness: WellnessService,
}
