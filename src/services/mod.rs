// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod classifier;
pub mod wellness;

pub use classifier::{fallback_classification, Classification, ClassifierService, GeminiClient};
pub use wellness::{
    ActivityStats, Dashboard, ServiceStatus, VoiceLogResult, WellnessService,
};
