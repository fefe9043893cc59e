// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fallback-aware store facade.
//!
//! Every operation first tries the Firestore backend and transparently
//! reroutes to the in-memory backend when Firestore is unconfigured or the
//! call fails. Callers never see the substitution; it is logged and
//! reflected in [`Store::health`].
//!
//! Read-after-write consistency holds within a single backend only. If the
//! primary recovers after operations have fallen back, data written to
//! memory in the interim is not reconciled.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::error::AppError;
use crate::models::{ActivityLog, DailyStats, User};
use crate::store::{FirestoreStore, MemoryStore};

/// Fallback-aware data store.
///
/// The memory backend's operations are plain map accesses and cannot fail,
/// so every operation on this facade completes.
#[derive(Clone)]
pub struct Store {
    primary: FirestoreStore,
    memory: MemoryStore,
    /// Set once any call has fallen back due to a primary failure.
    degraded: Arc<AtomicBool>,
}

/// Store health for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    /// "healthy" or "degraded"
    pub status: &'static str,
    pub details: String,
}

impl Store {
    pub fn new(primary: FirestoreStore, memory: MemoryStore) -> Self {
        Self {
            primary,
            memory,
            degraded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A memory-only store (no Firestore configured).
    pub fn memory_only(memory: MemoryStore) -> Self {
        Self::new(FirestoreStore::offline(), memory)
    }

    /// Run `primary`, substituting `fallback` on unavailability or error.
    ///
    /// The single implementation of the degradation policy: callers supply
    /// the primary future and the equivalent memory operation, and always
    /// get a value back.
    async fn with_fallback<T>(
        &self,
        op: &'static str,
        primary: impl Future<Output = Result<T, AppError>>,
        fallback: impl FnOnce(&MemoryStore) -> T,
    ) -> T {
        if !self.primary.is_connected() {
            tracing::debug!(op, "Database not configured, using memory store");
            return fallback(&self.memory);
        }

        match primary.await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(op, error = %e, "Database error, falling back to memory store");
                self.degraded.store(true, Ordering::Relaxed);
                fallback(&self.memory)
            }
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Option<User> {
        self.with_fallback("get_user", self.primary.get_user(user_id), |m| {
            m.get_user(user_id)
        })
        .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.with_fallback(
            "get_user_by_email",
            self.primary.get_user_by_email(email),
            |m| m.get_user_by_email(email),
        )
        .await
    }

    pub async fn create_user(&self, user: &User) {
        self.with_fallback(
            "create_user",
            async {
                self.primary.upsert_user(user).await?;
                Ok::<_, AppError>(())
            },
            |m| m.upsert_user(user),
        )
        .await
    }

    pub async fn update_user(&self, user: &User) {
        self.with_fallback(
            "update_user",
            async {
                self.primary.upsert_user(user).await?;
                Ok::<_, AppError>(())
            },
            |m| m.upsert_user(user),
        )
        .await
    }

    // ─── Activity Log Operations ─────────────────────────────────

    pub async fn create_activity_log(&self, log: &ActivityLog) {
        self.with_fallback(
            "create_activity_log",
            async {
                self.primary.create_activity_log(log).await?;
                Ok::<_, AppError>(())
            },
            |m| m.create_activity_log(log),
        )
        .await
    }

    pub async fn list_activity_logs(&self, user_id: &str, limit: u32) -> Vec<ActivityLog> {
        self.with_fallback(
            "list_activity_logs",
            self.primary.list_activity_logs(user_id, limit),
            |m| m.list_activity_logs(user_id, limit),
        )
        .await
    }

    // ─── Daily Stats Operations ──────────────────────────────────

    pub async fn get_daily_stats(&self, user_id: &str, date: &str) -> Option<DailyStats> {
        self.with_fallback(
            "get_daily_stats",
            self.primary.get_daily_stats(user_id, date),
            |m| m.get_daily_stats(user_id, date),
        )
        .await
    }

    pub async fn upsert_daily_stats(&self, stats: &DailyStats) {
        self.with_fallback(
            "upsert_daily_stats",
            async {
                self.primary.upsert_daily_stats(stats).await?;
                Ok::<_, AppError>(())
            },
            |m| m.upsert_daily_stats(stats),
        )
        .await
    }

    // ─── Health ──────────────────────────────────────────────────

    /// Report which backend is serving and whether any call has degraded.
    pub fn health(&self) -> StoreHealth {
        if !self.primary.is_connected() {
            return StoreHealth {
                status: "degraded",
                details: format!(
                    "Database not configured; memory storage active with {} users and {} activity logs",
                    self.memory.user_count(),
                    self.memory.activity_log_count()
                ),
            };
        }

        if self.degraded.load(Ordering::Relaxed) {
            return StoreHealth {
                status: "degraded",
                details: "One or more operations fell back to memory storage".to_string(),
            };
        }

        StoreHealth {
            status: "healthy",
            details: "Database connection working".to_string(),
        }
    }
}
