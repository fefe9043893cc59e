//! Storage layer: Firestore primary with transparent in-memory fallback.

pub mod fallback;
pub mod firestore;
pub mod memory;

pub use fallback::{Store, StoreHealth};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ACTIVITY_LOGS: &str = "activity_logs";
    /// Daily aggregates (keyed by `{user_id}_{date}`)
    pub const DAILY_STATS: &str = "daily_stats";
}

/// Document ID for a daily stats row.
pub fn daily_stats_key(user_id: &str, date: &str) -> String {
    format!("{}_{}", user_id, date)
}
