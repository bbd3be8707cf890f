//! Pool rotation models: weekly pools and daily gambits.

use sqlx::FromRow;
use wynnpool_core::types::Timestamp;

/// A row from `lootpools` or `raidpools`.
#[derive(Debug, Clone, FromRow)]
pub struct WeeklyPoolRow {
    pub id: String,
    pub year: i32,
    pub week: i32,
    pub regions: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a weekly pool by window id.
#[derive(Debug)]
pub struct UpsertWeeklyPool {
    pub id: String,
    pub year: i32,
    pub week: i32,
    pub regions: serde_json::Value,
}

/// A row from `raidpool_gambits`.
#[derive(Debug, Clone, FromRow)]
pub struct GambitRow {
    pub id: String,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub gambits: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a day's gambits by window id.
#[derive(Debug)]
pub struct UpsertGambits {
    pub id: String,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub gambits: serde_json::Value,
}
