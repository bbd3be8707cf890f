//! PostgreSQL-backed [`PoolStore`].
//!
//! Lootrun and raid pools live in one table each; gambits in
//! `raidpool_gambits`. Entries are stored as a JSONB array, untouched.

use async_trait::async_trait;
use wynnpool_core::error::CoreError;
use wynnpool_core::pool::{PoolKind, PoolSnapshot, PoolStore};
use wynnpool_core::window::{DayWindow, PoolWindow, WeekWindow, WindowId};

use crate::models::pool::{GambitRow, UpsertGambits, UpsertWeeklyPool, WeeklyPoolRow};
use crate::repositories::{GambitRepo, WeeklyPoolRepo, WeeklyPoolTable};
use crate::DbPool;

#[derive(Clone)]
pub struct PgPoolStore {
    pool: DbPool,
}

impl PgPoolStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn weekly_table(kind: PoolKind) -> Option<WeeklyPoolTable> {
    match kind {
        PoolKind::Lootrun => Some(WeeklyPoolTable::Lootpools),
        PoolKind::Raidpool => Some(WeeklyPoolTable::Raidpools),
        PoolKind::Gambits => None,
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Pool store query failed");
    CoreError::Storage(err.to_string())
}

fn to_i32(value: u32, field: &str) -> Result<i32, CoreError> {
    i32::try_from(value).map_err(|_| CoreError::Internal(format!("{field} {value} out of range")))
}

fn to_u32(value: i32, field: &str, id: &str) -> Result<u32, CoreError> {
    u32::try_from(value)
        .map_err(|_| CoreError::Storage(format!("row {id} has negative {field} {value}")))
}

/// Stored entries are a JSON array; any other shape reads as empty, which
/// the resolver treats as incomplete.
fn entries_of(value: serde_json::Value) -> Vec<serde_json::Value> {
    match value {
        serde_json::Value::Array(entries) => entries,
        _ => Vec::new(),
    }
}

fn weekly_snapshot(row: WeeklyPoolRow) -> Result<PoolSnapshot, CoreError> {
    let window = WeekWindow::new(row.year, to_u32(row.week, "week", &row.id)?);
    Ok(PoolSnapshot::new(
        PoolWindow::Week(window),
        entries_of(row.regions),
    ))
}

fn gambit_snapshot(row: GambitRow) -> Result<PoolSnapshot, CoreError> {
    let window = DayWindow::new(
        row.year,
        to_u32(row.month, "month", &row.id)?,
        to_u32(row.day, "day", &row.id)?,
    );
    Ok(PoolSnapshot::new(
        PoolWindow::Day(window),
        entries_of(row.gambits),
    ))
}

#[async_trait]
impl PoolStore for PgPoolStore {
    async fn find_by_window_id(
        &self,
        kind: PoolKind,
        window_id: &WindowId,
    ) -> Result<Option<PoolSnapshot>, CoreError> {
        match weekly_table(kind) {
            Some(table) => WeeklyPoolRepo::find_by_id(&self.pool, table, window_id.as_str())
                .await
                .map_err(storage_error)?
                .map(weekly_snapshot)
                .transpose(),
            None => GambitRepo::find_by_id(&self.pool, window_id.as_str())
                .await
                .map_err(storage_error)?
                .map(gambit_snapshot)
                .transpose(),
        }
    }

    async fn upsert_by_window_id(
        &self,
        kind: PoolKind,
        window_id: &WindowId,
        snapshot: &PoolSnapshot,
    ) -> Result<(), CoreError> {
        let entries = serde_json::Value::Array(snapshot.entries.clone());

        match (weekly_table(kind), snapshot.window) {
            (Some(table), PoolWindow::Week(w)) => {
                let input = UpsertWeeklyPool {
                    id: window_id.to_string(),
                    year: w.year,
                    week: to_i32(w.week, "week")?,
                    regions: entries,
                };
                WeeklyPoolRepo::upsert(&self.pool, table, &input)
                    .await
                    .map_err(storage_error)?;
            }
            (None, PoolWindow::Day(d)) => {
                let input = UpsertGambits {
                    id: window_id.to_string(),
                    year: d.year,
                    month: to_i32(d.month, "month")?,
                    day: to_i32(d.day, "day")?,
                    gambits: entries,
                };
                GambitRepo::upsert(&self.pool, &input)
                    .await
                    .map_err(storage_error)?;
            }
            (_, window) => {
                return Err(CoreError::Internal(format!(
                    "cannot store {kind} snapshot for window {window}"
                )));
            }
        }

        tracing::debug!(kind = %kind, window_id = %window_id, "Pool snapshot upserted");
        Ok(())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(storage_error)
    }
}
