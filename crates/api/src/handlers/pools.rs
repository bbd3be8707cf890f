//! Handlers for the lootrun, raid pool and gambit resources.
//!
//! Every handler resolves through the kind's [`PoolResolver`] and returns
//! the snapshot as-is, complete or not. Clients decide what to show for a
//! rotation that is still being published.
//!
//! [`PoolResolver`]: wynnpool_core::pool::PoolResolver

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use wynnpool_core::pool::{PoolKind, PoolSnapshot};
use wynnpool_core::window::{PoolWindow, WeekWindow};

use crate::error::AppResult;
use crate::state::AppState;

/// Response body for a pool snapshot.
///
/// Weekly pools serialize as `{ regions, year, week }`, the daily gambit
/// pool as `{ gambits, year, month, day }`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PoolBody {
    Weekly {
        regions: Vec<serde_json::Value>,
        year: i32,
        week: u32,
    },
    Daily {
        gambits: Vec<serde_json::Value>,
        year: i32,
        month: u32,
        day: u32,
    },
}

impl From<PoolSnapshot> for PoolBody {
    fn from(snapshot: PoolSnapshot) -> Self {
        match snapshot.window {
            PoolWindow::Week(w) => PoolBody::Weekly {
                regions: snapshot.entries,
                year: w.year,
                week: w.week,
            },
            PoolWindow::Day(d) => PoolBody::Daily {
                gambits: snapshot.entries,
                year: d.year,
                month: d.month,
                day: d.day,
            },
        }
    }
}

/// GET /lootrun
pub async fn current_lootrun(State(state): State<AppState>) -> AppResult<Json<PoolBody>> {
    current(&state, PoolKind::Lootrun).await
}

/// GET /lootrun/{year}/{week}
pub async fn lootrun_by_week(
    State(state): State<AppState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> AppResult<Json<PoolBody>> {
    let Path((year, week)) = path?;
    by_week(&state, PoolKind::Lootrun, year, week).await
}

/// GET /raidpool
pub async fn current_raidpool(State(state): State<AppState>) -> AppResult<Json<PoolBody>> {
    current(&state, PoolKind::Raidpool).await
}

/// GET /raidpool/{year}/{week}
pub async fn raidpool_by_week(
    State(state): State<AppState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> AppResult<Json<PoolBody>> {
    let Path((year, week)) = path?;
    by_week(&state, PoolKind::Raidpool, year, week).await
}

/// GET /raidpool/gambits
///
/// Gambits rotate daily at 18:00 UTC; the window is labelled by the
/// calendar day the rotation started on.
pub async fn current_gambits(State(state): State<AppState>) -> AppResult<Json<PoolBody>> {
    current(&state, PoolKind::Gambits).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn current(state: &AppState, kind: PoolKind) -> AppResult<Json<PoolBody>> {
    let resolution = state.pools.get(kind).resolve_current(Utc::now()).await?;
    Ok(Json(resolution.snapshot.into()))
}

async fn by_week(
    state: &AppState,
    kind: PoolKind,
    year: i32,
    week: u32,
) -> AppResult<Json<PoolBody>> {
    let window = PoolWindow::Week(WeekWindow::new(year, week));
    let resolution = state
        .pools
        .get(kind)
        .resolve_window(window, Utc::now())
        .await?;
    Ok(Json(resolution.snapshot.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wynnpool_core::window::DayWindow;

    #[test]
    fn weekly_snapshot_serializes_regions() {
        let snapshot = PoolSnapshot::new(
            PoolWindow::Week(WeekWindow::new(2024, 38)),
            vec![json!({"region": "SE"})],
        );
        let body = serde_json::to_value(PoolBody::from(snapshot)).unwrap();
        assert_eq!(
            body,
            json!({"regions": [{"region": "SE"}], "year": 2024, "week": 38})
        );
    }

    #[test]
    fn daily_snapshot_serializes_gambits() {
        let snapshot = PoolSnapshot::new(PoolWindow::Day(DayWindow::new(2024, 9, 20)), vec![]);
        let body = serde_json::to_value(PoolBody::from(snapshot)).unwrap();
        assert_eq!(
            body,
            json!({"gambits": [], "year": 2024, "month": 9, "day": 20})
        );
    }
}
