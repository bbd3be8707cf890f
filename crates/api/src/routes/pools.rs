//! Route definitions for the pool resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::pools;
use crate::state::AppState;

/// Pool routes, mounted at the root.
///
/// ```text
/// GET /lootrun                    -> current_lootrun
/// GET /lootrun/{year}/{week}      -> lootrun_by_week
/// GET /raidpool                   -> current_raidpool
/// GET /raidpool/gambits           -> current_gambits
/// GET /raidpool/{year}/{week}     -> raidpool_by_week
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lootrun", get(pools::current_lootrun))
        .route("/lootrun/{year}/{week}", get(pools::lootrun_by_week))
        .route("/raidpool", get(pools::current_raidpool))
        .route("/raidpool/gambits", get(pools::current_gambits))
        .route("/raidpool/{year}/{week}", get(pools::raidpool_by_week))
}
