//! Repository for the `raidpool_gambits` table.

use sqlx::PgPool;

use crate::models::pool::{GambitRow, UpsertGambits};

/// Column list for raidpool_gambits queries.
const COLUMNS: &str = "id, year, month, day, gambits, created_at, updated_at";

/// Provides data access for daily raid gambits.
pub struct GambitRepo;

impl GambitRepo {
    /// Find the gambits stored under a day id (`"{year}-{month}-{day}"`).
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<GambitRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM raidpool_gambits WHERE id = $1");
        sqlx::query_as::<_, GambitRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the gambits for a day id.
    pub async fn upsert(pool: &PgPool, input: &UpsertGambits) -> Result<GambitRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO raidpool_gambits (id, year, month, day, gambits)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                year = EXCLUDED.year,
                month = EXCLUDED.month,
                day = EXCLUDED.day,
                gambits = EXCLUDED.gambits,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GambitRow>(&query)
            .bind(&input.id)
            .bind(input.year)
            .bind(input.month)
            .bind(input.day)
            .bind(&input.gambits)
            .fetch_one(pool)
            .await
    }
}
