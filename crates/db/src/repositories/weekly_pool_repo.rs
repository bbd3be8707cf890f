//! Repository for the weekly pool tables (`lootpools`, `raidpools`).

use sqlx::PgPool;

use crate::models::pool::{UpsertWeeklyPool, WeeklyPoolRow};

/// Column list shared by both weekly pool tables.
const COLUMNS: &str = "id, year, week, regions, created_at, updated_at";

/// Which weekly pool table to address. Both share one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyPoolTable {
    Lootpools,
    Raidpools,
}

impl WeeklyPoolTable {
    pub fn name(self) -> &'static str {
        match self {
            WeeklyPoolTable::Lootpools => "lootpools",
            WeeklyPoolTable::Raidpools => "raidpools",
        }
    }
}

/// Provides data access for weekly pool rotations.
pub struct WeeklyPoolRepo;

impl WeeklyPoolRepo {
    /// Find the pool stored under a window id (`"{year}-{week}"`).
    pub async fn find_by_id(
        pool: &PgPool,
        table: WeeklyPoolTable,
        id: &str,
    ) -> Result<Option<WeeklyPoolRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", table.name());
        sqlx::query_as::<_, WeeklyPoolRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the pool for a window id.
    pub async fn upsert(
        pool: &PgPool,
        table: WeeklyPoolTable,
        input: &UpsertWeeklyPool,
    ) -> Result<WeeklyPoolRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (id, year, week, regions)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                year = EXCLUDED.year,
                week = EXCLUDED.week,
                regions = EXCLUDED.regions,
                updated_at = NOW()
             RETURNING {COLUMNS}",
            table = table.name(),
        );
        sqlx::query_as::<_, WeeklyPoolRow>(&query)
            .bind(&input.id)
            .bind(input.year)
            .bind(input.week)
            .bind(&input.regions)
            .fetch_one(pool)
            .await
    }
}
