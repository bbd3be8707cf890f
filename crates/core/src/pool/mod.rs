//! Rotating pool domain: kinds, snapshots, and the collaborator seams the
//! resolver is built on.
//!
//! A pool kind fixes three things: how often it rolls over ([`Cadence`]),
//! how many entries a fully published rotation has, and (by name) where it
//! is stored and fetched from. Entries themselves are opaque JSON owned by
//! the upstream provider and passed through unmodified.

pub mod cache;
pub mod memory;
pub mod resolver;

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::CoreError;
use crate::window::{Cadence, DailyReset, DayWindow, PoolWindow, ResetAnchor, WeekWindow, WindowId};

pub use cache::{CacheEntry, PoolCache};
pub use memory::MemoryPoolStore;
pub use resolver::{PoolResolver, PoolResolvers, Resolution, ResolutionSource};

/// Regions in a fully published lootrun rotation.
pub const LOOTRUN_REGION_COUNT: usize = 5;

/// Regions in a fully published raid pool rotation.
pub const RAIDPOOL_REGION_COUNT: usize = 4;

/// Gambits in a fully published daily rotation.
pub const GAMBIT_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Pool kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Lootrun,
    Raidpool,
    Gambits,
}

impl PoolKind {
    pub const ALL: [PoolKind; 3] = [PoolKind::Lootrun, PoolKind::Raidpool, PoolKind::Gambits];

    pub fn as_str(self) -> &'static str {
        match self {
            PoolKind::Lootrun => "lootrun",
            PoolKind::Raidpool => "raidpool",
            PoolKind::Gambits => "gambits",
        }
    }

    pub fn cadence(self) -> Cadence {
        match self {
            PoolKind::Lootrun => Cadence::Weekly(ResetAnchor::LOOTRUN),
            PoolKind::Raidpool => Cadence::Weekly(ResetAnchor::RAIDPOOL),
            PoolKind::Gambits => Cadence::Daily(DailyReset::GAMBITS),
        }
    }

    /// Entry count of a complete snapshot of this kind.
    pub fn expected_entries(self) -> usize {
        match self {
            PoolKind::Lootrun => LOOTRUN_REGION_COUNT,
            PoolKind::Raidpool => RAIDPOOL_REGION_COUNT,
            PoolKind::Gambits => GAMBIT_COUNT,
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The payload of one window: regions for weekly pools, gambits for the
/// daily pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    pub window: PoolWindow,
    pub entries: Vec<serde_json::Value>,
}

impl PoolSnapshot {
    pub fn new(window: PoolWindow, entries: Vec<serde_json::Value>) -> Self {
        Self { window, entries }
    }

    /// A snapshot is complete only at exactly the expected cardinality.
    /// Anything else is a rotation still being published.
    pub fn is_complete(&self, expected: usize) -> bool {
        self.entries.len() == expected
    }
}

/// Window fields the upstream echoed back alongside its entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ReportedWindow {
    pub year: Option<i32>,
    pub week: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl ReportedWindow {
    /// Overlay the reported fields on `local`, keeping local values for
    /// anything the upstream left out.
    pub fn apply_to(&self, local: PoolWindow) -> PoolWindow {
        match local {
            PoolWindow::Week(w) => PoolWindow::Week(WeekWindow {
                year: self.year.unwrap_or(w.year),
                week: self.week.unwrap_or(w.week),
            }),
            PoolWindow::Day(d) => PoolWindow::Day(DayWindow {
                year: self.year.unwrap_or(d.year),
                month: self.month.unwrap_or(d.month),
                day: self.day.unwrap_or(d.day),
            }),
        }
    }
}

/// Result of one upstream call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPool {
    pub entries: Vec<serde_json::Value>,
    pub reported: ReportedWindow,
}

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Durable second-level cache keyed by window id, one collection per kind.
///
/// Implementations must give read-your-writes consistency: a successful
/// upsert is visible to the next find in the same process.
#[async_trait]
pub trait PoolStore: Send + Sync {
    async fn find_by_window_id(
        &self,
        kind: PoolKind,
        window_id: &WindowId,
    ) -> Result<Option<PoolSnapshot>, CoreError>;

    async fn upsert_by_window_id(
        &self,
        kind: PoolKind,
        window_id: &WindowId,
        snapshot: &PoolSnapshot,
    ) -> Result<(), CoreError>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> Result<(), CoreError>;
}

/// Authoritative upstream source of pool rotations.
#[async_trait]
pub trait PoolFetcher: Send + Sync {
    /// Fail fast when the upstream credential is missing, before any I/O.
    fn ensure_configured(&self) -> Result<(), CoreError>;

    async fn fetch_current(&self, kind: PoolKind) -> Result<FetchedPool, CoreError>;

    async fn fetch_window(
        &self,
        kind: PoolKind,
        window: &PoolWindow,
    ) -> Result<FetchedPool, CoreError>;
}
