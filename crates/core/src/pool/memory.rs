//! In-process [`PoolStore`], used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::pool::{PoolKind, PoolSnapshot, PoolStore};
use crate::window::WindowId;

#[derive(Debug, Default)]
pub struct MemoryPoolStore {
    rows: RwLock<HashMap<(PoolKind, WindowId), PoolSnapshot>>,
}

impl MemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PoolStore for MemoryPoolStore {
    async fn find_by_window_id(
        &self,
        kind: PoolKind,
        window_id: &WindowId,
    ) -> Result<Option<PoolSnapshot>, CoreError> {
        Ok(self
            .rows
            .read()
            .await
            .get(&(kind, window_id.clone()))
            .cloned())
    }

    async fn upsert_by_window_id(
        &self,
        kind: PoolKind,
        window_id: &WindowId,
        snapshot: &PoolSnapshot,
    ) -> Result<(), CoreError> {
        self.rows
            .write()
            .await
            .insert((kind, window_id.clone()), snapshot.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
