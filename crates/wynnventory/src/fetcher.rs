//! [`PoolFetcher`] implementation backed by [`WynnventoryApi`].

use async_trait::async_trait;
use wynnpool_core::error::CoreError;
use wynnpool_core::pool::{FetchedPool, PoolFetcher, PoolKind};
use wynnpool_core::window::PoolWindow;

use crate::api::{PoolResponse, WynnventoryApi, WynnventoryError};

impl From<PoolResponse> for FetchedPool {
    fn from(response: PoolResponse) -> Self {
        FetchedPool {
            entries: response.regions.unwrap_or_default(),
            reported: response.window,
        }
    }
}

fn upstream_error(kind: PoolKind, err: WynnventoryError) -> CoreError {
    tracing::warn!(kind = %kind, error = %err, "wynnventory request failed");
    err.into()
}

#[async_trait]
impl PoolFetcher for WynnventoryApi {
    fn ensure_configured(&self) -> Result<(), CoreError> {
        if self.has_api_key() {
            Ok(())
        } else {
            Err(WynnventoryError::MissingApiKey.into())
        }
    }

    async fn fetch_current(&self, kind: PoolKind) -> Result<FetchedPool, CoreError> {
        self.get_current(kind)
            .await
            .map(FetchedPool::from)
            .map_err(|err| upstream_error(kind, err))
    }

    async fn fetch_window(
        &self,
        kind: PoolKind,
        window: &PoolWindow,
    ) -> Result<FetchedPool, CoreError> {
        self.get_window(kind, window)
            .await
            .map(FetchedPool::from)
            .map_err(|err| upstream_error(kind, err))
    }
}
