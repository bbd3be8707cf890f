use std::sync::Arc;

use wynnpool_core::pool::{PoolFetcher, PoolResolvers, PoolStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// One resolver per pool kind; each owns its cache.
    pub pools: Arc<PoolResolvers>,
    /// The store the resolvers persist to, kept for health probes.
    pub store: Arc<dyn PoolStore>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn PoolStore>,
        fetcher: Arc<dyn PoolFetcher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pools: Arc::new(PoolResolvers::new(Arc::clone(&store), fetcher)),
            store,
        }
    }
}
