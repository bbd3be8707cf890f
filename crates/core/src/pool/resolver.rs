//! Cache → store → upstream lookup chain for one pool kind.
//!
//! ```text
//! START ─▶ CACHE_HIT                                  (terminal)
//!       └▶ CACHE_MISS ─▶ STORE_HIT                    (terminal, cached)
//!                     └▶ STORE_MISS ─▶ REMOTE_COMPLETE   (terminal, persisted + cached)
//!                                   ├▶ REMOTE_INCOMPLETE (terminal, neither)
//!                                   └▶ REMOTE_FAILED     (error surfaced)
//! ```
//!
//! A stored or cached snapshot below the kind's expected cardinality counts
//! as a miss. After a cache miss, requests for the same window id join one
//! in-flight lookup and all receive its outcome, so a cold burst produces
//! one store read and at most one upstream call. That holds whether the
//! upstream answer is incomplete or reports a different window.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::error::CoreError;
use crate::pool::cache::PoolCache;
use crate::pool::{PoolFetcher, PoolKind, PoolSnapshot, PoolStore};
use crate::types::Timestamp;
use crate::window::{PoolWindow, WindowId};

/// Which terminal state produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    CacheHit,
    StoreHit,
    /// Fetched upstream, complete, persisted and cached.
    RemoteComplete,
    /// Fetched upstream but still being published; returned as-is.
    RemoteIncomplete,
}

impl ResolutionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionSource::CacheHit => "cache",
            ResolutionSource::StoreHit => "store",
            ResolutionSource::RemoteComplete => "remote",
            ResolutionSource::RemoteIncomplete => "remote_incomplete",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub snapshot: PoolSnapshot,
    pub source: ResolutionSource,
}

/// Outcome of one lookup, shared by every request that joined it.
type Flight = Arc<OnceCell<Result<Resolution, CoreError>>>;

#[derive(Debug, Clone, Copy)]
enum Lookup {
    Current,
    Historical,
}

/// Resolves snapshots of a single [`PoolKind`].
pub struct PoolResolver {
    kind: PoolKind,
    cache: PoolCache,
    store: Arc<dyn PoolStore>,
    fetcher: Arc<dyn PoolFetcher>,
    in_flight: Mutex<HashMap<WindowId, Flight>>,
}

impl PoolResolver {
    pub fn new(kind: PoolKind, store: Arc<dyn PoolStore>, fetcher: Arc<dyn PoolFetcher>) -> Self {
        Self {
            kind,
            cache: PoolCache::new(),
            store,
            fetcher,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn cache(&self) -> &PoolCache {
        &self.cache
    }

    /// Resolve the window containing `now`.
    pub async fn resolve_current(&self, now: Timestamp) -> Result<Resolution, CoreError> {
        self.fetcher.ensure_configured()?;
        let window = self.kind.cadence().current(now);
        self.resolve(window, Lookup::Current, now).await
    }

    /// Resolve a caller-chosen window through the same chain.
    pub async fn resolve_window(
        &self,
        window: PoolWindow,
        now: Timestamp,
    ) -> Result<Resolution, CoreError> {
        self.fetcher.ensure_configured()?;
        self.check_window(&window)?;
        self.resolve(window, Lookup::Historical, now).await
    }

    async fn resolve(
        &self,
        window: PoolWindow,
        lookup: Lookup,
        now: Timestamp,
    ) -> Result<Resolution, CoreError> {
        let window_id = window.id();

        if let Some(hit) = self.cached(&window_id, now).await {
            return Ok(hit);
        }

        // If the request driving the flight is dropped, the next waiter
        // takes over the lookup.
        let flight = self.join_flight(&window_id).await;
        let result = flight
            .get_or_init(|| self.resolve_uncached(window, &window_id, lookup, now))
            .await
            .clone();
        self.land_flight(&window_id, &flight).await;

        result
    }

    async fn resolve_uncached(
        &self,
        window: PoolWindow,
        window_id: &WindowId,
        lookup: Lookup,
        now: Timestamp,
    ) -> Result<Resolution, CoreError> {
        let expected = self.kind.expected_entries();

        // A flight that landed between our cache probe and joining may
        // have filled the cache.
        if let Some(hit) = self.cached(window_id, now).await {
            return Ok(hit);
        }

        match self.store.find_by_window_id(self.kind, window_id).await? {
            Some(stored) if stored.is_complete(expected) => {
                let expires_at = self.expiry_of(&window)?;
                self.cache
                    .put(window_id.clone(), stored.clone(), expires_at)
                    .await;
                tracing::debug!(
                    kind = %self.kind,
                    window_id = %window_id,
                    %expires_at,
                    "Pool snapshot served from store"
                );
                return Ok(Resolution {
                    snapshot: stored,
                    source: ResolutionSource::StoreHit,
                });
            }
            Some(stored) => {
                tracing::debug!(
                    kind = %self.kind,
                    window_id = %window_id,
                    entries = stored.entries.len(),
                    expected,
                    "Stored pool snapshot incomplete, fetching upstream"
                );
            }
            None => {}
        }

        let fetched = match lookup {
            Lookup::Current => self.fetcher.fetch_current(self.kind).await?,
            Lookup::Historical => self.fetcher.fetch_window(self.kind, &window).await?,
        };

        let effective = self.effective_window(window, fetched.reported.apply_to(window));
        let snapshot = PoolSnapshot::new(effective, fetched.entries);

        if !snapshot.is_complete(expected) {
            tracing::info!(
                kind = %self.kind,
                window_id = %effective.id(),
                entries = snapshot.entries.len(),
                expected,
                "Upstream pool rotation incomplete, not persisting"
            );
            return Ok(Resolution {
                snapshot,
                source: ResolutionSource::RemoteIncomplete,
            });
        }

        let effective_id = effective.id();
        self.store
            .upsert_by_window_id(self.kind, &effective_id, &snapshot)
            .await?;

        let expires_at = self.expiry_of(&effective)?;
        self.cache
            .put(effective_id.clone(), snapshot.clone(), expires_at)
            .await;

        tracing::info!(
            kind = %self.kind,
            window_id = %effective_id,
            requested = %window_id,
            %expires_at,
            "Pool snapshot fetched upstream and persisted"
        );

        Ok(Resolution {
            snapshot,
            source: ResolutionSource::RemoteComplete,
        })
    }

    async fn cached(&self, window_id: &WindowId, now: Timestamp) -> Option<Resolution> {
        let entry = self.cache.get(window_id).await?;
        if !entry.is_usable(now, self.kind.expected_entries()) {
            return None;
        }

        tracing::trace!(kind = %self.kind, window_id = %window_id, "Pool cache hit");
        Some(Resolution {
            snapshot: entry.snapshot,
            source: ResolutionSource::CacheHit,
        })
    }

    /// The upstream decides window boundaries when it reports them, unless
    /// what it reports is not a real window of this kind.
    fn effective_window(&self, requested: PoolWindow, reported: PoolWindow) -> PoolWindow {
        if reported == requested {
            return requested;
        }

        if self.check_window(&reported).is_ok() {
            return reported;
        }

        tracing::warn!(
            kind = %self.kind,
            requested = %requested,
            reported = %reported,
            "Upstream reported an invalid window, keeping the requested one"
        );
        requested
    }

    fn check_window(&self, window: &PoolWindow) -> Result<(), CoreError> {
        if !self.kind.cadence().accepts(window) {
            return Err(CoreError::Validation(format!(
                "window {window} does not match the {} rotation",
                self.kind
            )));
        }
        window.validate()
    }

    fn expiry_of(&self, window: &PoolWindow) -> Result<Timestamp, CoreError> {
        self.kind.cadence().window_end(window).ok_or_else(|| {
            CoreError::Internal(format!(
                "no reset boundary for {} window {window}",
                self.kind
            ))
        })
    }

    async fn join_flight(&self, window_id: &WindowId) -> Flight {
        let mut flights = self.in_flight.lock().await;
        Arc::clone(flights.entry(window_id.clone()).or_default())
    }

    /// Retire a finished flight so the next cache miss starts a fresh lookup.
    /// Leaves the map alone if a newer flight already took the slot.
    async fn land_flight(&self, window_id: &WindowId, flight: &Flight) {
        let mut flights = self.in_flight.lock().await;
        if flights
            .get(window_id)
            .is_some_and(|current| Arc::ptr_eq(current, flight))
        {
            flights.remove(window_id);
        }
    }
}

/// One resolver per pool kind, all sharing a store and an upstream client.
pub struct PoolResolvers {
    pub lootrun: PoolResolver,
    pub raidpool: PoolResolver,
    pub gambits: PoolResolver,
}

impl PoolResolvers {
    pub fn new(store: Arc<dyn PoolStore>, fetcher: Arc<dyn PoolFetcher>) -> Self {
        Self {
            lootrun: PoolResolver::new(PoolKind::Lootrun, Arc::clone(&store), Arc::clone(&fetcher)),
            raidpool: PoolResolver::new(PoolKind::Raidpool, Arc::clone(&store), Arc::clone(&fetcher)),
            gambits: PoolResolver::new(PoolKind::Gambits, store, fetcher),
        }
    }

    pub fn get(&self, kind: PoolKind) -> &PoolResolver {
        match kind {
            PoolKind::Lootrun => &self.lootrun,
            PoolKind::Raidpool => &self.raidpool,
            PoolKind::Gambits => &self.gambits,
        }
    }
}
