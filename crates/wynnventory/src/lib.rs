//! Client for the wynnventory.com pool API, the authoritative source of
//! lootrun pools, raid pools, and daily raid gambits.

pub mod api;
pub mod config;
pub mod fetcher;

pub use api::{PoolResponse, WynnventoryApi, WynnventoryError};
pub use config::WynnventoryConfig;
