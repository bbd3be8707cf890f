//! Domain logic for the Wynncraft pool rotation service.
//!
//! This crate has zero internal deps so the database, upstream client, and
//! API crates can all build on it.

pub mod error;
pub mod pool;
pub mod types;
pub mod window;
