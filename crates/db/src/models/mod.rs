//! Row structs and upsert DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - An upsert DTO keyed by window id

pub mod pool;
