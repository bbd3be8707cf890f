//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod gambit_repo;
pub mod weekly_pool_repo;

pub use gambit_repo::GambitRepo;
pub use weekly_pool_repo::{WeeklyPoolRepo, WeeklyPoolTable};
