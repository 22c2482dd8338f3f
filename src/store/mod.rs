//! Movie persistence: the `MovieStore` seam and its PostgreSQL and in-memory implementations.

mod memory;
mod postgres;

pub use memory::MemMovieStore;
pub use postgres::{connect, PgMovieStore};

use crate::error::AppError;
use crate::model::{ListFilters, Metadata, Movie};
use async_trait::async_trait;
use serde::Serialize;

/// Connection pool counters for diagnostics.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
    pub max_connections: u32,
}

/// CRUD over the `movies` table. Updates are optimistic: they only apply when the
/// caller's `version` still matches the stored row.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Validate and persist; fills `id`, `created_at` and `version` (1) on success.
    async fn insert(&self, movie: &mut Movie) -> Result<(), AppError>;

    /// `NotFound` for ids below 1 or without a row.
    async fn get(&self, id: i64) -> Result<Movie, AppError>;

    /// Validate and write `movie` if the stored version equals `movie.version`; bumps
    /// `movie.version` on success. `EditConflict` when the version is stale or the row is gone.
    async fn update(&self, movie: &mut Movie) -> Result<(), AppError>;

    /// Hard delete. `NotFound` when nothing was removed.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    async fn list(&self, filters: &ListFilters) -> Result<(Vec<Movie>, Metadata), AppError>;

    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}
