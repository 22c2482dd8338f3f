//! In-process `MovieStore` with the same version and filter semantics as the PostgreSQL store.

use crate::error::AppError;
use crate::model::{ListFilters, Metadata, Movie, SortDirection};
use crate::service::validate_movie;
use crate::store::MovieStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Movie>,
}

#[derive(Clone, Default)]
pub struct MemMovieStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Lowercased words, matching PostgreSQL's `simple` text search configuration closely enough for filtering.
fn words(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn is_match(movie: &Movie, filters: &ListFilters) -> bool {
    // A non-empty filter with no words is an empty tsquery in PostgreSQL and matches nothing.
    let title_ok = filters.title.is_empty() || {
        let wanted = words(&filters.title);
        let have = words(&movie.title);
        !wanted.is_empty() && wanted.iter().all(|w| have.contains(w))
    };
    let genres_ok = filters.genres.iter().all(|g| movie.genres.contains(g));
    title_ok && genres_ok
}

#[async_trait]
impl MovieStore for MemMovieStore {
    async fn insert(&self, movie: &mut Movie) -> Result<(), AppError> {
        validate_movie(movie)?;
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        movie.id = inner.next_id;
        movie.created_at = chrono::Utc::now();
        movie.version = 1;
        inner.rows.insert(movie.id, movie.clone());
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Movie, AppError> {
        if id < 1 {
            return Err(AppError::NotFound);
        }
        let inner = self.inner.read().await;
        inner.rows.get(&id).cloned().ok_or(AppError::NotFound)
    }

    async fn update(&self, movie: &mut Movie) -> Result<(), AppError> {
        validate_movie(movie)?;
        let mut inner = self.inner.write().await;
        let stored = inner
            .rows
            .get_mut(&movie.id)
            .filter(|stored| stored.version == movie.version)
            .ok_or(AppError::EditConflict)?;
        stored.title = movie.title.clone();
        stored.year = movie.year;
        stored.runtime = movie.runtime;
        stored.genres = movie.genres.clone();
        stored.version += 1;
        movie.version = stored.version;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.rows.remove(&id).map(|_| ()).ok_or(AppError::NotFound)
    }

    async fn list(&self, filters: &ListFilters) -> Result<(Vec<Movie>, Metadata), AppError> {
        let inner = self.inner.read().await;
        let mut found: Vec<Movie> = inner
            .rows
            .values()
            .filter(|m| is_match(m, filters))
            .cloned()
            .collect();
        let column = filters.sort_column();
        found.sort_by(|a, b| {
            let primary = match column {
                "title" => a.title.cmp(&b.title),
                "year" => a.year.cmp(&b.year),
                "runtime" => a.runtime.cmp(&b.runtime),
                _ => a.id.cmp(&b.id),
            };
            let primary = match filters.sort_direction() {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then(a.id.cmp(&b.id))
        });
        let total = found.len() as u64;
        let page: Vec<Movie> = found
            .into_iter()
            .skip(filters.offset() as usize)
            .take(filters.limit() as usize)
            .collect();
        Ok((page, Metadata::calculate(total, filters.page, filters.page_size)))
    }
}
