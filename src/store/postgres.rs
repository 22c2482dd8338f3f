//! `MovieStore` over a PostgreSQL pool. Every operation runs under the configured query deadline.

use crate::config::DatabaseConfig;
use crate::error::{AppError, StartupError};
use crate::model::{ListFilters, Metadata, Movie};
use crate::service::validate_movie;
use crate::store::{MovieStore, PoolStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the pool and confirm a connection within five seconds.
pub async fn connect(cfg: &DatabaseConfig) -> Result<PgPool, StartupError> {
    let options = PgPoolOptions::new()
        .max_connections(cfg.max_open_conns)
        .min_connections(cfg.min_idle_conns)
        .idle_timeout(cfg.max_idle_time)
        .max_lifetime(cfg.max_lifetime)
        .acquire_timeout(CONNECT_TIMEOUT);
    let pool = tokio::time::timeout(CONNECT_TIMEOUT, options.connect(&cfg.dsn))
        .await
        .map_err(|_| StartupError::ConnectTimeout(CONNECT_TIMEOUT))??;
    tokio::time::timeout(CONNECT_TIMEOUT, sqlx::query("SELECT 1").execute(&pool))
        .await
        .map_err(|_| StartupError::ConnectTimeout(CONNECT_TIMEOUT))??;
    Ok(pool)
}

#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgMovieStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        PgMovieStore {
            pool,
            query_timeout,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(res) => res.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout),
        }
    }
}

const INSERT_SQL: &str = r#"
    INSERT INTO movies (title, year, runtime, genres)
    VALUES ($1, $2, $3, $4)
    RETURNING id, created_at, version"#;

const SELECT_BY_ID_SQL: &str = r#"
    SELECT id, created_at, title, year, runtime, genres, version
    FROM movies
    WHERE id = $1"#;

const UPDATE_SQL: &str = r#"
    UPDATE movies
    SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1
    WHERE id = $5 AND version = $6
    RETURNING version"#;

const DELETE_SQL: &str = "DELETE FROM movies WHERE id = $1";

/// ORDER BY is spliced from the sort safelist; values are bound.
fn list_sql(filters: &ListFilters) -> String {
    format!(
        r#"
    SELECT count(*) OVER() AS total_records, id, created_at, title, year, runtime, genres, version
    FROM movies
    WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '')
    AND (genres @> $2 OR $2 = '{{}}')
    ORDER BY {} {}, id ASC
    LIMIT $3 OFFSET $4"#,
        filters.sort_column(),
        filters.sort_direction().as_sql()
    )
}

#[derive(sqlx::FromRow)]
struct ListRow {
    total_records: i64,
    #[sqlx(flatten)]
    movie: Movie,
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn insert(&self, movie: &mut Movie) -> Result<(), AppError> {
        validate_movie(movie)?;
        tracing::debug!(sql = %INSERT_SQL, title = %movie.title, "query");
        let (id, created_at, version): (i64, DateTime<Utc>, i32) = self
            .bounded(
                sqlx::query_as(INSERT_SQL)
                    .bind(&movie.title)
                    .bind(movie.year)
                    .bind(movie.runtime)
                    .bind(&movie.genres)
                    .fetch_one(&self.pool),
            )
            .await?;
        movie.id = id;
        movie.created_at = created_at;
        movie.version = version;
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Movie, AppError> {
        if id < 1 {
            return Err(AppError::NotFound);
        }
        tracing::debug!(sql = %SELECT_BY_ID_SQL, id, "query");
        self.bounded(
            sqlx::query_as::<_, Movie>(SELECT_BY_ID_SQL)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn update(&self, movie: &mut Movie) -> Result<(), AppError> {
        validate_movie(movie)?;
        tracing::debug!(sql = %UPDATE_SQL, id = movie.id, version = movie.version, "query");
        let row: Option<(i32,)> = self
            .bounded(
                sqlx::query_as(UPDATE_SQL)
                    .bind(&movie.title)
                    .bind(movie.year)
                    .bind(movie.runtime)
                    .bind(&movie.genres)
                    .bind(movie.id)
                    .bind(movie.version)
                    .fetch_optional(&self.pool),
            )
            .await?;
        let (version,) = row.ok_or(AppError::EditConflict)?;
        movie.version = version;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        if id < 1 {
            return Err(AppError::NotFound);
        }
        tracing::debug!(sql = %DELETE_SQL, id, "query");
        let result = self
            .bounded(sqlx::query(DELETE_SQL).bind(id).execute(&self.pool))
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, filters: &ListFilters) -> Result<(Vec<Movie>, Metadata), AppError> {
        let sql = list_sql(filters);
        tracing::debug!(sql = %sql, filters = ?filters, "query");
        let rows: Vec<ListRow> = self
            .bounded(
                sqlx::query_as(&sql)
                    .bind(&filters.title)
                    .bind(&filters.genres)
                    .bind(filters.limit())
                    .bind(filters.offset())
                    .fetch_all(&self.pool),
            )
            .await?;
        let total = rows.first().map(|r| r.total_records).unwrap_or(0);
        let metadata = Metadata::calculate(total.max(0) as u64, filters.page, filters.page_size);
        Ok((rows.into_iter().map(|r| r.movie).collect(), metadata))
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        })
    }
}
