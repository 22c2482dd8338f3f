//! Movie CRUD handlers: list, create, show, update, delete.

use crate::error::AppError;
use crate::extractors::{ExpectedVersion, MovieId, ValidJson};
use crate::model::{Movie, MovieInput, MovieUpdate};
use crate::response::{success_created, success_ok, Envelope};
use crate::service::parse_list_filters;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filters = parse_list_filters(&params)?;
    let (movies, metadata) = state.movies.list(&filters).await?;
    Ok((
        StatusCode::OK,
        Json(Envelope::success("movies", movies).with_metadata(metadata)),
    ))
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<MovieInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut movie = Movie::draft(input);
    state.movies.insert(&mut movie).await?;
    tracing::info!(id = movie.id, title = %movie.title, "movie created");
    let location = format!("/v1/movies/{}", movie.id);
    Ok(([(header::LOCATION, location)], success_created("movie", movie)))
}

pub async fn show(
    State(state): State<AppState>,
    MovieId(id): MovieId,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movies.get(id).await?;
    Ok(success_ok("movie", movie))
}

/// Partial update. The expected version comes from the body's `version` or the
/// `X-Expected-Version` header; without either, the version just read is used.
pub async fn update(
    State(state): State<AppState>,
    MovieId(id): MovieId,
    ExpectedVersion(header_version): ExpectedVersion,
    ValidJson(patch): ValidJson<MovieUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let mut movie = state.movies.get(id).await?;
    if let Some(expected) = patch.version.or(header_version) {
        if expected != movie.version {
            return Err(AppError::EditConflict);
        }
    }
    movie.apply(patch);
    state.movies.update(&mut movie).await?;
    tracing::info!(id, version = movie.version, "movie updated");
    Ok(success_ok("movie", movie))
}

pub async fn delete(
    State(state): State<AppState>,
    MovieId(id): MovieId,
) -> Result<impl IntoResponse, AppError> {
    state.movies.delete(id).await?;
    tracing::info!(id, "movie deleted");
    Ok(success_ok("message", "movie successfully deleted"))
}
