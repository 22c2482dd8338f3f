//! Path id and optimistic-concurrency header extractors.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Header carrying the version the client expects to overwrite.
pub const EXPECTED_VERSION_HEADER: &str = "X-Expected-Version";

/// Positive integer `:id` path segment. Anything else is a 404.
#[derive(Clone, Copy, Debug)]
pub struct MovieId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for MovieId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        parse_id(&raw).map(MovieId)
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound),
    }
}

/// Optional `X-Expected-Version` header.
#[derive(Clone, Copy, Debug)]
pub struct ExpectedVersion(pub Option<i32>);

#[async_trait]
impl<S> FromRequestParts<S> for ExpectedVersion
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(EXPECTED_VERSION_HEADER) else {
            return Ok(ExpectedVersion(None));
        };
        let version = value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i32>().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("{} header must be an integer", EXPECTED_VERSION_HEADER))
            })?;
        Ok(ExpectedVersion(Some(version)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("0"), Err(AppError::NotFound)));
        assert!(matches!(parse_id("-3"), Err(AppError::NotFound)));
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound)));
        assert!(matches!(parse_id("1.5"), Err(AppError::NotFound)));
    }
}
