//! Typed errors and HTTP mapping.

use crate::response::Envelope;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> message, as produced by validation.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures that stop the process before it can serve requests.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database connection not established within {0:?}")]
    ConnectTimeout(std::time::Duration),
    #[error("migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("the requested resource could not be found")]
    NotFound,
    #[error("failed validation: {0:?}")]
    Validation(FieldErrors),
    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,
    #[error("{0}")]
    BadRequest(String),
    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(Method),
    #[error("the request took too long to process")]
    RequestTimeout,
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("database operation exceeded its deadline")]
    Timeout,
    #[error("internal: {0}")]
    Internal(String),
}

const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EditConflict => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Db(_) | AppError::Timeout | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(fields) => Envelope::<()>::field_errors(fields),
            err @ (AppError::Db(_) | AppError::Timeout | AppError::Internal(_)) => {
                tracing::error!(error = %err, "request failed");
                Envelope::error(SERVER_ERROR_MESSAGE)
            }
            other => {
                tracing::info!(error = %other, status = %status.as_u16(), "request rejected");
                Envelope::error(other.to_string())
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn database_errors_hide_internal_detail() {
        let (status, body) = body_json(AppError::Db(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], SERVER_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn validation_errors_render_field_map() {
        let mut fields = FieldErrors::new();
        fields.insert("title".into(), "must be provided".into());
        let (status, body) = body_json(AppError::Validation(fields)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["title"], "must be provided");
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let (status, body) = body_json(AppError::Internal("layer exploded".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], SERVER_ERROR_MESSAGE);
    }

    /// Shared buffer the fmt subscriber writes into.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn client_errors_are_logged_at_info() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _ = AppError::NotFound.into_response();
        });
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("request rejected"), "{}", logs);
        assert!(logs.contains("status=404"), "{}", logs);
    }

    #[tokio::test]
    async fn edit_conflict_is_409() {
        let (status, body) = body_json(AppError::EditConflict).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("edit conflict"));
    }
}
