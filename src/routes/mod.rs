//! Router assembly: route groups plus request id, tracing and timeout layers.

mod common;
mod movie;

pub use common::common_routes;
pub use movie::movie_routes;

use crate::error::AppError;
use crate::handlers::not_found;
use crate::state::AppState;
use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    http::{HeaderName, Request},
    BoxError, Router,
};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Full application router. Unknown paths get a 404 envelope; requests past
/// `config.request_timeout` get a 408 envelope.
pub fn app(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout;
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(common_routes(state.clone()))
        .merge(movie_routes(state))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    let request_id = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(request_timeout),
        )
}

async fn handle_timeout(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::RequestTimeout
    } else {
        AppError::Internal(format!("middleware: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_timeout_layer_errors_are_internal() {
        let err: BoxError = Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        match handle_timeout(err).await {
            AppError::Internal(msg) => assert!(msg.contains("boom")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
