//! Movie CRUD routes.

use crate::handlers::{create, delete as delete_handler, list, method_not_allowed, show, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn movie_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/movies",
            get(list).post(create).fallback(method_not_allowed),
        )
        .route(
            "/v1/movies/:id",
            get(show)
                .patch(update)
                .delete(delete_handler)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}
