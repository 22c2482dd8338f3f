//! Shared application state for all routes. Dependencies are injected here, not held globally.

use crate::config::Config;
use crate::store::MovieStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: Arc<dyn MovieStore>,
}

impl AppState {
    pub fn new(config: Config, movies: Arc<dyn MovieStore>) -> Self {
        AppState {
            config: Arc::new(config),
            movies,
        }
    }
}
