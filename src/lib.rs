//! Movie API: JSON REST service for a movies catalogue on PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Config, Environment, LogFormat, VERSION};
pub use error::{AppError, ConfigError, FieldErrors, StartupError};
pub use migration::apply_migrations;
pub use model::{ListFilters, Metadata, Movie, MovieInput, MovieUpdate};
pub use response::Envelope;
pub use routes::{app, common_routes, movie_routes};
pub use state::AppState;
pub use store::{connect, MemMovieStore, MovieStore, PgMovieStore};
