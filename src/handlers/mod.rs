//! HTTP handlers for movie CRUD, health and diagnostics.

pub mod health;
pub mod movie;
pub use health::*;
pub use movie::*;
