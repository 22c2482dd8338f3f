//! Movie resource types and list filters.

mod filters;
mod movie;
pub use filters::*;
pub use movie::*;
