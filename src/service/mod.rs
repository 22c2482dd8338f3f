//! Field validation and query parsing shared by handlers and stores.

mod validation;
pub use validation::{parse_list_filters, validate_movie, Validator, MAX_GENRES, MIN_YEAR};
