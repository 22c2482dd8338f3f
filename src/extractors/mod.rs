//! Request extractors that reject with `AppError` envelopes.

pub mod id;
pub mod json;

pub use id::{ExpectedVersion, MovieId};
pub use json::{decode_json, ValidJson};
