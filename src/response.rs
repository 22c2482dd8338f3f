//! Standard response envelope.
//!
//! A success body has one key naming the resource (`"movie"`, `"movies"`), plus
//! `"metadata"` for paged lists. A failure body has the single key `"error"`.

use crate::error::FieldErrors;
use crate::model::Metadata;
use axum::{http::StatusCode, Json};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug)]
pub enum Envelope<T> {
    Success {
        key: &'static str,
        value: T,
        metadata: Option<Metadata>,
    },
    Failure(ErrorPayload),
}

#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Message(String),
    Fields(FieldErrors),
}

impl<T> Envelope<T> {
    pub fn success(key: &'static str, value: T) -> Self {
        Envelope::Success {
            key,
            value,
            metadata: None,
        }
    }

    pub fn with_metadata(self, meta: Metadata) -> Self {
        match self {
            Envelope::Success { key, value, .. } => Envelope::Success {
                key,
                value,
                metadata: Some(meta),
            },
            failure => failure,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Failure(ErrorPayload::Message(message.into()))
    }

    pub fn field_errors(fields: FieldErrors) -> Self {
        Envelope::Failure(ErrorPayload::Fields(fields))
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success {
                key,
                value,
                metadata,
            } => {
                let len = if metadata.is_some() { 2 } else { 1 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry(key, value)?;
                if let Some(meta) = metadata {
                    map.serialize_entry("metadata", meta)?;
                }
                map.end()
            }
            Envelope::Failure(payload) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", payload)?;
                map.end()
            }
        }
    }
}

pub fn success_ok<T: Serialize>(key: &'static str, value: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::success(key, value)))
}

pub fn success_created<T: Serialize>(
    key: &'static str,
    value: T,
) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::success(key, value)))
}
