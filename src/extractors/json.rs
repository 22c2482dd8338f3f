//! JSON request bodies: size-capped, strict about unknown keys and trailing data.

use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequest, Request};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// Like `axum::Json`, but rejections are descriptive 400 envelopes and the body cap comes from config.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let limit = AppState::from_ref(state).config.max_body_bytes;
        let bytes = axum::body::to_bytes(req.into_body(), limit)
            .await
            .map_err(|e| {
                if e.into_inner().downcast_ref::<LengthLimitError>().is_some() {
                    AppError::BadRequest(format!("body must not be larger than {} bytes", limit))
                } else {
                    AppError::BadRequest("unable to read request body".into())
                }
            })?;
        decode_json(&bytes).map(ValidJson)
    }
}

/// Decode exactly one JSON value into `T`, mapping serde errors to client-facing messages.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("body must not be empty".into()));
    }
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = T::deserialize(&mut de).map_err(describe)?;
    de.end()
        .map_err(|_| AppError::BadRequest("body must only contain a single JSON value".into()))?;
    Ok(value)
}

fn describe(err: serde_json::Error) -> AppError {
    let message = match err.classify() {
        Category::Eof => "body contains badly-formed JSON".to_string(),
        Category::Syntax => format!(
            "body contains badly-formed JSON (at line {} column {})",
            err.line(),
            err.column()
        ),
        Category::Data => {
            let text = err.to_string();
            match unknown_field(&text) {
                Some(field) => format!("body contains unknown key \"{}\"", field),
                None => format!(
                    "body contains incorrect JSON type (at line {} column {})",
                    err.line(),
                    err.column()
                ),
            }
        }
        Category::Io => "unable to read request body".to_string(),
    };
    AppError::BadRequest(message)
}

/// Pull `x` out of serde's "unknown field `x`, expected ..." message.
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split('`').next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovieInput;

    fn message(bytes: &[u8]) -> String {
        match decode_json::<MovieInput>(bytes) {
            Err(AppError::BadRequest(m)) => m,
            other => panic!("expected bad request, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn decodes_a_complete_body() {
        let input: MovieInput =
            decode_json(br#"{"title":"Moana","year":2016,"runtime":107,"genres":["animation"]}"#).unwrap();
        assert_eq!(input.title, "Moana");
        assert_eq!(input.genres, vec!["animation".to_string()]);
    }

    #[test]
    fn empty_body() {
        assert_eq!(message(b""), "body must not be empty");
        assert_eq!(message(b"  \n"), "body must not be empty");
    }

    #[test]
    fn badly_formed() {
        assert!(message(br#"{"title": "Moana", }"#).starts_with("body contains badly-formed JSON"));
        assert_eq!(message(br#"{"title": "Mo"#), "body contains badly-formed JSON");
    }

    #[test]
    fn unknown_key() {
        assert_eq!(message(br#"{"title":"Moana","rating":"PG"}"#), "body contains unknown key \"rating\"");
    }

    #[test]
    fn wrong_type() {
        assert!(message(br#"{"year":"2016"}"#).starts_with("body contains incorrect JSON type"));
        assert!(message(br#"{"genres":"drama"}"#).starts_with("body contains incorrect JSON type"));
    }

    #[test]
    fn trailing_values() {
        assert_eq!(
            message(br#"{"title":"Moana"} {"title":"Frozen"}"#),
            "body must only contain a single JSON value"
        );
    }
}
