//! JSON body extractor with client-facing failure messages.
//!
//! Every decoding failure becomes a `MalformedRequest` whose detail says
//! what was wrong with the body, instead of axum's plain-text rejection.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use noda_core::error::CoreError;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::AppError;

/// Maximum accepted request body, enforced by `DefaultBodyLimit`.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub const BODY_TOO_LARGE: &str = "Body must not be larger than 1MB.";
pub const BODY_EMPTY: &str = "Body must not be empty.";

/// A JSON request body decoded into `T`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                CoreError::MalformedRequest(BODY_TOO_LARGE.to_string())
            } else {
                CoreError::MalformedRequest(rejection.body_text())
            }
        })?;
        Ok(JsonBody(decode(&bytes)?))
    }
}

/// Decode a body, describing the first problem found.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CoreError::MalformedRequest(BODY_EMPTY.to_string()));
    }
    serde_json::from_slice(bytes).map_err(|e| CoreError::MalformedRequest(describe(&e)))
}

fn describe(err: &serde_json::Error) -> String {
    let full = err.to_string();
    let reason = full
        .rsplit_once(" at line ")
        .map_or(full.as_str(), |(reason, _)| reason);

    match err.classify() {
        Category::Eof => "Body contains badly-formed JSON.".to_string(),
        Category::Syntax if reason.starts_with("trailing characters") => {
            "Body must only contain a single JSON value.".to_string()
        }
        Category::Syntax => format!(
            "Body contains badly-formed JSON (at line {} column {}).",
            err.line(),
            err.column()
        ),
        Category::Data => match (reason.split('`').nth(1), reason) {
            (Some(field), r) if r.starts_with("unknown field") => {
                format!("Body contains unknown key \"{field}\".")
            }
            (Some(field), r) if r.starts_with("missing field") => {
                format!("Body is missing key \"{field}\".")
            }
            _ => format!("Body contains an incorrect JSON value: {reason}."),
        },
        Category::Io => "Body could not be read.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    #[allow(dead_code)]
    struct Input {
        name: String,
    }

    fn detail(bytes: &[u8]) -> String {
        match decode::<Input>(bytes) {
            Err(CoreError::MalformedRequest(detail)) => detail,
            other => panic!("expected a malformed request, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_bodies() {
        assert_matches!(decode::<Input>(br#"{"name": "x"}"#), Ok(Input { .. }));
    }

    #[test]
    fn describes_each_failure() {
        assert_eq!(detail(b"   "), BODY_EMPTY);
        assert_eq!(detail(br#"{"name": "#), "Body contains badly-formed JSON.");
        assert!(detail(br#"{"name" "x"}"#).starts_with("Body contains badly-formed JSON (at line 1"));
        assert_eq!(
            detail(br#"{"name": "x"} {}"#),
            "Body must only contain a single JSON value."
        );
        assert_eq!(
            detail(br#"{"name": "x", "extra": 1}"#),
            "Body contains unknown key \"extra\"."
        );
        assert_eq!(detail(b"{}"), "Body is missing key \"name\".");
        assert!(detail(br#"{"name": 5}"#).starts_with("Body contains an incorrect JSON value"));
    }
}
