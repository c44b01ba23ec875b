//! HTTP error mapping.
//!
//! # Design
//! Every failure a handler can return becomes `{"error": "<message>"}` with
//! a fixed, client-safe message. Details (the rejected id, the serde error)
//! go to the log, not the response body.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todo_core::StoreError;
use tracing::debug;

pub const TODO_NOT_FOUND: &str = "Todo not found";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const INVALID_BODY: &str = "Invalid request body";
pub const INTERNAL_ERROR: &str = "Something went wrong!";

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The path segment is not a todo id at all, so nothing can match it.
    #[error("no todo with id {0:?}")]
    UnknownId(String),

    #[error("unreadable request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("route not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::Validation(_)) | ApiError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(StoreError::NotFound(_))
            | ApiError::UnknownId(_)
            | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Store(StoreError::Validation(msg)) => msg.clone(),
            ApiError::Store(StoreError::NotFound(_)) | ApiError::UnknownId(_) => {
                TODO_NOT_FOUND.to_string()
            }
            ApiError::InvalidBody(_) => INVALID_BODY.to_string(),
            ApiError::RouteNotFound => ROUTE_NOT_FOUND.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(status = status.as_u16(), error = %self, "request failed");
        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}

/// `axum::Json`, but a bad body is reported as an `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Decode an optional JSON body. No body, or a body sent without a JSON
/// content type, decodes as `T::default()`; a JSON body that does not parse
/// is still an error.
pub fn optional_json<T: DeserializeOwned + Default>(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) || !has_json_content_type(headers) {
        return Ok(T::default());
    }
    let Json(value) = Json::<T>::from_bytes(body)?;
    Ok(value)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("application/json")
        || mime.to_ascii_lowercase().ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_is_400_with_store_message() {
        let response =
            ApiError::from(StoreError::Validation("Todo text is required".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await, ErrorBody::new("Todo text is required"));
    }

    #[tokio::test]
    async fn missing_and_unparsable_ids_look_the_same() {
        for err in [
            ApiError::from(StoreError::NotFound(9)),
            ApiError::UnknownId("abc".into()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_of(response).await, ErrorBody::new(TODO_NOT_FOUND));
        }
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Patch {
        done: Option<bool>,
    }

    fn json_headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
        headers
    }

    #[test]
    fn optional_json_defaults_without_body_or_content_type() {
        let json = json_headers("application/json");
        assert_eq!(optional_json::<Patch>(&json, b"").unwrap(), Patch::default());
        assert_eq!(optional_json::<Patch>(&json, b" \n").unwrap(), Patch::default());
        assert_eq!(
            optional_json::<Patch>(&HeaderMap::new(), br#"{"done":true}"#).unwrap(),
            Patch::default()
        );
        assert_eq!(
            optional_json::<Patch>(&json_headers("text/plain"), b"garbage").unwrap(),
            Patch::default()
        );
    }

    #[test]
    fn optional_json_decodes_json_bodies() {
        let patch: Patch = optional_json(
            &json_headers("application/json; charset=utf-8"),
            br#"{"done":true}"#,
        )
        .unwrap();
        assert_eq!(patch.done, Some(true));

        let patch: Patch =
            optional_json(&json_headers("application/merge-patch+json"), br#"{"done":false}"#)
                .unwrap();
        assert_eq!(patch.done, Some(false));
    }

    #[test]
    fn optional_json_rejects_broken_json() {
        let json = json_headers("application/json");
        for body in [&b"{"[..], &br#"{"done":"yes"}"#[..]] {
            assert!(matches!(
                optional_json::<Patch>(&json, body),
                Err(ApiError::InvalidBody(_))
            ));
        }
    }

    #[tokio::test]
    async fn unmatched_route_is_404() {
        let response = ApiError::RouteNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await, ErrorBody::new(ROUTE_NOT_FOUND));
    }
}
