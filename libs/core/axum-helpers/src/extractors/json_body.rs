//! JSON body extractor that only checks JSON shape.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};

/// Message returned for any body that is not JSON of the expected shape.
pub const INVALID_INPUT: &str = "Invalid input";

/// JSON extractor that accepts the body regardless of `Content-Type`.
///
/// Unlike `axum::Json`, which answers 415/422 for missing headers or
/// mismatched fields, every failure here is a 400 `Invalid input`. Field
/// defaults are left to the target type's `serde` attributes.
///
/// Only the first JSON value in the body is read; anything after it is
/// ignored. A `null` body, or a `null` object member, leaves the defaults in
/// place. An empty body is rejected.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create(JsonBody(input): JsonBody<CreateItem>) -> String {
///     format!("Creating {}", input.name)
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| invalid_input())?;

        decode(&body).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            invalid_input()
        })
    }
}

fn invalid_input() -> Response {
    AppError::BadRequest(INVALID_INPUT.to_string()).into_response()
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<T> {
    let value = match serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
    {
        Some(value) => value?,
        None => return Err(serde_json::Error::custom("empty body")),
    };

    let value = match value {
        Value::Null => Value::Object(Map::new()),
        Value::Object(mut fields) => {
            fields.retain(|_, field| !field.is_null());
            Value::Object(fields)
        }
        other => other,
    };

    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Named {
        #[serde(default)]
        name: String,
    }

    async fn echo(JsonBody(input): JsonBody<Named>) -> String {
        input.name
    }

    async fn send(body: &'static str) -> (StatusCode, String) {
        let app = Router::new().route("/", post(echo));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_accepts_json_without_content_type() {
        assert_eq!(send(r#"{"name":"A"}"#).await, (StatusCode::OK, "A".to_string()));
    }

    #[tokio::test]
    async fn test_missing_field_uses_default() {
        assert_eq!(send("{}").await, (StatusCode::OK, String::new()));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, INVALID_INPUT);
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_bad_request() {
        let (status, _) = send(r#"{"name":42}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_null_body_uses_defaults() {
        assert_eq!(send("null").await, (StatusCode::OK, String::new()));
    }

    #[tokio::test]
    async fn test_null_field_uses_default() {
        assert_eq!(send(r#"{"name":null}"#).await, (StatusCode::OK, String::new()));
    }

    #[tokio::test]
    async fn test_data_after_first_value_is_ignored() {
        assert_eq!(
            send(r#"{"name":"A"} {"name":"B"} trailing"#).await,
            (StatusCode::OK, "A".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_body_is_bad_request() {
        let (status, body) = send("").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, INVALID_INPUT);

        let (status, _) = send("   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
