use axum::response::{IntoResponse, Response};

use super::AppError;

/// Handler for 404 Not Found errors.
///
/// Use as the router fallback for unknown paths.
pub async fn not_found() -> Response {
    AppError::NotFound("Not found".to_string()).into_response()
}

/// Handler for 405 Method Not Allowed errors.
///
/// Use as the `MethodRouter` fallback so unsupported verbs get a plain-text
/// body instead of an empty one.
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}
