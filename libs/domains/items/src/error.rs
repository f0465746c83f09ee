use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Message returned to clients for an unknown item id.
pub const ITEM_NOT_FOUND: &str = "Item not found";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("Item {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    BadRequest(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(_) => AppError::NotFound(ITEM_NOT_FOUND.to_string()),
            ItemError::BadRequest(msg) => AppError::BadRequest(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
