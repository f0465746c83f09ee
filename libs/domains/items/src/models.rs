use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Item entity held by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Identifier assigned by the store, starting at 1
    pub id: i64,
    /// Free-form name, may be empty
    pub name: String,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Body of `POST /items/add`
///
/// Missing fields take their defaults, unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateItem {
    pub name: String,
}

/// Body of `PUT /items/update`; the record with `id` is replaced in full
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateItem {
    pub id: i64,
    pub name: String,
}

/// Body of `DELETE /items/delete`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeleteItem {
    pub id: i64,
}
