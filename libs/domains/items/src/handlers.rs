use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{JsonBody, errors::handlers::method_not_allowed};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::events::{ItemEvent, ItemEventType};
use crate::models::{CreateItem, DeleteItem, Item, UpdateItem};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, update_item, delete_item),
    components(schemas(Item, CreateItem, UpdateItem, DeleteItem, ItemEvent, ItemEventType)),
    tags(
        (name = "Items", description = "In-memory item registry with change events")
    )
)]
pub struct ApiDoc;

/// Create the items router with all HTTP endpoints
///
/// Any other method on these paths answers 405 `Method not allowed`. HEAD is
/// routed explicitly because axum would otherwise serve it from the GET
/// handler.
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/items",
            get(list_items)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route("/items/add", post(create_item).fallback(method_not_allowed))
        .route("/items/update", put(update_item).fallback(method_not_allowed))
        .route("/items/delete", delete(delete_item).fallback(method_not_allowed))
        .with_state(shared_service)
}

/// List all items in insertion order
#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    responses(
        (status = 200, description = "All items", body = Vec<Item>),
        (status = 405, description = "Method not allowed", body = String, content_type = "text/plain")
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> Json<Vec<Item>> {
    Json(service.list_items().await)
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/items/add",
    tag = "Items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid input", body = String, content_type = "text/plain"),
        (status = 405, description = "Method not allowed", body = String, content_type = "text/plain")
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    JsonBody(input): JsonBody<CreateItem>,
) -> impl IntoResponse {
    let item = service.create_item(input.name).await;
    (StatusCode::CREATED, Json(item))
}

/// Replace an item's name
#[utoipa::path(
    put,
    path = "/items/update",
    tag = "Items",
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, description = "Invalid input", body = String, content_type = "text/plain"),
        (status = 404, description = "Item not found", body = String, content_type = "text/plain"),
        (status = 405, description = "Method not allowed", body = String, content_type = "text/plain")
    )
)]
async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    JsonBody(input): JsonBody<UpdateItem>,
) -> ItemResult<Json<Item>> {
    let item = service.update_item(input.id, input.name).await?;
    Ok(Json(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/delete",
    tag = "Items",
    request_body = DeleteItem,
    responses(
        (status = 200, description = "Item deleted", body = Item),
        (status = 400, description = "Invalid input", body = String, content_type = "text/plain"),
        (status = 404, description = "Item not found", body = String, content_type = "text/plain"),
        (status = 405, description = "Method not allowed", body = String, content_type = "text/plain")
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    JsonBody(input): JsonBody<DeleteItem>,
) -> ItemResult<Json<Item>> {
    let item = service.delete_item(input.id).await?;
    Ok(Json(item))
}
