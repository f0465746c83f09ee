//! OpenAPI documentation configuration

use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Items API",
        version = "0.1.0",
        description = "In-memory item registry that publishes change events to NATS JetStream",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    modifiers(&ItemRoutes)
)]
pub struct ApiDoc;

/// Item routes are mounted at the root, so their document is merged rather
/// than nested.
struct ItemRoutes;

impl Modify for ItemRoutes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_items::ApiDoc::openapi());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_item_routes() {
        let doc = ApiDoc::openapi();

        for path in ["/items", "/items/add", "/items/update", "/items/delete"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
