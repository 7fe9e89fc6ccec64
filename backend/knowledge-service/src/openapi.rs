/// OpenAPI documentation for the Knowledge Listing Service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Knowledge Listing Service API",
        version = "1.0.0",
        description = "Listing views for the knowledge-sharing platform. Serves the feed, table, cluster, and favorites views over published posts, with filtering by keyword, path, tag, and author, engagement statistics, grouping by author/tag/folder, and typeahead suggestions for the search and filter inputs.",
        contact(
            name = "Knowledge Platform Team",
            email = "platform@knowledge.dev"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8084", description = "Development server"),
        (url = "https://knowledge-api.knowledge.dev", description = "Production server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "listing", description = "Feed, table, cluster, and favorites views"),
        (name = "typeahead", description = "Suggestions for search, tags, users, and paths"),
        (name = "templates", description = "Knowledge template downloads"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from the identity provider"))
                        .build(),
                ),
            )
        }
    }
}
