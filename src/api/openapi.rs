//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the quiet-hn REST API
///
/// Served at `/openapi.json`, and through Swagger UI at `/swagger-ui` when
/// enabled.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "quiet-hn REST API",
        version = "0.1.0",
        description = "Top linked stories of the Hacker News front page, in rank order",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::api::routes::list_stories,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(
            crate::types::Story,
            crate::types::ItemId,
            crate::api::routes::StoriesQuery,
            crate::api::routes::StoriesResponse,
            crate::api::routes::HealthResponse,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "stories", description = "Top stories"),
        (name = "system", description = "Health and API metadata")
    )
)]
pub struct ApiDoc;
