//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Catalog endpoints are mounted at the API root; the derive rejects a
/// literal `""` nest path, but accepts it via a const expression.
const ROOT: &str = "";

/// Combined OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Storefront catalog and contact-form backend"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    nest(
        (path = ROOT, api = domain_catalog::handlers::ApiDoc),
        (path = "/contact", api = domain_contact::handlers::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Contact", description = "Contact form endpoints")
    )
)]
pub struct ApiDoc;
