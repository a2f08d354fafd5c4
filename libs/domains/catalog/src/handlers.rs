use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    UuidPath,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{MessageResponse, Product, ProductForm};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;
use crate::storage::ImageUpload;

pub const TAG: &str = "Products";

/// Uploads go through memory; keep room for a main image plus a gallery.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        create_product,
        update_product,
        delete_product,
        products_by_category,
        product_in_category,
    ),
    components(
        schemas(Product, ProductForm, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the catalog router with all HTTP endpoints
pub fn router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products))
        .route("/products/create_product", post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/category/{category}", get(products_by_category))
        .route("/category/{category}/{id}", get(product_in_category))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(shared_service)
}

/// List all product aggregates
#[utoipa::path(
    get,
    path = "/products",
    tag = TAG,
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Get a product aggregate by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Create a product from a multipart form with image uploads
#[utoipa::path(
    post,
    path = "/products/create_product",
    tag = TAG,
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    multipart: Multipart,
) -> CatalogResult<impl IntoResponse> {
    let (form, main_image, gallery) = parse_product_form(multipart).await?;
    let product = service.create_product(form, main_image, gallery).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product in place, replacing its detail and sub-category sets
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated successfully", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> CatalogResult<Json<MessageResponse>> {
    let (form, main_image, gallery) = parse_product_form(multipart).await?;
    service.update_product(id, form, main_image, gallery).await?;
    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// Delete a product, its child rows, and its image files
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<MessageResponse>> {
    service.delete_product(id).await?;
    Ok(Json(MessageResponse::new(
        "Product, details and associated images deleted successfully",
    )))
}

/// List product aggregates in a category
#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = TAG,
    params(
        ("category" = String, Path, description = "Exact-match category")
    ),
    responses(
        (status = 200, description = "Products in the category", body = Vec<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn products_by_category<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(category): Path<String>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.products_by_category(&category).await?;
    Ok(Json(products))
}

/// Get one product aggregate matching both category and ID
#[utoipa::path(
    get,
    path = "/category/{category}/{id}",
    tag = TAG,
    params(
        ("category" = String, Path, description = "Exact-match category"),
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn product_in_category<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path((category, id)): Path<(String, Uuid)>,
) -> CatalogResult<Json<Product>> {
    let product = service.product_in_category(&category, id).await?;
    Ok(Json(product))
}

/// Parse the scalar fields and image uploads out of a multipart body.
///
/// `details_items` and `sub_category` may repeat; gallery parts named
/// `images` may repeat too. Empty file parts (no bytes or no filename)
/// are skipped so browsers submitting blank file inputs do not create
/// empty images.
async fn parse_product_form(
    mut multipart: Multipart,
) -> CatalogResult<(ProductForm, Option<ImageUpload>, Vec<ImageUpload>)> {
    let mut title = None;
    let mut price = None;
    let mut category = None;
    let mut details_items = Vec::new();
    let mut sub_category = Vec::new();
    let mut height = None;
    let mut width = None;
    let mut depth = None;
    let mut stock = None;
    let mut main_image = None;
    let mut gallery = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CatalogError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "main_image" | "images" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| CatalogError::Validation(format!("Invalid multipart body: {e}")))?;

                if data.is_empty() || file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }

                let upload = ImageUpload {
                    file_name,
                    data: data.to_vec(),
                };
                if name == "main_image" {
                    main_image = Some(upload);
                } else {
                    gallery.push(upload);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| CatalogError::Validation(format!("Invalid multipart body: {e}")))?;

                match name.as_str() {
                    "title" => title = Some(value),
                    "price" => price = Some(parse_number("price", &value)?),
                    "category" => category = Some(value),
                    "details_items" => details_items.push(value),
                    "sub_category" => sub_category.push(value),
                    "height" => height = parse_optional_number("height", &value)?,
                    "width" => width = parse_optional_number("width", &value)?,
                    "depth" => depth = parse_optional_number("depth", &value)?,
                    "stock" => {
                        stock = match value.trim() {
                            "" => None,
                            v => Some(matches!(v, "true" | "1")),
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    let form = ProductForm {
        title: require_field("title", title)?,
        price: require_field("price", price)?,
        category: require_field("category", category)?,
        details_items,
        sub_category,
        height,
        width,
        depth,
        stock,
    };

    Ok((form, main_image, gallery))
}

fn require_field<T>(name: &str, value: Option<T>) -> CatalogResult<T> {
    value.ok_or_else(|| CatalogError::Validation(format!("Missing form field '{name}'")))
}

fn parse_number(name: &str, value: &str) -> CatalogResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CatalogError::Validation(format!("Field '{name}' must be a number")))
}

fn parse_optional_number(name: &str, value: &str) -> CatalogResult<Option<f64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_number(name, value).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert!(parse_number("price", "12.5").is_ok());
        assert!(parse_number("price", "cheap").is_err());
    }

    #[test]
    fn test_parse_optional_number_treats_empty_as_none() {
        assert_eq!(parse_optional_number("height", " ").unwrap(), None);
        assert_eq!(parse_optional_number("height", "3.5").unwrap(), Some(3.5));
    }
}
