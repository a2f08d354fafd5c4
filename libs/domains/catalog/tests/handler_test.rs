//! Handler tests for the catalog domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Multipart form parsing (create/update)
//! - Response serialization (aggregates and acknowledgments)
//! - HTTP status codes
//! - Error responses
//!
//! They run against the in-memory repository and a temp-dir image store,
//! not the full application with CORS/tracing middleware.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_catalog::*;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt; // For oneshot()

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn text_part(name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    )
    .into_bytes()
}

fn file_part(name: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    part.extend_from_slice(data);
    part.extend_from_slice(b"\r\n");
    part
}

fn multipart_body(parts: Vec<Vec<u8>>) -> Body {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(&part);
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn multipart_request(method: &str, uri: &str, parts: Vec<Vec<u8>>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_body(parts))
        .unwrap()
}

fn setup() -> (
    CatalogService<InMemoryCatalogRepository>,
    Router,
    TempDir,
) {
    let tmp = tempfile::tempdir().unwrap();
    let images = ImageStore::new(ImageStoreConfig {
        dir: tmp.path().to_path_buf(),
        public_url: "http://localhost:8080/images".to_string(),
    });
    let service = CatalogService::new(InMemoryCatalogRepository::new(), images);
    let app = handlers::router(service.clone());
    (service, app, tmp)
}

fn create_parts(title: &str, category: &str) -> Vec<Vec<u8>> {
    vec![
        text_part("title", title),
        text_part("price", "120.5"),
        text_part("category", category),
        text_part("details_items", "220V, 50Hz"),
        text_part("details_items", "two year warranty"),
        text_part("sub_category", "drills,accessories"),
        file_part("main_image", "main.jpg", b"mainbytes"),
        file_part("images", "gallery1.png", b"gallerybytes"),
    ]
}

#[tokio::test]
async fn test_list_products_empty_returns_404() {
    let (_service, app, _tmp) = setup();

    let request = Request::builder()
        .method("GET")
        .uri("/products")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "No products found.");
}

#[tokio::test]
async fn test_create_product_returns_201_with_aggregate() {
    let (_service, app, tmp) = setup();

    let request = multipart_request(
        "POST",
        "/products/create_product",
        create_parts("Drill", "tools"),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.title, "Drill");
    assert_eq!(product.price, 120.5);
    assert_eq!(
        product.details,
        vec!["220V", "50Hz", "two year warranty"]
    );
    assert_eq!(product.sub_categories, vec!["drills", "accessories"]);
    assert!(product.main_image.as_deref().unwrap().ends_with(".jpg"));
    assert_eq!(product.images.len(), 1);
    assert!(product.images[0].ends_with(".png"));

    // Both uploads landed on disk
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn test_create_product_without_main_image_returns_400() {
    let (_service, app, _tmp) = setup();

    let parts = vec![
        text_part("title", "Drill"),
        text_part("price", "10"),
        text_part("category", "tools"),
    ];
    let request = multipart_request("POST", "/products/create_product", parts);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_with_bad_price_returns_400() {
    let (_service, app, _tmp) = setup();

    let mut parts = create_parts("Drill", "tools");
    parts[1] = text_part("price", "cheap");
    let request = multipart_request("POST", "/products/create_product", parts);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_product_roundtrip() {
    let (_service, app, _tmp) = setup();

    let request = multipart_request(
        "POST",
        "/products/create_product",
        create_parts("Drill", "tools"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let created: Product = json_body(response.into_body()).await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/products/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Product = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_product_returns_404_for_missing() {
    let (_service, app, _tmp) = setup();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/products/{}", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product not found.");
}

#[tokio::test]
async fn test_get_product_rejects_invalid_uuid() {
    let (_service, app, _tmp) = setup();

    let request = Request::builder()
        .method("GET")
        .uri("/products/not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_replaces_details_and_appends_gallery() {
    let (_service, app, _tmp) = setup();

    let request = multipart_request(
        "POST",
        "/products/create_product",
        create_parts("Drill", "tools"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let created: Product = json_body(response.into_body()).await;

    let update_parts = vec![
        text_part("title", "Hammer drill"),
        text_part("price", "150"),
        text_part("category", "tools"),
        text_part("details_items", "1000W"),
        file_part("images", "gallery2.png", b"morebytes"),
    ];
    let request = multipart_request(
        "PUT",
        &format!("/products/{}", created.id),
        update_parts,
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let ack: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(ack.message, "Product updated successfully");

    let request = Request::builder()
        .method("GET")
        .uri(format!("/products/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let fetched: Product = json_body(response.into_body()).await;

    assert_eq!(fetched.title, "Hammer drill");
    assert_eq!(fetched.details, vec!["1000W"]);
    // Old sub-categories were replaced by the (empty) submitted set
    assert!(fetched.sub_categories.is_empty());
    // Gallery appended, main image kept
    assert_eq!(fetched.images.len(), 2);
    assert_eq!(fetched.images[0], created.images[0]);
    assert_eq!(fetched.main_image, created.main_image);
}

#[tokio::test]
async fn test_update_missing_product_returns_404() {
    let (_service, app, _tmp) = setup();

    let parts = vec![
        text_part("title", "Ghost"),
        text_part("price", "1"),
        text_part("category", "tools"),
    ];
    let request = multipart_request(
        "PUT",
        &format!("/products/{}", uuid::Uuid::new_v4()),
        parts,
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_removes_aggregate_and_files() {
    let (_service, app, tmp) = setup();

    let request = multipart_request(
        "POST",
        "/products/create_product",
        create_parts("Drill", "tools"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let created: Product = json_body(response.into_body()).await;
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/products/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let ack: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(
        ack.message,
        "Product, details and associated images deleted successfully"
    );
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/products/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_endpoints() {
    let (_service, app, _tmp) = setup();

    let request = multipart_request(
        "POST",
        "/products/create_product",
        create_parts("Drill", "tools"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let drill: Product = json_body(response.into_body()).await;

    let request = multipart_request(
        "POST",
        "/products/create_product",
        create_parts("Heater", "climate"),
    );
    app.clone().oneshot(request).await.unwrap();

    // Filter by category
    let request = Request::builder()
        .method("GET")
        .uri("/category/tools")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, drill.id);

    // Category + id match
    let request = Request::builder()
        .method("GET")
        .uri(format!("/category/tools/{}", drill.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Wrong category for that id
    let request = Request::builder()
        .method("GET")
        .uri(format!("/category/climate/{}", drill.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "No product found for this category and id.");

    // Unknown category
    let request = Request::builder()
        .method("GET")
        .uri("/category/garden")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "No products found for this category.");
}
