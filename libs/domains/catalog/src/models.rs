use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Product aggregate - a product row plus all of its owned children
/// (detail lines, sub-category tags, main image, gallery images)
/// assembled into one response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Product title
    pub title: String,
    /// Unit price
    pub price: f64,
    /// Category used by the storefront filters
    pub category: String,
    /// Physical height, if known
    pub height: Option<f64>,
    /// Physical width, if known
    pub width: Option<f64>,
    /// Physical depth, if known
    pub depth: Option<f64>,
    /// Whether the product is in stock, if tracked
    pub stock: Option<bool>,
    /// Public URL of the designated cover image
    pub main_image: Option<String>,
    /// Public URLs of the gallery images, in insertion order
    pub images: Vec<String>,
    /// Free-text detail lines, in insertion order
    #[serde(rename = "details_list")]
    pub details: Vec<String>,
    /// Sub-category tags, in insertion order
    pub sub_categories: Vec<String>,
}

/// Scalar form fields submitted with a create or update request.
///
/// Image files travel alongside this struct as [`crate::storage::ImageUpload`]
/// values; they are parsed out of the same multipart body by the handlers.
#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct ProductForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1))]
    pub category: String,
    /// Raw detail entries; each may itself be a comma-separated list
    pub details_items: Vec<String>,
    /// Raw sub-category entries; same comma-splitting rules as details
    pub sub_category: Vec<String>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub stock: Option<bool>,
}

/// Fully normalized input for inserting a new product aggregate.
///
/// Image files have already been written to the image store by the time
/// this struct exists; only their public URLs travel to the repository.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub stock: Option<bool>,
    pub main_image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub details: Vec<String>,
    pub sub_categories: Vec<String>,
}

/// Normalized input for updating an existing product aggregate.
///
/// Scalar columns are overwritten in place. `details` and `sub_categories`
/// entirely replace the stored sets. `main_image_url`, when present,
/// upserts the single main-image row. `new_gallery_urls` are appended to
/// the gallery; existing gallery rows are never touched.
#[derive(Debug, Clone)]
pub struct ProductPatch {
    pub title: String,
    pub price: f64,
    pub category: String,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub stock: Option<bool>,
    pub main_image_url: Option<String>,
    pub new_gallery_urls: Vec<String>,
    pub details: Vec<String>,
    pub sub_categories: Vec<String>,
}

/// Simple acknowledgment body for update/delete endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Flatten raw form entries into individual terms.
///
/// Each entry may itself be a comma-separated list; entries are split on
/// commas, trimmed, and empty results dropped. Order is preserved.
pub fn normalize_terms(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}
