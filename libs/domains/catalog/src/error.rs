use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No products found.")]
    NoProducts,

    #[error("Product not found.")]
    ProductNotFound,

    #[error("No products found for this category.")]
    EmptyCategory,

    #[error("No product found for this category and id.")]
    ProductNotFoundInCategory,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Storage(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NoProducts
            | CatalogError::ProductNotFound
            | CatalogError::EmptyCategory
            | CatalogError::ProductNotFoundInCategory => AppError::NotFound(err.to_string()),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Database(e) => AppError::Database(e),
            CatalogError::Storage(e) => AppError::Io(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
