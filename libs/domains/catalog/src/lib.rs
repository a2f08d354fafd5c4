//! Catalog Domain
//!
//! This module provides the product-catalog vertical: listing, category
//! filtering, and create/update/delete of product aggregates with image
//! uploads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (JSON + multipart)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, image store
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Aggregates, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers,
//!     repository::InMemoryCatalogRepository,
//!     service::CatalogService,
//!     storage::{ImageStore, ImageStoreConfig},
//! };
//!
//! let repository = InMemoryCatalogRepository::new();
//! let images = ImageStore::new(ImageStoreConfig::default());
//! let service = CatalogService::new(repository, images);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use models::{MessageResponse, NewProduct, Product, ProductForm, ProductPatch};
pub use postgres::PgCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::CatalogService;
pub use storage::{ImageStore, ImageStoreConfig, ImageUpload};
