use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{NewProduct, Product, ProductPatch};

/// Repository trait for product aggregate persistence.
///
/// Reads return fully assembled aggregates; writes take pre-normalized
/// inputs whose image files are already on disk.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List every product aggregate, oldest first
    async fn list(&self) -> CatalogResult<Vec<Product>>;

    /// Get one product aggregate by ID
    async fn get(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// List product aggregates with an exact-match category
    async fn list_by_category(&self, category: &str) -> CatalogResult<Vec<Product>>;

    /// Get one product aggregate matching both category and ID
    async fn get_in_category(&self, category: &str, id: Uuid) -> CatalogResult<Option<Product>>;

    /// Insert a new product aggregate in one transaction
    async fn create(&self, input: NewProduct) -> CatalogResult<()>;

    /// Overwrite a product's columns and child sets in one transaction.
    ///
    /// Returns false when no product row matched the ID.
    async fn update(&self, id: Uuid, patch: ProductPatch) -> CatalogResult<bool>;

    /// Delete a product and all of its child rows in one transaction.
    ///
    /// Returns false when no product row matched the ID.
    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    /// Collect every gallery and main image URL owned by a product
    async fn image_urls(&self, id: Uuid) -> CatalogResult<Vec<String>>;
}

/// In-memory implementation of CatalogRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn sorted_by_id(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by_key(|p| p.id);
    products
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list(&self) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(sorted_by_id(products.values().cloned().collect()))
    }

    async fn get(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list_by_category(&self, category: &str) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(sorted_by_id(
            products
                .values()
                .filter(|p| p.category == category)
                .cloned()
                .collect(),
        ))
    }

    async fn get_in_category(&self, category: &str, id: Uuid) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products
            .get(&id)
            .filter(|p| p.category == category)
            .cloned())
    }

    async fn create(&self, input: NewProduct) -> CatalogResult<()> {
        let mut products = self.products.write().await;

        let product = Product {
            id: input.id,
            title: input.title,
            price: input.price,
            category: input.category,
            height: input.height,
            width: input.width,
            depth: input.depth,
            stock: input.stock,
            main_image: input.main_image_url,
            images: input.gallery_urls,
            details: input.details,
            sub_categories: input.sub_categories,
        };
        products.insert(product.id, product);

        tracing::info!(product_id = %input.id, "Created product");
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> CatalogResult<bool> {
        let mut products = self.products.write().await;

        let Some(product) = products.get_mut(&id) else {
            return Ok(false);
        };

        product.title = patch.title;
        product.price = patch.price;
        product.category = patch.category;
        product.height = patch.height;
        product.width = patch.width;
        product.depth = patch.depth;
        product.stock = patch.stock;
        // Destructive set-replace for details and sub-categories
        product.details = patch.details;
        product.sub_categories = patch.sub_categories;
        // Main image upserts, gallery only appends
        if let Some(url) = patch.main_image_url {
            product.main_image = Some(url);
        }
        product.images.extend(patch.new_gallery_urls);

        tracing::info!(product_id = %id, "Updated product");
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn image_urls(&self, id: Uuid) -> CatalogResult<Vec<String>> {
        let products = self.products.read().await;

        let Some(product) = products.get(&id) else {
            return Ok(vec![]);
        };

        let mut urls = product.images.clone();
        urls.extend(product.main_image.clone());
        Ok(urls)
    }
}
