use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{normalize_terms, NewProduct, Product, ProductForm, ProductPatch};
use crate::repository::CatalogRepository;
use crate::storage::{ImageStore, ImageUpload};

/// Service layer for catalog business logic
#[derive(Clone)]
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
    images: ImageStore,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R, images: ImageStore) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
        }
    }

    /// List every product aggregate.
    ///
    /// An empty catalog is a reportable condition, not a silent empty list.
    pub async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        let products = self.repository.list().await?;

        if products.is_empty() {
            return Err(CatalogError::NoProducts);
        }
        Ok(products)
    }

    /// Get one product aggregate by ID
    pub async fn get_product(&self, id: Uuid) -> CatalogResult<Product> {
        self.repository
            .get(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// List product aggregates with an exact-match category
    pub async fn products_by_category(&self, category: &str) -> CatalogResult<Vec<Product>> {
        let products = self.repository.list_by_category(category).await?;

        if products.is_empty() {
            return Err(CatalogError::EmptyCategory);
        }
        Ok(products)
    }

    /// Get one product aggregate matching both category and ID
    pub async fn product_in_category(&self, category: &str, id: Uuid) -> CatalogResult<Product> {
        self.repository
            .get_in_category(category, id)
            .await?
            .ok_or(CatalogError::ProductNotFoundInCategory)
    }

    /// Create a product aggregate from submitted form fields and uploads.
    ///
    /// Image files are written to the store first; their database rows are
    /// then inserted inside one transaction. When that transaction rolls
    /// back the files stay on disk unreferenced - an accepted leak.
    pub async fn create_product(
        &self,
        form: ProductForm,
        main_image: Option<ImageUpload>,
        gallery: Vec<ImageUpload>,
    ) -> CatalogResult<Product> {
        form.validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let main_image =
            main_image.ok_or_else(|| CatalogError::Validation("main_image file is required".to_string()))?;

        let id = Uuid::now_v7();
        let main_image_url = self.images.save(&main_image).await?;

        let mut gallery_urls = Vec::with_capacity(gallery.len());
        for upload in &gallery {
            gallery_urls.push(self.images.save(upload).await?);
        }

        let details = normalize_terms(&form.details_items);
        let sub_categories = normalize_terms(&form.sub_category);

        let product = Product {
            id,
            title: form.title,
            price: form.price,
            category: form.category,
            height: form.height,
            width: form.width,
            depth: form.depth,
            stock: form.stock,
            main_image: Some(main_image_url),
            images: gallery_urls,
            details,
            sub_categories,
        };

        self.repository
            .create(NewProduct {
                id,
                title: product.title.clone(),
                price: product.price,
                category: product.category.clone(),
                height: product.height,
                width: product.width,
                depth: product.depth,
                stock: product.stock,
                main_image_url: product.main_image.clone(),
                gallery_urls: product.images.clone(),
                details: product.details.clone(),
                sub_categories: product.sub_categories.clone(),
            })
            .await?;

        tracing::info!(product_id = %id, "Created product aggregate");
        Ok(product)
    }

    /// Update a product aggregate in place.
    ///
    /// Scalar columns are overwritten; detail and sub-category sets are
    /// destructively replaced; a new main image upserts the cover row;
    /// gallery uploads only append.
    pub async fn update_product(
        &self,
        id: Uuid,
        form: ProductForm,
        main_image: Option<ImageUpload>,
        gallery: Vec<ImageUpload>,
    ) -> CatalogResult<()> {
        form.validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let main_image_url = match &main_image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };

        let mut new_gallery_urls = Vec::with_capacity(gallery.len());
        for upload in &gallery {
            new_gallery_urls.push(self.images.save(upload).await?);
        }

        let patch = ProductPatch {
            title: form.title,
            price: form.price,
            category: form.category,
            height: form.height,
            width: form.width,
            depth: form.depth,
            stock: form.stock,
            main_image_url,
            new_gallery_urls,
            details: normalize_terms(&form.details_items),
            sub_categories: normalize_terms(&form.sub_category),
        };

        let matched = self.repository.update(id, patch).await?;
        if !matched {
            return Err(CatalogError::ProductNotFound);
        }

        tracing::info!(product_id = %id, "Updated product aggregate");
        Ok(())
    }

    /// Delete a product aggregate, its child rows, and its image files.
    ///
    /// File removal happens first and is best-effort; a file that cannot
    /// be removed is logged and skipped, never a request failure.
    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        let urls = self.repository.image_urls(id).await?;

        for url in &urls {
            if let Err(e) = self.images.remove_by_url(url).await {
                tracing::warn!(url = %url, error = %e, "Failed to remove image file");
            }
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(CatalogError::ProductNotFound);
        }

        tracing::info!(product_id = %id, "Deleted product aggregate");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCatalogRepository, MockCatalogRepository};
    use crate::storage::ImageStoreConfig;
    use tempfile::TempDir;

    fn test_store(tmp: &TempDir) -> ImageStore {
        ImageStore::new(ImageStoreConfig {
            dir: tmp.path().to_path_buf(),
            public_url: "http://localhost:8080/images".to_string(),
        })
    }

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: Some(name.to_string()),
            data: vec![0xde, 0xad],
        }
    }

    fn form(title: &str) -> ProductForm {
        ProductForm {
            title: title.to_string(),
            price: 10.0,
            category: "tools".to_string(),
            details_items: vec!["220V, 50Hz".to_string(), " compact ".to_string()],
            sub_category: vec!["drills,accessories".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_product_normalizes_terms() {
        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), test_store(&tmp));

        let product = service
            .create_product(form("Drill"), Some(upload("main.jpg")), vec![])
            .await
            .unwrap();

        assert_eq!(product.details, vec!["220V", "50Hz", "compact"]);
        assert_eq!(product.sub_categories, vec!["drills", "accessories"]);
        assert!(product.main_image.is_some());
        assert!(product.images.is_empty());

        // Fetching returns the identical aggregate
        let fetched = service.get_product(product.id).await.unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn test_create_product_requires_main_image() {
        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), test_store(&tmp));

        let result = service.create_product(form("Drill"), None, vec![]).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_form() {
        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), test_store(&tmp));

        let result = service
            .create_product(form(""), Some(upload("main.jpg")), vec![])
            .await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_catalog_is_an_error() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_list().returning(|| Ok(vec![]));

        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(mock_repo, test_store(&tmp));

        let result = service.list_products().await;
        assert!(matches!(result, Err(CatalogError::NoProducts)));
    }

    #[tokio::test]
    async fn test_empty_category_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), test_store(&tmp));

        let result = service.products_by_category("climate").await;
        assert!(matches!(result, Err(CatalogError::EmptyCategory)));
    }

    #[tokio::test]
    async fn test_update_replaces_details_and_keeps_gallery() {
        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), test_store(&tmp));

        let created = service
            .create_product(
                form("Drill"),
                Some(upload("main.jpg")),
                vec![upload("g1.jpg")],
            )
            .await
            .unwrap();

        let mut update = form("Hammer drill");
        update.details_items = vec!["1000W".to_string()];
        service
            .update_product(created.id, update, None, vec![upload("g2.png")])
            .await
            .unwrap();

        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.title, "Hammer drill");
        assert_eq!(fetched.details, vec!["1000W"]);
        assert_eq!(fetched.images.len(), 2);
        assert_eq!(fetched.images[0], created.images[0]);
        assert_eq!(fetched.main_image, created.main_image);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), test_store(&tmp));

        let result = service
            .update_product(Uuid::now_v7(), form("Drill"), None, vec![])
            .await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound)));
    }

    #[tokio::test]
    async fn test_delete_removes_image_files() {
        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(InMemoryCatalogRepository::new(), test_store(&tmp));

        let created = service
            .create_product(
                form("Drill"),
                Some(upload("main.jpg")),
                vec![upload("g1.jpg")],
            )
            .await
            .unwrap();

        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);

        service.delete_product(created.id).await.unwrap();

        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
        let result = service.get_product(created.id).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let mut mock_repo = MockCatalogRepository::new();
        mock_repo.expect_image_urls().returning(|_| Ok(vec![]));
        mock_repo.expect_delete().returning(|_| Ok(false));

        let tmp = tempfile::tempdir().unwrap();
        let service = CatalogService::new(mock_repo, test_store(&tmp));

        let result = service.delete_product(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound)));
    }
}
