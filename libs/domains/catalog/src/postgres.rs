//! Postgres implementation of [`CatalogRepository`].
//!
//! Reads follow a deliberate two-phase pattern: one query for the product
//! rows, then one query per child table filtered by the full set of
//! product IDs. Writes wrap every cross-table statement in a single
//! transaction so concurrent readers observe either a full aggregate or
//! none of it.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity::{detail, gallery_image, main_image, product, sub_category},
    error::CatalogResult,
    models::{NewProduct, Product, ProductPatch},
    repository::CatalogRepository,
};

pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assemble aggregates for a batch of product rows.
    ///
    /// Children are fetched once per table for the whole batch and grouped
    /// by product ID, ordered by row ID so insertion order is preserved.
    async fn assemble<C: ConnectionTrait>(
        db: &C,
        rows: Vec<product::Model>,
    ) -> CatalogResult<Vec<Product>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = rows.iter().map(|m| m.id).collect();

        let mut details: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in detail::Entity::find()
            .filter(detail::Column::ProductId.is_in(ids.clone()))
            .order_by_asc(detail::Column::Id)
            .all(db)
            .await?
        {
            details.entry(row.product_id).or_default().push(row.detail_text);
        }

        let mut sub_categories: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in sub_category::Entity::find()
            .filter(sub_category::Column::ProductId.is_in(ids.clone()))
            .order_by_asc(sub_category::Column::Id)
            .all(db)
            .await?
        {
            sub_categories.entry(row.product_id).or_default().push(row.name);
        }

        let mut main_images: HashMap<Uuid, String> = HashMap::new();
        for row in main_image::Entity::find()
            .filter(main_image::Column::ProductId.is_in(ids.clone()))
            .all(db)
            .await?
        {
            main_images.insert(row.product_id, row.url);
        }

        let mut galleries: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in gallery_image::Entity::find()
            .filter(gallery_image::Column::ProductId.is_in(ids))
            .order_by_asc(gallery_image::Column::Id)
            .all(db)
            .await?
        {
            galleries.entry(row.product_id).or_default().push(row.url);
        }

        Ok(rows
            .into_iter()
            .map(|row| Product {
                main_image: main_images.remove(&row.id),
                images: galleries.remove(&row.id).unwrap_or_default(),
                details: details.remove(&row.id).unwrap_or_default(),
                sub_categories: sub_categories.remove(&row.id).unwrap_or_default(),
                id: row.id,
                title: row.title,
                price: row.price,
                category: row.category,
                height: row.height,
                width: row.width,
                depth: row.depth,
                stock: row.stock,
            })
            .collect())
    }

    async fn assemble_one<C: ConnectionTrait>(
        db: &C,
        row: Option<product::Model>,
    ) -> CatalogResult<Option<Product>> {
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Self::assemble(db, vec![row]).await?.into_iter().next())
    }
}

fn detail_rows(product_id: Uuid, details: &[String]) -> Vec<detail::ActiveModel> {
    details
        .iter()
        .map(|text| detail::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(product_id),
            detail_text: Set(text.clone()),
        })
        .collect()
}

fn sub_category_rows(product_id: Uuid, names: &[String]) -> Vec<sub_category::ActiveModel> {
    names
        .iter()
        .map(|name| sub_category::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(product_id),
            name: Set(name.clone()),
        })
        .collect()
}

fn gallery_rows(product_id: Uuid, urls: &[String]) -> Vec<gallery_image::ActiveModel> {
    urls.iter()
        .map(|url| gallery_image::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(product_id),
            url: Set(url.clone()),
        })
        .collect()
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list(&self) -> CatalogResult<Vec<Product>> {
        let rows = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        Self::assemble(&self.db, rows).await
    }

    async fn get(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let row = product::Entity::find_by_id(id).one(&self.db).await?;
        Self::assemble_one(&self.db, row).await
    }

    async fn list_by_category(&self, category: &str) -> CatalogResult<Vec<Product>> {
        let rows = product::Entity::find()
            .filter(product::Column::Category.eq(category))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        Self::assemble(&self.db, rows).await
    }

    async fn get_in_category(&self, category: &str, id: Uuid) -> CatalogResult<Option<Product>> {
        let row = product::Entity::find()
            .filter(product::Column::Category.eq(category))
            .filter(product::Column::Id.eq(id))
            .one(&self.db)
            .await?;

        Self::assemble_one(&self.db, row).await
    }

    async fn create(&self, input: NewProduct) -> CatalogResult<()> {
        let txn = self.db.begin().await?;

        product::Entity::insert(product::ActiveModel {
            id: Set(input.id),
            title: Set(input.title),
            price: Set(input.price),
            category: Set(input.category),
            height: Set(input.height),
            width: Set(input.width),
            depth: Set(input.depth),
            stock: Set(input.stock),
        })
        .exec(&txn)
        .await?;

        let details = detail_rows(input.id, &input.details);
        if !details.is_empty() {
            detail::Entity::insert_many(details).exec(&txn).await?;
        }

        let sub_categories = sub_category_rows(input.id, &input.sub_categories);
        if !sub_categories.is_empty() {
            sub_category::Entity::insert_many(sub_categories)
                .exec(&txn)
                .await?;
        }

        if let Some(url) = input.main_image_url {
            main_image::Entity::insert(main_image::ActiveModel {
                id: Set(Uuid::now_v7()),
                product_id: Set(input.id),
                url: Set(url),
            })
            .exec(&txn)
            .await?;
        }

        let gallery = gallery_rows(input.id, &input.gallery_urls);
        if !gallery.is_empty() {
            gallery_image::Entity::insert_many(gallery).exec(&txn).await?;
        }

        txn.commit().await?;

        tracing::info!(product_id = %input.id, "Created product");
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> CatalogResult<bool> {
        let txn = self.db.begin().await?;

        let result = product::Entity::update_many()
            .set(product::ActiveModel {
                title: Set(patch.title),
                price: Set(patch.price),
                category: Set(patch.category),
                height: Set(patch.height),
                width: Set(patch.width),
                depth: Set(patch.depth),
                stock: Set(patch.stock),
                ..Default::default()
            })
            .filter(product::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        // Destructive set-replace for details and sub-categories
        detail::Entity::delete_many()
            .filter(detail::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        let details = detail_rows(id, &patch.details);
        if !details.is_empty() {
            detail::Entity::insert_many(details).exec(&txn).await?;
        }

        sub_category::Entity::delete_many()
            .filter(sub_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        let sub_categories = sub_category_rows(id, &patch.sub_categories);
        if !sub_categories.is_empty() {
            sub_category::Entity::insert_many(sub_categories)
                .exec(&txn)
                .await?;
        }

        // One main-image row per product; a second write overwrites the URL
        if let Some(url) = patch.main_image_url {
            main_image::Entity::insert(main_image::ActiveModel {
                id: Set(Uuid::now_v7()),
                product_id: Set(id),
                url: Set(url),
            })
            .on_conflict(
                OnConflict::column(main_image::Column::ProductId)
                    .update_column(main_image::Column::Url)
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
        }

        // Gallery rows are append-only; existing entries are never touched
        let gallery = gallery_rows(id, &patch.new_gallery_urls);
        if !gallery.is_empty() {
            gallery_image::Entity::insert_many(gallery).exec(&txn).await?;
        }

        txn.commit().await?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let txn = self.db.begin().await?;

        // Children first so referential constraints hold
        detail::Entity::delete_many()
            .filter(detail::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        sub_category::Entity::delete_many()
            .filter(sub_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        gallery_image::Entity::delete_many()
            .filter(gallery_image::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        main_image::Entity::delete_many()
            .filter(main_image::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;

        let result = product::Entity::delete_many()
            .filter(product::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;

        tracing::info!(product_id = %id, "Deleted product");
        Ok(true)
    }

    async fn image_urls(&self, id: Uuid) -> CatalogResult<Vec<String>> {
        let mut urls: Vec<String> = gallery_image::Entity::find()
            .filter(gallery_image::Column::ProductId.eq(id))
            .order_by_asc(gallery_image::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.url)
            .collect();

        if let Some(main) = main_image::Entity::find()
            .filter(main_image::Column::ProductId.eq(id))
            .one(&self.db)
            .await?
        {
            urls.push(main.url);
        }

        Ok(urls)
    }
}
