use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use shelf_core::domain::product::{Product, ProductDraft, ProductId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product `{0}` not found")]
    NotFound(ProductId),
}

/// The authoritative holder of all product records.
///
/// Every operation is a single transaction against the collection; callers
/// receive owned copies and never retain references into the store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All products in insertion order.
    async fn list(&self) -> Vec<Product>;

    /// Linear scan by id.
    async fn find_by_id(&self, id: ProductId) -> Option<Product>;

    /// Assigns a fresh id and creation timestamp, appends, and returns the
    /// stored record.
    async fn insert(&self, draft: ProductDraft) -> Product;

    /// Overwrites name, description, and price in place. Id and creation
    /// timestamp never change.
    async fn update_fields(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError>;

    async fn remove(&self, id: ProductId) -> Result<(), CatalogError>;
}

/// In-memory catalog. The lock is held for the whole of each operation, so
/// id assignment and append happen under one write guard and concurrent
/// creates cannot observe the same maximum.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products) }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    async fn find_by_id(&self, id: ProductId) -> Option<Product> {
        let products = self.products.read().await;
        products.iter().find(|product| product.id == id).cloned()
    }

    async fn insert(&self, draft: ProductDraft) -> Product {
        let mut products = self.products.write().await;
        // max + 1; an empty catalog starts the sequence at 1.
        let next_id = products.iter().map(|product| product.id.0).max().unwrap_or(0) + 1;

        let product = Product {
            id: ProductId(next_id),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            created_at: Utc::now(),
        };
        products.push(product.clone());
        product
    }

    async fn update_fields(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        product.name = draft.name;
        product.description = draft.description;
        product.price = draft.price;
        Ok(product.clone())
    }

    async fn remove(&self, id: ProductId) -> Result<(), CatalogError> {
        let mut products = self.products.write().await;
        let position = products
            .iter()
            .position(|product| product.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        products.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use shelf_core::domain::product::{ProductDraft, ProductId};

    use super::{CatalogError, CatalogStore, InMemoryCatalog};
    use crate::seed::demo_products;

    fn draft(name: &str, description: &str, price: Decimal) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: description.to_string(),
            price,
        }
    }

    #[tokio::test]
    async fn insert_assigns_next_id_after_seed() {
        let catalog = InMemoryCatalog::with_products(demo_products(Utc::now()));
        let before = Utc::now();

        let created = catalog.insert(draft("Webcam", "HD", Decimal::new(4999, 2))).await;

        assert_eq!(created.id, ProductId(5));
        assert!(created.created_at >= before);

        let found = catalog.find_by_id(ProductId(5)).await.expect("created product is retrievable");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn insert_into_empty_catalog_starts_at_one() {
        let catalog = InMemoryCatalog::new();

        let created = catalog.insert(draft("Webcam", "HD", Decimal::new(4999, 2))).await;

        assert_eq!(created.id, ProductId(1));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_removing_the_latest() {
        let catalog = InMemoryCatalog::with_products(demo_products(Utc::now()));

        let created = catalog.insert(draft("Webcam", "HD", Decimal::new(4999, 2))).await;
        catalog.remove(created.id).await.expect("remove created product");

        // The maximum live id is 4 again, so max + 1 re-mints 5.
        let next = catalog.insert(draft("Headset", "USB headset", Decimal::new(1999, 2))).await;
        assert_eq!(next.id, ProductId(5));
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_preserves_identity() {
        let catalog = InMemoryCatalog::with_products(demo_products(Utc::now()));
        let original = catalog.find_by_id(ProductId(2)).await.expect("seed product 2");

        let updated = catalog
            .update_fields(ProductId(2), draft("Wireless Mouse Pro", "Wireless mouse", Decimal::new(3499, 2)))
            .await
            .expect("update succeeds");

        assert_eq!(updated.id, ProductId(2));
        assert_eq!(updated.name, "Wireless Mouse Pro");
        assert_eq!(updated.price, Decimal::new(3499, 2));
        assert_eq!(updated.created_at, original.created_at);

        let found = catalog.find_by_id(ProductId(2)).await.expect("still present");
        assert_eq!(found, updated);
    }

    #[tokio::test]
    async fn update_does_not_change_list_order() {
        let catalog = InMemoryCatalog::with_products(demo_products(Utc::now()));

        catalog
            .update_fields(ProductId(2), draft("Wireless Mouse Pro", "Wireless mouse", Decimal::new(3499, 2)))
            .await
            .expect("update succeeds");

        let ids: Vec<i64> = catalog.list().await.iter().map(|product| product.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one_record() {
        let catalog = InMemoryCatalog::with_products(demo_products(Utc::now()));

        catalog.remove(ProductId(3)).await.expect("remove succeeds");

        let products = catalog.list().await;
        assert_eq!(products.len(), 3);
        assert!(catalog.find_by_id(ProductId(3)).await.is_none());
        assert!(products.iter().all(|product| product.id != ProductId(3)));
    }

    #[tokio::test]
    async fn absent_ids_surface_not_found() {
        let catalog = InMemoryCatalog::with_products(demo_products(Utc::now()));

        assert!(catalog.find_by_id(ProductId(99)).await.is_none());
        assert_eq!(
            catalog
                .update_fields(ProductId(99), draft("X", "Y", Decimal::ZERO))
                .await
                .expect_err("update of absent id fails"),
            CatalogError::NotFound(ProductId(99)),
        );
        assert_eq!(
            catalog.remove(ProductId(99)).await.expect_err("remove of absent id fails"),
            CatalogError::NotFound(ProductId(99)),
        );
    }
}
