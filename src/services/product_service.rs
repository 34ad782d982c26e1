use std::sync::Arc;

use crate::{
    models::{DeleteAck, Product, ProductFields, Report, SortField, UpdateAck},
    store::{ProductStore, StoreError},
};

/// Product operations over an injected store.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn backend_tag(&self) -> &'static str {
        self.store.backend_tag()
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn list(&self, sort: SortField) -> Result<Vec<Product>, StoreError> {
        tracing::debug!(?sort, "Listing products");
        self.store.find(sort).await
    }

    pub async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        tracing::debug!(item = ?fields.item, "Creating product");
        let product = self.store.create(fields).await?;
        tracing::info!(id = %product.id, item = %product.item, "Product created");
        Ok(product)
    }

    /// Full replace: fields left out of `fields` are not carried over from
    /// the stored product.
    pub async fn update(&self, id: &str, fields: ProductFields) -> Result<UpdateAck, StoreError> {
        tracing::debug!(id, item = ?fields.item, "Updating product");
        self.store.update_one(id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck, StoreError> {
        tracing::debug!(id, "Deleting product");
        self.store.delete_one(id).await
    }

    pub async fn report(&self) -> Result<Option<Report>, StoreError> {
        tracing::debug!("Building product report");
        let groups = self.store.aggregate_by_item().await?;
        Ok(Report::collapse(groups))
    }
}
