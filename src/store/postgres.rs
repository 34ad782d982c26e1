use async_trait::async_trait;
use sqlx::PgPool;

use super::{NewProduct, ProductReplacement, ProductStore, StoreError, parse_id};
use crate::{
    models::{DeleteAck, Product, ProductFields, ProductGroup, SortField, UpdateAck},
    queries::product_queries,
};

#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        product_queries::ping(&self.pool).await?;
        Ok(())
    }

    async fn find(&self, sort: SortField) -> Result<Vec<Product>, StoreError> {
        Ok(product_queries::find_all(&self.pool, sort).await?)
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let new = NewProduct::try_from(fields)?;

        product_queries::insert(&self.pool, &new)
            .await
            .map_err(|e| StoreError::from_write(e, &new.item))
    }

    async fn update_one(&self, id: &str, fields: ProductFields) -> Result<UpdateAck, StoreError> {
        let id = parse_id(id)?;
        let replacement = ProductReplacement::from(fields);

        let (matched, modified) = product_queries::replace(&self.pool, id, &replacement)
            .await
            .map_err(|e| StoreError::from_write(e, replacement.item.as_deref().unwrap_or_default()))?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: matched as u64,
            modified_count: modified as u64,
        })
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteAck, StoreError> {
        let id = parse_id(id)?;
        let deleted = product_queries::delete(&self.pool, id).await?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn aggregate_by_item(&self) -> Result<Vec<ProductGroup>, StoreError> {
        Ok(product_queries::group_by_item(&self.pool).await?)
    }
}
