use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewProduct, ProductReplacement, ProductStore, StoreError, parse_id};
use crate::models::{DeleteAck, Product, ProductFields, ProductGroup, SortField, UpdateAck};

/// In-process product collection. Products are kept in insertion order.
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
    available: AtomicBool,
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends products as-is, skipping the uniqueness check.
    pub async fn seed(&self, products: impl IntoIterator<Item = Product>) {
        self.products.write().await.extend(products);
    }

    /// While unavailable every operation fails as if the connection were down.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn find(&self, sort: SortField) -> Result<Vec<Product>, StoreError> {
        self.check_available()?;
        let mut products = self.products.read().await.clone();
        sort.sort(&mut products);
        Ok(products)
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        self.check_available()?;
        let new = NewProduct::try_from(fields)?;

        let mut products = self.products.write().await;
        if products.iter().any(|p| p.item == new.item) {
            return Err(StoreError::DuplicateItem(new.item));
        }

        let product = Product {
            id: Uuid::new_v4(),
            item: new.item,
            price: new.price,
            quantity: new.quantity,
            about: new.about,
        };
        products.push(product.clone());

        Ok(product)
    }

    async fn update_one(&self, id: &str, fields: ProductFields) -> Result<UpdateAck, StoreError> {
        self.check_available()?;
        let id = parse_id(id)?;
        let replacement = ProductReplacement::from(fields);

        let mut products = self.products.write().await;
        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
            });
        };

        if let Some(item) = &replacement.item {
            if products.iter().any(|p| p.id != id && &p.item == item) {
                return Err(StoreError::DuplicateItem(item.clone()));
            }
        }

        let modified = replacement.apply(&mut products[index]);

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteAck, StoreError> {
        self.check_available()?;
        let id = parse_id(id)?;

        let mut products = self.products.write().await;
        let before = products.len();
        if let Some(index) = products.iter().position(|p| p.id == id) {
            products.remove(index);
        }

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - products.len()) as u64,
        })
    }

    async fn aggregate_by_item(&self) -> Result<Vec<ProductGroup>, StoreError> {
        self.check_available()?;
        let products = self.products.read().await;
        Ok(ProductGroup::group_by_item(&products))
    }
}
