mod memory;
mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{DeleteAck, Product, ProductFields, ProductGroup, SortField, UpdateAck};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Path `{0}` is required.")]
    MissingField(&'static str),
    #[error("Duplicate item: '{0}' already exists")]
    DuplicateItem(String),
    #[error("Invalid product id: '{0}'")]
    InvalidId(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::MissingField(_) => "ValidationError",
            StoreError::DuplicateItem(_) => "DuplicateKeyError",
            StoreError::InvalidId(_) => "CastError",
            StoreError::Unavailable(_) => "StoreUnavailableError",
            StoreError::Database(_) => "DatabaseError",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "name": self.kind(),
            "message": self.to_string(),
        });

        match self {
            StoreError::MissingField(field) => body["field"] = json!(field),
            StoreError::DuplicateItem(item) => body["item"] = json!(item),
            StoreError::InvalidId(id) => body["value"] = json!(id),
            _ => {}
        }

        body
    }

    /// Classifies a failed write, naming the item on unique violations.
    pub(crate) fn from_write(err: sqlx::Error, item: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::DuplicateItem(item.to_string());
            }
        }

        StoreError::from(err)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let unreachable = matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
        );

        if unreachable {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Database(err)
        }
    }
}

/// A product write that satisfies the required-field contract.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub item: String,
    pub price: f64,
    pub quantity: i64,
    pub about: String,
}

impl TryFrom<ProductFields> for NewProduct {
    type Error = StoreError;

    fn try_from(fields: ProductFields) -> Result<Self, Self::Error> {
        Ok(NewProduct {
            item: fields.item.ok_or(StoreError::MissingField("item"))?,
            price: fields.price.ok_or(StoreError::MissingField("price"))?,
            quantity: fields.quantity.ok_or(StoreError::MissingField("quantity"))?,
            about: fields.about.unwrap_or_default(),
        })
    }
}

/// Values written by an update. Omitted `item`, `price` and `quantity`
/// keep what is stored; an omitted `about` is written as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductReplacement {
    pub item: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub about: String,
}

impl From<ProductFields> for ProductReplacement {
    fn from(fields: ProductFields) -> Self {
        ProductReplacement {
            item: fields.item,
            price: fields.price,
            quantity: fields.quantity,
            about: fields.about.unwrap_or_default(),
        }
    }
}

impl ProductReplacement {
    /// Writes the replacement into `product`, returning whether anything changed.
    pub fn apply(self, product: &mut Product) -> bool {
        let before = product.clone();

        if let Some(item) = self.item {
            product.item = item;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        product.about = self.about;

        *product != before
    }
}

pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Persistent product collection.
///
/// Implementations enforce the product schema themselves: required
/// fields, unique `item`, and identifier syntax.
#[async_trait]
pub trait ProductStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    /// All products, ascending by `sort` or in insertion order.
    async fn find(&self, sort: SortField) -> Result<Vec<Product>, StoreError>;

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError>;

    /// Writes all four fields of the product with `id`. A missing product
    /// is acknowledged with `matched_count == 0`.
    async fn update_one(&self, id: &str, fields: ProductFields) -> Result<UpdateAck, StoreError>;

    async fn delete_one(&self, id: &str) -> Result<DeleteAck, StoreError>;

    /// Per-item totals in order of first appearance.
    async fn aggregate_by_item(&self) -> Result<Vec<ProductGroup>, StoreError>;
}
