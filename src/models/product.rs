use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub item: String,
    pub price: f64,
    pub quantity: i64,
    pub about: String,
}

/// Write payload for create and update. Every field is optional here; the
/// store decides which ones are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFields {
    pub item: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub about: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub sortby: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Item,
    Price,
    Quantity,
    About,
    #[default]
    Unsorted,
}

impl SortField {
    /// Only the four exact field names select an ordering.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("item") => SortField::Item,
            Some("price") => SortField::Price,
            Some("quantity") => SortField::Quantity,
            Some("about") => SortField::About,
            _ => SortField::Unsorted,
        }
    }

    pub fn column(self) -> Option<&'static str> {
        match self {
            SortField::Item => Some("item"),
            SortField::Price => Some("price"),
            SortField::Quantity => Some("quantity"),
            SortField::About => Some("about"),
            SortField::Unsorted => None,
        }
    }

    /// Ascending comparison on the selected field. `Unsorted` treats every
    /// pair as equal so a stable sort keeps store order.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Item => a.item.cmp(&b.item),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
            SortField::About => a.about.cmp(&b.about),
            SortField::Unsorted => Ordering::Equal,
        }
    }

    pub fn sort(self, products: &mut [Product]) {
        if self != SortField::Unsorted {
            products.sort_by(|a, b| self.compare(a, b));
        }
    }
}

impl From<ProductQuery> for SortField {
    fn from(query: ProductQuery) -> Self {
        SortField::parse(query.sortby.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
