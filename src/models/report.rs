use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Product;

/// Totals for every product sharing one `item` name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductGroup {
    #[serde(rename = "_id")]
    pub item: String,
    pub quantity: i64,
    pub productvalue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    pub products: Vec<ProductGroup>,
    pub allproductsvalue: f64,
}

impl ProductGroup {
    /// Groups products by `item`, summing quantity and price × quantity.
    /// Groups come out in the order their item first appears.
    pub fn group_by_item(products: &[Product]) -> Vec<ProductGroup> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<ProductGroup> = Vec::new();

        for product in products {
            let value = product.price * product.quantity as f64;
            match index.get(product.item.as_str()) {
                Some(&i) => {
                    groups[i].quantity = groups[i].quantity.saturating_add(product.quantity);
                    groups[i].productvalue += value;
                }
                None => {
                    index.insert(product.item.as_str(), groups.len());
                    groups.push(ProductGroup {
                        item: product.item.clone(),
                        quantity: product.quantity,
                        productvalue: value,
                    });
                }
            }
        }

        groups
    }
}

impl Report {
    pub const ID: &'static str = "report";

    /// Folds per-item groups into the single report record. Groups keep
    /// the order they were emitted in. No groups means no report.
    pub fn collapse(groups: Vec<ProductGroup>) -> Option<Report> {
        if groups.is_empty() {
            return None;
        }

        let allproductsvalue = groups.iter().map(|g| g.productvalue).sum();

        Some(Report {
            id: Self::ID.to_string(),
            products: groups,
            allproductsvalue,
        })
    }
}
