use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::Item;
use stockbook_core::Money;

/// Uniform response envelope; exactly one of `data`/`error` is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// `?page=` / `?limit=` query parameters.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    /// Slice one page out of a fully sorted result set.
    pub fn slice<T>(&self, mut all: Vec<T>) -> Vec<T> {
        let page = self.page.max(1);
        let start = (page - 1).saturating_mul(self.limit);
        if start >= all.len() {
            return Vec::new();
        }
        let mut tail = all.split_off(start);
        tail.truncate(self.limit);
        tail
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub cost_price: Money,
    pub unit_price: Money,
    pub tax_rate_bp: u16,
    pub min_stock_level: i64,
    pub sales_count: i64,
    pub sales_total: Money,
    pub created_at: DateTime<Utc>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            sku: item.sku.clone(),
            name: item.name.clone(),
            cost_price: item.cost_price,
            unit_price: item.unit_price,
            tax_rate_bp: item.tax_rate.basis_points(),
            min_stock_level: item.min_stock_level,
            sales_count: item.sales.sales_count,
            sales_total: item.sales.sales_total,
            created_at: item.created_at,
        }
    }
}
