use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, Entity, Money, RecordId, TaxRate, TenantId};

/// Item identifier (tenant-scoped via the owning record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub RecordId);

impl ItemId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Derived sales bookkeeping on an item.
///
/// Maintained incrementally by sale postings inside the posting transaction;
/// always equals the sum of all postings that touched the item.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesAggregates {
    pub sales_count: i64,
    pub sales_total: Money,
}

impl SalesAggregates {
    pub fn record_sale(&mut self, quantity: i64, line_total: Money) -> DomainResult<()> {
        self.sales_count = self
            .sales_count
            .checked_add(quantity)
            .ok_or_else(|| DomainError::invariant("sales_count overflow"))?;
        self.sales_total = self.sales_total.checked_add(line_total)?;
        Ok(())
    }
}

/// Catalog entity: a sellable/stockable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub tenant_id: TenantId,
    pub sku: String,
    pub name: String,
    /// Acquisition cost per unit, used for inventory valuation.
    pub cost_price: Money,
    /// Default selling price per unit.
    pub unit_price: Money,
    pub tax_rate: TaxRate,
    /// Threshold below which the item shows up in low-stock views.
    pub min_stock_level: i64,
    pub sales: SalesAggregates,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn new(
        id: ItemId,
        tenant_id: TenantId,
        sku: impl Into<String>,
        name: impl Into<String>,
        cost_price: Money,
        unit_price: Money,
        tax_rate: TaxRate,
        min_stock_level: i64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();

        if sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if cost_price.is_negative() || unit_price.is_negative() {
            return Err(DomainError::validation("prices cannot be negative"));
        }
        if min_stock_level < 0 {
            return Err(DomainError::validation("min stock level cannot be negative"));
        }

        Ok(Self {
            id,
            tenant_id,
            sku,
            name,
            cost_price,
            unit_price,
            tax_rate,
            min_stock_level,
            sales: SalesAggregates::default(),
            created_at,
        })
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
