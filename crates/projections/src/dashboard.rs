use chrono::{DateTime, Utc};
use serde::Serialize;

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::{Actor, Money};
use stockbook_parties::{PartyId, PartyKind};
use stockbook_purchasing::PurchaseOrderStatus;
use stockbook_sales::{SalesOrderId, SalesOrderStatus};
use stockbook_store::{Database, StoreError};

/// An inventory record at or below its item's minimum stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockEntry {
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub on_hand: i64,
    pub min_stock_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub item_id: ItemId,
    pub name: String,
    pub sales_count: i64,
    pub sales_total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentCustomer {
    pub id: PartyId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentOrder {
    pub id: SalesOrderId,
    pub number: String,
    pub date: DateTime<Utc>,
    pub status: SalesOrderStatus,
    pub total: Money,
}

/// Everything the dashboard screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub item_count: usize,
    /// Σ on_hand × cost_price over all records; negative on-hand counts as
    /// zero value, not negative value.
    pub inventory_value: Money,
    /// Up to five records at or below minimum stock, lowest on-hand first.
    pub low_stock: Vec<LowStockEntry>,
    /// Up to five items by units sold, descending.
    pub top_items: Vec<TopItem>,
    pub sales_order_count: usize,
    /// Σ order totals, cancelled orders excluded.
    pub sales_total: Money,
    pub purchase_order_count: usize,
    /// Σ order totals, cancelled orders excluded.
    pub purchase_total: Money,
    /// Up to five newest customers.
    pub recent_customers: Vec<RecentCustomer>,
    /// Up to five newest sales orders.
    pub recent_orders: Vec<RecentOrder>,
}

/// Sum in minor units, clamping instead of failing: a dashboard figure that
/// saturates is more useful than a dashboard that errors.
fn accumulate(total: Money, amount: Money) -> Money {
    Money::from_minor(total.minor().saturating_add(amount.minor()))
}

pub fn dashboard_summary(db: &Database, actor: &Actor) -> Result<DashboardSummary, StoreError> {
    db.read(actor.tenant_id, |state| {
        let mut inventory_value = Money::ZERO;
        let mut low_stock = Vec::new();
        for record in state.inventory.values() {
            let Ok(item) = state.item(record.key.item_id) else {
                continue;
            };
            if record.on_hand > 0 {
                let value = record.on_hand.saturating_mul(item.cost_price.minor());
                inventory_value = accumulate(inventory_value, Money::from_minor(value));
            }
            if record.on_hand <= item.min_stock_level {
                low_stock.push(LowStockEntry {
                    item_id: record.key.item_id,
                    location_id: record.key.location_id,
                    on_hand: record.on_hand,
                    min_stock_level: item.min_stock_level,
                });
            }
        }
        low_stock.sort_by_key(|e| (e.on_hand, e.item_id, e.location_id));
        low_stock.truncate(5);

        let mut top_items: Vec<TopItem> = state
            .items
            .values()
            .filter(|item| item.sales.sales_count > 0)
            .map(|item| TopItem {
                item_id: item.id,
                name: item.name.clone(),
                sales_count: item.sales.sales_count,
                sales_total: item.sales.sales_total,
            })
            .collect();
        top_items.sort_by_key(|t| (std::cmp::Reverse(t.sales_count), t.item_id));
        top_items.truncate(5);

        let mut sales_total = Money::ZERO;
        for order in state.sales_orders.values() {
            if order.status != SalesOrderStatus::Cancelled {
                sales_total = accumulate(sales_total, order.totals.total);
            }
        }
        let mut purchase_total = Money::ZERO;
        for order in state.purchase_orders.values() {
            if order.status != PurchaseOrderStatus::Cancelled {
                purchase_total = accumulate(purchase_total, order.total);
            }
        }

        let mut recent_customers: Vec<RecentCustomer> = state
            .parties
            .values()
            .filter(|p| p.kind == PartyKind::Customer)
            .map(|p| RecentCustomer {
                id: p.id,
                name: p.name.clone(),
                created_at: p.created_at,
            })
            .collect();
        recent_customers.sort_by_key(|c| (std::cmp::Reverse(c.created_at), c.id));
        recent_customers.truncate(5);

        let mut recent_orders: Vec<RecentOrder> = state
            .sales_orders
            .values()
            .map(|o| RecentOrder {
                id: o.id,
                number: o.number.clone(),
                date: o.date,
                status: o.status,
                total: o.totals.total,
            })
            .collect();
        recent_orders.sort_by_key(|o| std::cmp::Reverse(o.date));
        recent_orders.truncate(5);

        DashboardSummary {
            item_count: state.items.len(),
            inventory_value,
            low_stock,
            top_items,
            sales_order_count: state.sales_orders.len(),
            sales_total,
            purchase_order_count: state.purchase_orders.len(),
            purchase_total,
            recent_customers,
            recent_orders,
        }
    })
}
