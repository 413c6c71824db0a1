use std::collections::HashMap;

use stockbook_catalog::{Item, ItemId, Location, LocationId};
use stockbook_core::{DomainError, DomainResult};
use stockbook_inventory::{InventoryRecord, MovementId, StockAdjustment, StockKey, StockTransfer};
use stockbook_parties::{Party, PartyId};
use stockbook_purchasing::{GoodsReceipt, GoodsReceiptId, PurchaseOrder, PurchaseOrderId};
use stockbook_sales::{SalesOrder, SalesOrderId};

/// Everything one tenant owns. The whole slice is the unit of transactional
/// copy-on-write in [`crate::Database`].
#[derive(Debug, Clone, Default)]
pub struct TenantState {
    pub items: HashMap<ItemId, Item>,
    pub locations: HashMap<LocationId, Location>,
    pub parties: HashMap<PartyId, Party>,
    pub inventory: HashMap<StockKey, InventoryRecord>,
    pub purchase_orders: HashMap<PurchaseOrderId, PurchaseOrder>,
    pub sales_orders: HashMap<SalesOrderId, SalesOrder>,
    pub receipts: HashMap<GoodsReceiptId, GoodsReceipt>,
    pub transfers: HashMap<MovementId, StockTransfer>,
    pub adjustments: HashMap<MovementId, StockAdjustment>,
}

impl TenantState {
    pub fn item(&self, id: ItemId) -> DomainResult<&Item> {
        self.items.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn item_mut(&mut self, id: ItemId) -> DomainResult<&mut Item> {
        self.items.get_mut(&id).ok_or(DomainError::NotFound)
    }

    pub fn location(&self, id: LocationId) -> DomainResult<&Location> {
        self.locations.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn party(&self, id: PartyId) -> DomainResult<&Party> {
        self.parties.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn purchase_order(&self, id: PurchaseOrderId) -> DomainResult<&PurchaseOrder> {
        self.purchase_orders.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn purchase_order_mut(&mut self, id: PurchaseOrderId) -> DomainResult<&mut PurchaseOrder> {
        self.purchase_orders.get_mut(&id).ok_or(DomainError::NotFound)
    }

    pub fn sales_order(&self, id: SalesOrderId) -> DomainResult<&SalesOrder> {
        self.sales_orders.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn stock(&self, key: &StockKey) -> Option<&InventoryRecord> {
        self.inventory.get(key)
    }

    /// Existing record or a zero-initialized one, created lazily. The
    /// (item, location) uniqueness invariant lives here: there is exactly one
    /// map entry per key.
    pub fn stock_mut_or_create(
        &mut self,
        key: StockKey,
        at: chrono::DateTime<chrono::Utc>,
    ) -> &mut InventoryRecord {
        self.inventory
            .entry(key)
            .or_insert_with(|| InventoryRecord::empty(key, at))
    }
}
