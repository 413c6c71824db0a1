//! Posting request payloads, as they arrive from forms or the POS screen.
//!
//! Monetary figures on a POS sale are caller-supplied claims; the engine
//! recomputes everything from the lines and rejects mismatches rather than
//! persisting client arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::{Money, TaxRate};
use stockbook_inventory::AdjustmentReason;
use stockbook_parties::PartyId;
use stockbook_purchasing::PurchaseOrderId;
use stockbook_sales::PaymentMethod;

/// One line of a goods receipt request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLineInput {
    /// The purchase order line being fulfilled.
    pub order_line_no: u32,
    pub item_id: ItemId,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Request to post a goods receipt against a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptInput {
    pub purchase_order_id: PurchaseOrderId,
    pub location_id: LocationId,
    pub notes: Option<String>,
    pub lines: Vec<ReceiptLineInput>,
}

/// Caller-claimed header totals on a POS sale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedTotals {
    pub subtotal: Money,
    pub tax_total: Money,
    pub shipping: Money,
    pub discount: Money,
    pub total: Money,
}

/// One line of a POS sale request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosLineInput {
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
    /// Caller-claimed; checked against the recomputed value.
    pub tax_amount: Money,
    pub discount: Money,
    /// Caller-claimed; checked against the recomputed value.
    pub line_total: Money,
    pub serial_numbers: Vec<String>,
}

/// Request to post a point-of-sale sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosSaleInput {
    pub date: DateTime<Utc>,
    /// Absent for anonymous walk-in customers.
    pub customer_id: Option<PartyId>,
    pub location_id: LocationId,
    pub payment_method: Option<PaymentMethod>,
    pub totals: ClaimedTotals,
    pub notes: Option<String>,
    pub lines: Vec<PosLineInput>,
}

/// One line of a stock transfer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLineInput {
    pub item_id: ItemId,
    pub quantity: i64,
}

/// Request to move stock between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInput {
    pub from_location_id: LocationId,
    pub to_location_id: LocationId,
    pub notes: Option<String>,
    pub lines: Vec<TransferLineInput>,
}

/// Request to correct on-hand stock at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentInput {
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub delta: i64,
    pub reason: AdjustmentReason,
    pub notes: Option<String>,
}
