use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::{DomainError, DomainResult, Entity, RecordId, TenantId, UserId};

use crate::order::PurchaseOrderId;

/// Goods receipt identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoodsReceiptId(pub RecordId);

impl GoodsReceiptId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for GoodsReceiptId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One received line, pointing back at the order line it fulfils.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceiptLine {
    pub line_no: u32,
    /// The purchase order line this receipt line fulfils.
    pub order_line_no: u32,
    pub item_id: ItemId,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Immutable record that goods physically arrived.
///
/// Created exactly once per receiving event, atomically with its inventory
/// and purchase-order side effects. Never edited afterwards; corrections
/// would happen via new compensating documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    pub id: GoodsReceiptId,
    pub tenant_id: TenantId,
    pub number: String,
    pub purchase_order_id: PurchaseOrderId,
    pub location_id: LocationId,
    pub received_by: UserId,
    pub received_at: DateTime<Utc>,
    pub notes: Option<String>,
    lines: Vec<GoodsReceiptLine>,
}

impl GoodsReceipt {
    pub fn new(
        id: GoodsReceiptId,
        tenant_id: TenantId,
        number: impl Into<String>,
        purchase_order_id: PurchaseOrderId,
        location_id: LocationId,
        received_by: UserId,
        received_at: DateTime<Utc>,
        notes: Option<String>,
        lines: Vec<GoodsReceiptLine>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("receipt must have at least one line"));
        }
        for line in &lines {
            if line.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "receipt line {}: quantity must be positive",
                    line.line_no
                )));
            }
        }
        Ok(Self {
            id,
            tenant_id,
            number: number.into(),
            purchase_order_id,
            location_id,
            received_by,
            received_at,
            notes,
            lines,
        })
    }

    pub fn lines(&self) -> &[GoodsReceiptLine] {
        &self.lines
    }
}

impl Entity for GoodsReceipt {
    type Id = GoodsReceiptId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_receipt_is_rejected() {
        let err = GoodsReceipt::new(
            GoodsReceiptId::new(RecordId::new()),
            TenantId::new(),
            "GR-20250101-0001",
            PurchaseOrderId::new(RecordId::new()),
            LocationId::new(RecordId::new()),
            UserId::new(),
            Utc::now(),
            None,
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_line_quantity_is_rejected() {
        let err = GoodsReceipt::new(
            GoodsReceiptId::new(RecordId::new()),
            TenantId::new(),
            "GR-20250101-0002",
            PurchaseOrderId::new(RecordId::new()),
            LocationId::new(RecordId::new()),
            UserId::new(),
            Utc::now(),
            None,
            vec![GoodsReceiptLine {
                line_no: 1,
                order_line_no: 1,
                item_id: ItemId::new(RecordId::new()),
                quantity: 0,
                notes: None,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
