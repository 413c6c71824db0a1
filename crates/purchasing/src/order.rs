use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::{DomainError, DomainResult, Entity, Money, RecordId, TaxRate, TenantId, UserId};
use stockbook_parties::PartyId;

/// Purchase order identifier (tenant-scoped via the owning record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(pub RecordId);

impl PurchaseOrderId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PurchaseOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Purchase order status lifecycle.
///
/// `Received` and `Cancelled` are terminal. The receiving states are never
/// set directly by callers; they are derived from line counters after a
/// receipt posts (all lines full ⇒ `Received`, anything received ⇒
/// `PartiallyReceived`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Draft,
    Submitted,
    PartiallyReceived,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Received | Self::Cancelled)
    }
}

/// Purchase order line. Quantity and price are immutable after submission;
/// only `received_quantity` moves, and only through a receipt posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub line_no: u32,
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub line_total: Money,
    /// Cumulative quantity received against this line so far.
    pub received_quantity: i64,
}

impl PurchaseOrderLine {
    pub fn outstanding(&self) -> i64 {
        self.quantity - self.received_quantity
    }

    pub fn is_fully_received(&self) -> bool {
        self.received_quantity >= self.quantity
    }
}

/// A purchase order: intent to buy from a supplier, received later in one or
/// more goods-receipt postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub tenant_id: TenantId,
    pub number: String,
    pub supplier_id: PartyId,
    pub location_id: LocationId,
    pub date: DateTime<Utc>,
    pub status: PurchaseOrderStatus,
    pub subtotal: Money,
    pub tax_total: Money,
    pub total: Money,
    pub notes: Option<String>,
    pub created_by: UserId,
    lines: Vec<PurchaseOrderLine>,
}

impl PurchaseOrder {
    pub fn draft(
        id: PurchaseOrderId,
        tenant_id: TenantId,
        number: impl Into<String>,
        supplier_id: PartyId,
        location_id: LocationId,
        date: DateTime<Utc>,
        created_by: UserId,
    ) -> Self {
        Self {
            id,
            tenant_id,
            number: number.into(),
            supplier_id,
            location_id,
            date,
            status: PurchaseOrderStatus::Draft,
            subtotal: Money::ZERO,
            tax_total: Money::ZERO,
            total: Money::ZERO,
            notes: None,
            created_by,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[PurchaseOrderLine] {
        &self.lines
    }

    pub fn line(&self, line_no: u32) -> Option<&PurchaseOrderLine> {
        self.lines.iter().find(|l| l.line_no == line_no)
    }

    /// Add a line while in draft. Totals are recomputed from the line.
    pub fn add_line(
        &mut self,
        item_id: ItemId,
        quantity: i64,
        unit_price: Money,
        tax_rate: TaxRate,
    ) -> DomainResult<u32> {
        if self.status != PurchaseOrderStatus::Draft {
            return Err(DomainError::invariant(
                "cannot modify purchase order once submitted",
            ));
        }
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if unit_price.is_negative() {
            return Err(DomainError::validation("unit price cannot be negative"));
        }

        let net = unit_price.checked_mul(quantity)?;
        let tax_amount = tax_rate.tax_on(net)?;
        let line_total = net.checked_add(tax_amount)?;

        let line_no = (self.lines.len() as u32) + 1;
        self.lines.push(PurchaseOrderLine {
            line_no,
            item_id,
            quantity,
            unit_price,
            tax_rate,
            tax_amount,
            line_total,
            received_quantity: 0,
        });

        self.subtotal = self.subtotal.checked_add(net)?;
        self.tax_total = self.tax_total.checked_add(tax_amount)?;
        self.total = self.total.checked_add(line_total)?;
        Ok(line_no)
    }

    pub fn submit(&mut self) -> DomainResult<()> {
        if self.status != PurchaseOrderStatus::Draft {
            return Err(DomainError::invariant(
                "only draft purchase orders can be submitted",
            ));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation(
                "cannot submit purchase order without lines",
            ));
        }
        self.status = PurchaseOrderStatus::Submitted;
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invariant(
                "cannot cancel a received or already cancelled purchase order",
            ));
        }
        self.status = PurchaseOrderStatus::Cancelled;
        Ok(())
    }

    pub fn is_receivable(&self) -> bool {
        matches!(
            self.status,
            PurchaseOrderStatus::Submitted | PurchaseOrderStatus::PartiallyReceived
        )
    }

    /// Record a received quantity against one line and re-derive the header
    /// status from the line counters. Called only by the posting engine,
    /// inside its transaction.
    pub fn record_receipt(&mut self, line_no: u32, quantity: i64) -> DomainResult<()> {
        if !self.is_receivable() {
            return Err(DomainError::invariant(format!(
                "purchase order {} is not receivable in status {:?}",
                self.number, self.status
            )));
        }
        if quantity <= 0 {
            return Err(DomainError::validation("received quantity must be positive"));
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.line_no == line_no)
            .ok_or(DomainError::NotFound)?;

        if quantity > line.outstanding() {
            return Err(DomainError::validation(format!(
                "line {line_no}: receiving {quantity} exceeds outstanding {}",
                line.outstanding()
            )));
        }

        line.received_quantity += quantity;
        self.status = self.derive_receiving_status();
        Ok(())
    }

    fn derive_receiving_status(&self) -> PurchaseOrderStatus {
        if self.lines.iter().all(PurchaseOrderLine::is_fully_received) {
            PurchaseOrderStatus::Received
        } else if self.lines.iter().any(|l| l.received_quantity > 0) {
            PurchaseOrderStatus::PartiallyReceived
        } else {
            self.status
        }
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
