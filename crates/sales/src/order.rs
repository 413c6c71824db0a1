use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::{DomainError, DomainResult, Entity, Money, RecordId, TaxRate, TenantId, UserId};
use stockbook_parties::PartyId;

/// Sales order identifier (tenant-scoped via the owning record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesOrderId(pub RecordId);

impl SalesOrderId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SalesOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Sales order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
    Draft,
    Confirmed,
    Completed,
    Delivered,
    Cancelled,
}

/// Payment state, tracked independently of fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
}

/// Where the order originated. POS orders are final at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Standard,
    Pos,
}

/// Sales order line. All monetary fields are recomputed server-side; the
/// constructor is the single place the arithmetic lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrderLine {
    pub line_no: u32,
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub discount: Money,
    pub line_total: Money,
    pub serial_numbers: Vec<String>,
}

impl SalesOrderLine {
    /// Build a line, computing tax and total from first principles:
    /// net = price × qty − discount, tax on the discounted net,
    /// total = net + tax.
    pub fn compute(
        line_no: u32,
        item_id: ItemId,
        quantity: i64,
        unit_price: Money,
        tax_rate: TaxRate,
        discount: Money,
        serial_numbers: Vec<String>,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if unit_price.is_negative() {
            return Err(DomainError::validation("unit price cannot be negative"));
        }
        if discount.is_negative() {
            return Err(DomainError::validation("discount cannot be negative"));
        }

        let gross = unit_price.checked_mul(quantity)?;
        let net = gross.checked_sub(discount)?;
        if net.is_negative() {
            return Err(DomainError::validation("discount exceeds line amount"));
        }
        let tax_amount = tax_rate.tax_on(net)?;
        let line_total = net.checked_add(tax_amount)?;

        Ok(Self {
            line_no,
            item_id,
            quantity,
            unit_price,
            tax_rate,
            tax_amount,
            discount,
            line_total,
            serial_numbers,
        })
    }
}

/// Header-level money summary, derived from the lines plus order-level
/// shipping and discount.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax_total: Money,
    pub shipping: Money,
    pub discount: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Recompute header totals from lines. This is what caller-supplied
    /// figures are checked against before a POS sale posts.
    pub fn compute(lines: &[SalesOrderLine], shipping: Money, discount: Money) -> DomainResult<Self> {
        if shipping.is_negative() || discount.is_negative() {
            return Err(DomainError::validation(
                "shipping and discount cannot be negative",
            ));
        }

        let mut subtotal = Money::ZERO;
        let mut tax_total = Money::ZERO;
        for line in lines {
            let net = line.line_total.checked_sub(line.tax_amount)?;
            subtotal = subtotal.checked_add(net)?;
            tax_total = tax_total.checked_add(line.tax_amount)?;
        }

        let total = subtotal
            .checked_add(tax_total)?
            .checked_add(shipping)?
            .checked_sub(discount)?;
        if total.is_negative() {
            return Err(DomainError::validation("order total cannot be negative"));
        }

        Ok(Self {
            subtotal,
            tax_total,
            shipping,
            discount,
            total,
        })
    }
}

/// A sales order: standard (draft → confirmed → completed → delivered) or
/// point-of-sale (created completed and paid in one posting).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: SalesOrderId,
    pub tenant_id: TenantId,
    pub number: String,
    /// Absent for anonymous walk-in POS sales.
    pub customer_id: Option<PartyId>,
    pub location_id: LocationId,
    pub date: DateTime<Utc>,
    pub source: OrderSource,
    pub status: SalesOrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub totals: OrderTotals,
    pub notes: Option<String>,
    pub created_by: UserId,
    lines: Vec<SalesOrderLine>,
}

impl SalesOrder {
    /// A POS sale is defined as immediately final: completed and paid.
    pub fn pos_completed(
        id: SalesOrderId,
        tenant_id: TenantId,
        number: impl Into<String>,
        customer_id: Option<PartyId>,
        location_id: LocationId,
        date: DateTime<Utc>,
        payment_method: Option<PaymentMethod>,
        totals: OrderTotals,
        notes: Option<String>,
        created_by: UserId,
        lines: Vec<SalesOrderLine>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("sale must have at least one line"));
        }
        Ok(Self {
            id,
            tenant_id,
            number: number.into(),
            customer_id,
            location_id,
            date,
            source: OrderSource::Pos,
            status: SalesOrderStatus::Completed,
            payment_status: PaymentStatus::Paid,
            payment_method,
            totals,
            notes,
            created_by,
            lines,
        })
    }

    /// A standard order starting in draft (used by non-POS flows and the
    /// projection fixtures).
    pub fn draft(
        id: SalesOrderId,
        tenant_id: TenantId,
        number: impl Into<String>,
        customer_id: Option<PartyId>,
        location_id: LocationId,
        date: DateTime<Utc>,
        created_by: UserId,
    ) -> Self {
        Self {
            id,
            tenant_id,
            number: number.into(),
            customer_id,
            location_id,
            date,
            source: OrderSource::Standard,
            status: SalesOrderStatus::Draft,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            totals: OrderTotals::default(),
            notes: None,
            created_by,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[SalesOrderLine] {
        &self.lines
    }

    pub fn add_line(&mut self, line: SalesOrderLine) -> DomainResult<()> {
        if self.status != SalesOrderStatus::Draft {
            return Err(DomainError::invariant(
                "lines can only be added to draft orders",
            ));
        }
        self.lines.push(line);
        self.totals = OrderTotals::compute(&self.lines, self.totals.shipping, self.totals.discount)?;
        Ok(())
    }

    pub fn confirm(&mut self) -> DomainResult<()> {
        if self.status != SalesOrderStatus::Draft {
            return Err(DomainError::invariant("only draft orders can be confirmed"));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation("cannot confirm order without lines"));
        }
        self.status = SalesOrderStatus::Confirmed;
        Ok(())
    }

    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != SalesOrderStatus::Confirmed {
            return Err(DomainError::invariant(
                "only confirmed orders can be completed",
            ));
        }
        self.status = SalesOrderStatus::Completed;
        Ok(())
    }

    pub fn deliver(&mut self) -> DomainResult<()> {
        if self.status != SalesOrderStatus::Completed {
            return Err(DomainError::invariant(
                "only completed orders can be delivered",
            ));
        }
        self.status = SalesOrderStatus::Delivered;
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        if matches!(
            self.status,
            SalesOrderStatus::Delivered | SalesOrderStatus::Cancelled
        ) {
            return Err(DomainError::invariant(
                "cannot cancel a delivered or already cancelled order",
            ));
        }
        self.status = SalesOrderStatus::Cancelled;
        Ok(())
    }

    pub fn mark_paid(&mut self) {
        self.payment_status = PaymentStatus::Paid;
    }
}

impl Entity for SalesOrder {
    type Id = SalesOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item() -> ItemId {
        ItemId::new(RecordId::new())
    }

    #[test]
    fn line_arithmetic_is_discount_then_tax() {
        // 3 × 10.00 − 5.00 = 25.00 net, 20% tax = 5.00, total 30.00
        let line = SalesOrderLine::compute(
            1,
            item(),
            3,
            Money::from_minor(1000),
            TaxRate::from_basis_points(2000).unwrap(),
            Money::from_minor(500),
            vec![],
        )
        .unwrap();
        assert_eq!(line.tax_amount, Money::from_minor(500));
        assert_eq!(line.line_total, Money::from_minor(3000));
    }

    #[test]
    fn discount_beyond_line_amount_is_rejected() {
        let err = SalesOrderLine::compute(
            1,
            item(),
            1,
            Money::from_minor(100),
            TaxRate::ZERO,
            Money::from_minor(200),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn totals_add_shipping_and_subtract_discount() {
        let lines = vec![
            SalesOrderLine::compute(1, item(), 2, Money::from_minor(1000), TaxRate::ZERO, Money::ZERO, vec![]).unwrap(),
        ];
        let totals =
            OrderTotals::compute(&lines, Money::from_minor(300), Money::from_minor(100)).unwrap();
        assert_eq!(totals.subtotal, Money::from_minor(2000));
        assert_eq!(totals.total, Money::from_minor(2200));
    }

    #[test]
    fn pos_order_is_completed_and_paid() {
        let lines = vec![
            SalesOrderLine::compute(1, item(), 1, Money::from_minor(500), TaxRate::ZERO, Money::ZERO, vec![]).unwrap(),
        ];
        let totals = OrderTotals::compute(&lines, Money::ZERO, Money::ZERO).unwrap();
        let order = SalesOrder::pos_completed(
            SalesOrderId::new(RecordId::new()),
            TenantId::new(),
            "SO-20250101-0001",
            None,
            LocationId::new(RecordId::new()),
            Utc::now(),
            Some(PaymentMethod::Cash),
            totals,
            None,
            UserId::new(),
            lines,
        )
        .unwrap();
        assert_eq!(order.status, SalesOrderStatus::Completed);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.source, OrderSource::Pos);
    }

    #[test]
    fn delivered_orders_cannot_be_cancelled() {
        let mut order = SalesOrder::draft(
            SalesOrderId::new(RecordId::new()),
            TenantId::new(),
            "SO-20250101-0002",
            None,
            LocationId::new(RecordId::new()),
            Utc::now(),
            UserId::new(),
        );
        order
            .add_line(
                SalesOrderLine::compute(1, item(), 1, Money::from_minor(100), TaxRate::ZERO, Money::ZERO, vec![])
                    .unwrap(),
            )
            .unwrap();
        order.confirm().unwrap();
        order.complete().unwrap();
        order.deliver().unwrap();

        assert!(order.cancel().is_err());
    }

    proptest! {
        /// Totals recomputed from lines always accept what the computation
        /// itself produced (the verification path cannot reject its own output).
        #[test]
        fn recomputation_is_stable(
            qty in 1i64..500,
            price in 0i64..100_000,
            rate_bp in 0u16..=10_000,
            discount in 0i64..1_000,
        ) {
            prop_assume!(discount <= qty * price);
            let rate = TaxRate::from_basis_points(rate_bp).unwrap();
            let line = SalesOrderLine::compute(
                1, item(), qty, Money::from_minor(price), rate, Money::from_minor(discount), vec![],
            ).unwrap();
            let first = OrderTotals::compute(&[line.clone()], Money::ZERO, Money::ZERO).unwrap();
            let second = OrderTotals::compute(&[line], Money::ZERO, Money::ZERO).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.total, first.subtotal.checked_add(first.tax_total).unwrap());
        }
    }
}
