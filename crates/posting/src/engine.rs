use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use stockbook_core::{Actor, Permission, RecordId};
use stockbook_inventory::{MovementId, StockAdjustment, StockKey, StockTransfer, TransferLine};
use stockbook_numbering::{DocumentKind, DocumentNumbers};
use stockbook_parties::PartyKind;
use stockbook_purchasing::{GoodsReceipt, GoodsReceiptId, GoodsReceiptLine};
use stockbook_sales::{OrderTotals, SalesOrder, SalesOrderId, SalesOrderLine};
use stockbook_signals::{SignalBus, StaleView, views};
use stockbook_store::{Database, TenantState};

use crate::error::PostingError;
use crate::input::{AdjustmentInput, PosSaleInput, ReceiptInput, TransferInput};

/// Posting behavior switches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PostingConfig {
    /// When true (the default), selling or moving more than is on hand drives
    /// the record negative as a restock signal. When false, the posting is
    /// rejected with [`PostingError::InsufficientStock`].
    pub allow_oversell: bool,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            allow_oversell: true,
        }
    }
}

/// Turns posting requests into committed documents + inventory deltas.
///
/// Every operation validates up front, runs one store transaction, and only
/// then publishes stale-view signals. A failed operation has no observable
/// effect.
pub struct PostingEngine<N, B> {
    db: Arc<Database>,
    numbers: N,
    bus: B,
    config: PostingConfig,
}

impl<N, B> PostingEngine<N, B>
where
    N: DocumentNumbers,
    B: SignalBus,
{
    pub fn new(db: Arc<Database>, numbers: N, bus: B) -> Self {
        Self {
            db,
            numbers,
            bus,
            config: PostingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PostingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Post a goods receipt against a purchase order.
    ///
    /// Atomically: creates the receipt, increments each order line's
    /// received counter, re-derives the order status from the line sums, and
    /// upserts the (item, location) inventory records.
    pub fn post_receipt(
        &self,
        actor: &Actor,
        input: ReceiptInput,
    ) -> Result<GoodsReceipt, PostingError> {
        warn_on_reject("goods receipt", self.receipt_inner(actor, input))
    }

    fn receipt_inner(
        &self,
        actor: &Actor,
        input: ReceiptInput,
    ) -> Result<GoodsReceipt, PostingError> {
        require(actor, Permission::PostReceipts)?;
        if input.lines.is_empty() {
            return Err(PostingError::Validation(
                "receipt must have at least one line".into(),
            ));
        }
        for line in &input.lines {
            if line.quantity <= 0 {
                return Err(PostingError::Validation(format!(
                    "received quantity must be a positive integer (got {})",
                    line.quantity
                )));
            }
        }

        let tenant_id = actor.tenant_id;
        let now = Utc::now();
        let number = self
            .numbers
            .next(tenant_id, DocumentKind::GoodsReceipt, now);

        let receipt = self.db.transaction(tenant_id, |state| {
            state.location(input.location_id)?;

            let order = state.purchase_order_mut(input.purchase_order_id)?;
            let mut receipt_lines = Vec::with_capacity(input.lines.len());
            for (idx, line) in input.lines.iter().enumerate() {
                let order_line = order.line(line.order_line_no).ok_or(PostingError::NotFound)?;
                if order_line.item_id != line.item_id {
                    return Err(PostingError::Validation(format!(
                        "line {}: item does not match order line {}",
                        idx + 1,
                        line.order_line_no
                    )));
                }
                order.record_receipt(line.order_line_no, line.quantity)?;
                receipt_lines.push(GoodsReceiptLine {
                    line_no: (idx as u32) + 1,
                    order_line_no: line.order_line_no,
                    item_id: line.item_id,
                    quantity: line.quantity,
                    notes: line.notes.clone(),
                });
            }

            for line in &input.lines {
                let key = StockKey::new(line.item_id, input.location_id);
                state
                    .stock_mut_or_create(key, now)
                    .apply(line.quantity, now)?;
            }

            let receipt = GoodsReceipt::new(
                GoodsReceiptId::new(RecordId::new()),
                tenant_id,
                number.clone(),
                input.purchase_order_id,
                input.location_id,
                actor.user_id,
                now,
                input.notes.clone(),
                receipt_lines,
            )?;
            state.receipts.insert(receipt.id, receipt.clone());
            Ok::<_, PostingError>(receipt)
        })?;

        info!(number = %receipt.number, order = %receipt.purchase_order_id, "goods receipt posted");
        self.invalidate(actor, &[views::PURCHASE_ORDERS, views::STOCK, views::DASHBOARD]);
        Ok(receipt)
    }

    /// Post a point-of-sale sale: an immediately final, paid sales order.
    ///
    /// Header totals are recomputed from the lines and compared against the
    /// caller's figures before anything is written.
    pub fn post_pos_sale(
        &self,
        actor: &Actor,
        input: PosSaleInput,
    ) -> Result<SalesOrder, PostingError> {
        warn_on_reject("pos sale", self.pos_sale_inner(actor, input))
    }

    fn pos_sale_inner(
        &self,
        actor: &Actor,
        input: PosSaleInput,
    ) -> Result<SalesOrder, PostingError> {
        require(actor, Permission::PostSales)?;
        if input.lines.is_empty() {
            return Err(PostingError::Validation(
                "sale must have at least one line".into(),
            ));
        }

        // Recompute all money server-side; reject claims that don't match.
        let mut lines = Vec::with_capacity(input.lines.len());
        for (idx, line) in input.lines.iter().enumerate() {
            let computed = SalesOrderLine::compute(
                (idx as u32) + 1,
                line.item_id,
                line.quantity,
                line.unit_price,
                line.tax_rate,
                line.discount,
                line.serial_numbers.clone(),
            )?;
            if computed.tax_amount != line.tax_amount || computed.line_total != line.line_total {
                return Err(PostingError::Validation(format!(
                    "line {}: claimed totals do not match recomputed values \
                     (tax {} vs {}, total {} vs {})",
                    idx + 1,
                    line.tax_amount,
                    computed.tax_amount,
                    line.line_total,
                    computed.line_total
                )));
            }
            lines.push(computed);
        }
        let totals = OrderTotals::compute(&lines, input.totals.shipping, input.totals.discount)?;
        if totals.subtotal != input.totals.subtotal
            || totals.tax_total != input.totals.tax_total
            || totals.total != input.totals.total
        {
            return Err(PostingError::Validation(format!(
                "claimed order totals do not match recomputed values \
                 (subtotal {} vs {}, tax {} vs {}, total {} vs {})",
                input.totals.subtotal,
                totals.subtotal,
                input.totals.tax_total,
                totals.tax_total,
                input.totals.total,
                totals.total
            )));
        }

        let tenant_id = actor.tenant_id;
        let now = Utc::now();
        let number = self.numbers.next(tenant_id, DocumentKind::SalesOrder, now);
        let allow_oversell = self.config.allow_oversell;

        let order = self.db.transaction(tenant_id, move |state| {
            state.location(input.location_id)?;
            if let Some(customer_id) = input.customer_id {
                let party = state.party(customer_id)?;
                if party.kind != PartyKind::Customer {
                    return Err(PostingError::Validation(
                        "referenced party is not a customer".into(),
                    ));
                }
            }

            for line in &lines {
                let item = state.item_mut(line.item_id)?;
                item.sales.record_sale(line.quantity, line.line_total)?;

                debit_stock(
                    state,
                    line.item_id,
                    input.location_id,
                    line.quantity,
                    allow_oversell,
                    now,
                )?;
            }

            let order = SalesOrder::pos_completed(
                SalesOrderId::new(RecordId::new()),
                tenant_id,
                number,
                input.customer_id,
                input.location_id,
                input.date,
                input.payment_method,
                totals,
                input.notes,
                actor.user_id,
                lines,
            )?;
            state.sales_orders.insert(order.id, order.clone());
            Ok::<_, PostingError>(order)
        })?;

        info!(number = %order.number, total = %order.totals.total, "pos sale posted");
        self.invalidate(
            actor,
            &[views::POS, views::SALES_ORDERS, views::STOCK, views::DASHBOARD],
        );
        Ok(order)
    }

    /// Move stock between two locations of the caller's tenant.
    pub fn post_transfer(
        &self,
        actor: &Actor,
        input: TransferInput,
    ) -> Result<StockTransfer, PostingError> {
        warn_on_reject("stock transfer", self.transfer_inner(actor, input))
    }

    fn transfer_inner(
        &self,
        actor: &Actor,
        input: TransferInput,
    ) -> Result<StockTransfer, PostingError> {
        require(actor, Permission::AdjustStock)?;

        let tenant_id = actor.tenant_id;
        let now = Utc::now();
        let number = self.numbers.next(tenant_id, DocumentKind::Transfer, now);
        let allow_oversell = self.config.allow_oversell;

        let transfer = self.db.transaction(tenant_id, move |state| {
            state.location(input.from_location_id)?;
            state.location(input.to_location_id)?;

            let mut lines = Vec::with_capacity(input.lines.len());
            for (idx, line) in input.lines.iter().enumerate() {
                state.item(line.item_id)?;
                lines.push(TransferLine {
                    line_no: (idx as u32) + 1,
                    item_id: line.item_id,
                    quantity: line.quantity,
                });
            }

            // Validates source != destination and positive quantities.
            let transfer = StockTransfer::new(
                MovementId::new(RecordId::new()),
                tenant_id,
                number,
                input.from_location_id,
                input.to_location_id,
                actor.user_id,
                now,
                input.notes,
                lines,
            )?;

            for line in transfer.lines() {
                debit_stock(
                    state,
                    line.item_id,
                    input.from_location_id,
                    line.quantity,
                    allow_oversell,
                    now,
                )?;
                let to = StockKey::new(line.item_id, input.to_location_id);
                state.stock_mut_or_create(to, now).apply(line.quantity, now)?;
            }

            state.transfers.insert(transfer.id, transfer.clone());
            Ok::<_, PostingError>(transfer)
        })?;

        info!(number = %transfer.number, "stock transfer posted");
        self.invalidate(actor, &[views::STOCK, views::DASHBOARD]);
        Ok(transfer)
    }

    /// Correct on-hand stock at one location by a signed delta.
    pub fn post_adjustment(
        &self,
        actor: &Actor,
        input: AdjustmentInput,
    ) -> Result<StockAdjustment, PostingError> {
        warn_on_reject("stock adjustment", self.adjustment_inner(actor, input))
    }

    fn adjustment_inner(
        &self,
        actor: &Actor,
        input: AdjustmentInput,
    ) -> Result<StockAdjustment, PostingError> {
        require(actor, Permission::AdjustStock)?;

        let tenant_id = actor.tenant_id;
        let now = Utc::now();
        let number = self.numbers.next(tenant_id, DocumentKind::Adjustment, now);
        let allow_oversell = self.config.allow_oversell;

        let adjustment = self.db.transaction(tenant_id, move |state| {
            state.location(input.location_id)?;
            state.item(input.item_id)?;

            let adjustment = StockAdjustment::new(
                MovementId::new(RecordId::new()),
                tenant_id,
                number,
                input.item_id,
                input.location_id,
                input.delta,
                input.reason,
                actor.user_id,
                now,
                input.notes,
            )?;

            if input.delta < 0 {
                let magnitude = input.delta.checked_neg().ok_or_else(|| {
                    PostingError::Validation("adjustment delta out of range".into())
                })?;
                debit_stock(
                    state,
                    input.item_id,
                    input.location_id,
                    magnitude,
                    allow_oversell,
                    now,
                )?;
            } else {
                let key = StockKey::new(input.item_id, input.location_id);
                state.stock_mut_or_create(key, now).apply(input.delta, now)?;
            }

            state.adjustments.insert(adjustment.id, adjustment.clone());
            Ok::<_, PostingError>(adjustment)
        })?;

        info!(number = %adjustment.number, delta = adjustment.delta, "stock adjustment posted");
        self.invalidate(actor, &[views::STOCK, views::DASHBOARD]);
        Ok(adjustment)
    }

    /// Fire-and-forget stale-view notifications, outside the transaction.
    fn invalidate(&self, actor: &Actor, paths: &[&str]) {
        for path in paths {
            self.bus.publish(StaleView::new(actor.tenant_id, *path));
        }
    }
}

fn warn_on_reject<T>(document: &str, result: Result<T, PostingError>) -> Result<T, PostingError> {
    if let Err(err) = &result {
        warn!(document, error = %err, "posting rejected");
    }
    result
}

fn require(actor: &Actor, permission: Permission) -> Result<(), PostingError> {
    if actor.has_permission(permission) {
        Ok(())
    } else {
        Err(PostingError::Unauthorized)
    }
}

/// Take `quantity` out of one inventory record, checking against the
/// record's current in-transaction on-hand immediately before the decrement
/// so that repeated debits of the same record within one posting cannot
/// individually pass a stale check.
fn debit_stock(
    state: &mut TenantState,
    item_id: stockbook_catalog::ItemId,
    location_id: stockbook_catalog::LocationId,
    quantity: i64,
    allow_oversell: bool,
    now: chrono::DateTime<Utc>,
) -> Result<(), PostingError> {
    let key = StockKey::new(item_id, location_id);
    let record = state.stock_mut_or_create(key, now);
    if !allow_oversell && quantity > record.on_hand {
        return Err(PostingError::InsufficientStock {
            item_id,
            location_id,
            requested: quantity,
            available: record.on_hand,
        });
    }
    let delta = quantity
        .checked_neg()
        .ok_or_else(|| PostingError::Validation("quantity out of range".into()))?;
    record.apply(delta, now)?;
    Ok(())
}
