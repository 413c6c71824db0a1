use serde::Serialize;

use stockbook_core::{Actor, Money};
use stockbook_parties::PartyId;
use stockbook_sales::{PaymentStatus, SalesOrder, SalesOrderStatus};
use stockbook_store::{Database, StoreError};

/// Lifetime order statistics for one customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerStatistics {
    pub total_orders: usize,
    /// Σ order totals over every non-cancelled order, paid or not.
    pub total_spent: Money,
    /// Orders that reached `Completed` or `Delivered`.
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    /// Σ order totals still awaiting full payment (not `Paid`, not cancelled).
    pub pending_payment: Money,
}

fn accumulate(total: Money, amount: Money) -> Money {
    Money::from_minor(total.minor().saturating_add(amount.minor()))
}

pub fn customer_statistics(
    db: &Database,
    actor: &Actor,
    customer_id: PartyId,
) -> Result<CustomerStatistics, StoreError> {
    db.read(actor.tenant_id, |state| {
        let mut stats = CustomerStatistics::default();
        for order in state.sales_orders.values() {
            if order.customer_id != Some(customer_id) {
                continue;
            }
            stats.total_orders += 1;
            match order.status {
                SalesOrderStatus::Cancelled => {
                    stats.cancelled_orders += 1;
                    continue;
                }
                SalesOrderStatus::Completed | SalesOrderStatus::Delivered => {
                    stats.completed_orders += 1;
                }
                SalesOrderStatus::Draft | SalesOrderStatus::Confirmed => {}
            }
            stats.total_spent = accumulate(stats.total_spent, order.totals.total);
            if order.payment_status != PaymentStatus::Paid {
                stats.pending_payment = accumulate(stats.pending_payment, order.totals.total);
            }
        }
        stats
    })
}

/// The customer's orders, newest first.
pub fn customer_order_history(
    db: &Database,
    actor: &Actor,
    customer_id: PartyId,
) -> Result<Vec<SalesOrder>, StoreError> {
    db.read(actor.tenant_id, |state| {
        let mut orders: Vec<SalesOrder> = state
            .sales_orders
            .values()
            .filter(|o| o.customer_id == Some(customer_id))
            .cloned()
            .collect();
        orders.sort_by_key(|o| std::cmp::Reverse(o.date));
        orders
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use stockbook_catalog::{ItemId, LocationId};
    use stockbook_core::{Permission, RecordId, TaxRate, TenantId, UserId};
    use stockbook_sales::{OrderTotals, SalesOrderId, SalesOrderLine};
    use stockbook_store::TransactionError;

    fn actor(tenant_id: TenantId) -> Actor {
        Actor::new(UserId::new(), tenant_id, vec![Permission::ViewReports])
    }

    /// An order with one line totalling `total` minor units, walked to the
    /// requested status.
    fn order_with_total(
        tenant_id: TenantId,
        customer_id: PartyId,
        total: i64,
        status: SalesOrderStatus,
        age: Duration,
    ) -> SalesOrder {
        let mut order = SalesOrder::draft(
            SalesOrderId::new(RecordId::new()),
            tenant_id,
            format!("SO-TEST-{total}"),
            Some(customer_id),
            LocationId::new(RecordId::new()),
            Utc::now() - age,
            UserId::new(),
        );
        order
            .add_line(
                SalesOrderLine::compute(
                    1,
                    ItemId::new(RecordId::new()),
                    1,
                    Money::from_minor(total),
                    TaxRate::ZERO,
                    Money::ZERO,
                    vec![],
                )
                .unwrap(),
            )
            .unwrap();
        assert_eq!(order.totals, OrderTotals::compute(order.lines(), Money::ZERO, Money::ZERO).unwrap());
        match status {
            SalesOrderStatus::Draft => {}
            SalesOrderStatus::Confirmed => order.confirm().unwrap(),
            SalesOrderStatus::Completed => {
                order.confirm().unwrap();
                order.complete().unwrap();
                order.mark_paid();
            }
            SalesOrderStatus::Delivered => {
                order.confirm().unwrap();
                order.complete().unwrap();
                order.deliver().unwrap();
                order.mark_paid();
            }
            SalesOrderStatus::Cancelled => order.cancel().unwrap(),
        }
        order
    }

    fn seed(db: &Database, tenant_id: TenantId, orders: Vec<SalesOrder>) {
        db.transaction(tenant_id, |state| {
            for order in orders {
                state.sales_orders.insert(order.id, order);
            }
            Ok::<_, TransactionError>(())
        })
        .unwrap();
    }

    #[test]
    fn statistics_split_spend_by_status_and_payment() {
        let db = Database::new();
        let tenant_id = TenantId::new();
        let customer_id = PartyId::new(RecordId::new());

        // A paid completed order of 100, a cancelled order of 50, and an
        // unpaid draft of 30.
        seed(
            &db,
            tenant_id,
            vec![
                order_with_total(tenant_id, customer_id, 100, SalesOrderStatus::Completed, Duration::hours(3)),
                order_with_total(tenant_id, customer_id, 50, SalesOrderStatus::Cancelled, Duration::hours(2)),
                order_with_total(tenant_id, customer_id, 30, SalesOrderStatus::Draft, Duration::hours(1)),
            ],
        );

        let stats = customer_statistics(&db, &actor(tenant_id), customer_id).unwrap();
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_spent, Money::from_minor(130));
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.cancelled_orders, 1);
        assert_eq!(stats.pending_payment, Money::from_minor(30));
    }

    #[test]
    fn unknown_customer_projects_to_zeros() {
        let db = Database::new();
        let tenant_id = TenantId::new();
        let stats =
            customer_statistics(&db, &actor(tenant_id), PartyId::new(RecordId::new())).unwrap();
        assert_eq!(stats, CustomerStatistics::default());
    }

    #[test]
    fn other_customers_orders_are_invisible() {
        let db = Database::new();
        let tenant_id = TenantId::new();
        let ours = PartyId::new(RecordId::new());
        let theirs = PartyId::new(RecordId::new());
        seed(
            &db,
            tenant_id,
            vec![order_with_total(tenant_id, theirs, 999, SalesOrderStatus::Completed, Duration::hours(1))],
        );

        let stats = customer_statistics(&db, &actor(tenant_id), ours).unwrap();
        assert_eq!(stats.total_orders, 0);
        let history = customer_order_history(&db, &actor(tenant_id), ours).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn history_is_newest_first() {
        let db = Database::new();
        let tenant_id = TenantId::new();
        let customer_id = PartyId::new(RecordId::new());
        seed(
            &db,
            tenant_id,
            vec![
                order_with_total(tenant_id, customer_id, 10, SalesOrderStatus::Draft, Duration::days(2)),
                order_with_total(tenant_id, customer_id, 20, SalesOrderStatus::Draft, Duration::days(1)),
                order_with_total(tenant_id, customer_id, 30, SalesOrderStatus::Draft, Duration::hours(1)),
            ],
        );

        let history = customer_order_history(&db, &actor(tenant_id), customer_id).unwrap();
        let totals: Vec<i64> = history.iter().map(|o| o.totals.total.minor()).collect();
        assert_eq!(totals, vec![30, 20, 10]);
    }
}
