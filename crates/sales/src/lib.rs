//! Sales domain module: sales orders, POS sales, monetary totals.

pub mod order;

pub use order::{
    OrderSource, OrderTotals, PaymentMethod, PaymentStatus, SalesOrder, SalesOrderId,
    SalesOrderLine, SalesOrderStatus,
};
