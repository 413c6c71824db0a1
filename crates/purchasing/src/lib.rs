//! Purchasing domain module: purchase orders and goods receipts.

pub mod order;
pub mod receipt;

pub use order::{PurchaseOrder, PurchaseOrderId, PurchaseOrderLine, PurchaseOrderStatus};
pub use receipt::{GoodsReceipt, GoodsReceiptId, GoodsReceiptLine};
