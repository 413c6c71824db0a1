//! On-demand read projections over the store.
//!
//! Projections recompute from current state on every call; nothing is
//! materialized or kept in sync. Absence is never an error — an unknown
//! tenant or customer projects to zeros and empty lists — but a store read
//! failure surfaces as an explicit `StoreError` rather than an empty result.

pub mod customer;
pub mod dashboard;

pub use customer::{CustomerStatistics, customer_order_history, customer_statistics};
pub use dashboard::{
    DashboardSummary, LowStockEntry, RecentCustomer, RecentOrder, TopItem, dashboard_summary,
};
