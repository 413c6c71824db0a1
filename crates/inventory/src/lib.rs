//! Inventory domain module: the per-(item, location) quantity ledger.
//!
//! This crate contains the ledger primitives only, implemented purely as
//! deterministic domain logic (no IO, no storage). The posting engine decides
//! when records are created and whether negative on-hand is permitted.

pub mod movement;
pub mod record;

pub use movement::{
    AdjustmentReason, MovementId, StockAdjustment, StockTransfer, TransferLine,
};
pub use record::{InventoryRecord, StockKey};
