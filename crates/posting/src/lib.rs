//! The document posting engine.
//!
//! A posting turns a draft business document (goods receipt, POS sale, stock
//! transfer, adjustment) into committed inventory deltas plus document status
//! transitions, inside one all-or-nothing store transaction. After the commit
//! the engine publishes stale-view signals so the presentation layer can drop
//! its caches; that part is fire-and-forget.

pub mod engine;
pub mod error;
pub mod input;

pub use engine::{PostingConfig, PostingEngine};
pub use error::PostingError;
pub use input::{
    AdjustmentInput, ClaimedTotals, PosLineInput, PosSaleInput, ReceiptInput, ReceiptLineInput,
    TransferInput, TransferLineInput,
};
