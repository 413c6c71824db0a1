//! Infrastructure layer: the tenant-scoped store.
//!
//! The database is an in-memory map of tenant slices behind a single writer
//! lock. Transactions run a closure against a working copy of the calling
//! tenant's slice while the lock is held: `Ok` swaps the copy in, `Err`
//! discards it. That gives two guarantees the posting engine leans on:
//!
//! - **Atomicity**: a failed posting leaves no trace.
//! - **Serialized read-modify-write**: concurrent increments against the same
//!   counter cannot interleave, so no lost updates.

pub mod api_key;
pub mod database;
pub mod state;

pub use api_key::ApiKey;
pub use database::{Database, StoreError, TransactionError};
pub use state::TenantState;
