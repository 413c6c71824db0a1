//! Parties domain module: customers and suppliers.

pub mod party;

pub use party::{ContactInfo, Party, PartyId, PartyKind, PartyStatus};
