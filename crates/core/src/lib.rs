//! `stockbook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod actor;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use actor::{Actor, Permission};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{RecordId, TenantId, UserId};
pub use money::{Money, TaxRate};
