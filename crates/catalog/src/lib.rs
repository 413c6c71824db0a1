//! Catalog domain module: items and stock locations.

pub mod item;
pub mod location;

pub use item::{Item, ItemId, SalesAggregates};
pub use location::{Location, LocationId};
