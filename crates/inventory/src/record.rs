use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::{DomainError, DomainResult};

/// Uniqueness key for an inventory record: at most one record exists per
/// (item, location) pair within a tenant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub item_id: ItemId,
    pub location_id: LocationId,
}

impl StockKey {
    pub fn new(item_id: ItemId, location_id: LocationId) -> Self {
        Self {
            item_id,
            location_id,
        }
    }
}

/// On-hand stock of one item at one location.
///
/// `on_hand` is signed: a negative quantity means the item was oversold and
/// signals a restock need (backorder). `reserved` can never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub key: StockKey,
    pub on_hand: i64,
    pub reserved: i64,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Zero-initialized record, used when a posting first touches a pair.
    pub fn empty(key: StockKey, at: DateTime<Utc>) -> Self {
        Self {
            key,
            on_hand: 0,
            reserved: 0,
            updated_at: at,
        }
    }

    /// Apply a signed delta to on-hand stock. No floor is enforced here;
    /// the posting engine decides whether the result may go negative.
    pub fn apply(&mut self, delta: i64, at: DateTime<Utc>) -> DomainResult<()> {
        self.on_hand = self
            .on_hand
            .checked_add(delta)
            .ok_or_else(|| DomainError::invariant("on-hand quantity overflow"))?;
        self.updated_at = at;
        Ok(())
    }

    /// Set aside quantity for a pending order.
    pub fn reserve(&mut self, quantity: i64, at: DateTime<Utc>) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("reserve quantity must be positive"));
        }
        self.reserved = self
            .reserved
            .checked_add(quantity)
            .ok_or_else(|| DomainError::invariant("reserved quantity overflow"))?;
        self.updated_at = at;
        Ok(())
    }

    /// Release previously reserved quantity.
    pub fn release(&mut self, quantity: i64, at: DateTime<Utc>) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("release quantity must be positive"));
        }
        if quantity > self.reserved {
            return Err(DomainError::invariant(
                "cannot release more than is reserved",
            ));
        }
        self.reserved -= quantity;
        self.updated_at = at;
        Ok(())
    }

    /// Quantity available for new sales (on-hand minus reserved).
    pub fn available(&self) -> i64 {
        self.on_hand - self.reserved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stockbook_core::RecordId;

    fn key() -> StockKey {
        StockKey::new(
            ItemId::new(RecordId::new()),
            LocationId::new(RecordId::new()),
        )
    }

    #[test]
    fn apply_allows_negative_on_hand() {
        let mut rec = InventoryRecord::empty(key(), Utc::now());
        rec.apply(-3, Utc::now()).unwrap();
        assert_eq!(rec.on_hand, -3);
    }

    #[test]
    fn release_beyond_reserved_is_rejected() {
        let mut rec = InventoryRecord::empty(key(), Utc::now());
        rec.reserve(2, Utc::now()).unwrap();
        let err = rec.release(3, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(rec.reserved, 2);
    }

    proptest! {
        #[test]
        fn deltas_sum_exactly(deltas in proptest::collection::vec(-1_000i64..1_000, 0..64)) {
            let mut rec = InventoryRecord::empty(key(), Utc::now());
            for d in &deltas {
                rec.apply(*d, Utc::now()).unwrap();
            }
            prop_assert_eq!(rec.on_hand, deltas.iter().sum::<i64>());
        }
    }
}
