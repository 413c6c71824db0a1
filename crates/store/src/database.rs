use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use stockbook_core::{DomainError, TenantId};

use crate::api_key::ApiKey;
use crate::state::TenantState;

/// Infrastructure-level store failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Outcome of a transaction: the closure's domain failure, or an
/// infrastructure failure around it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory multi-tenant database.
///
/// Every access is scoped by a `TenantId` taken as a parameter, never
/// inferred — callers cannot forget to filter.
#[derive(Debug, Default)]
pub struct Database {
    tenants: RwLock<HashMap<TenantId, TenantState>>,
    api_keys: RwLock<HashMap<String, ApiKey>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against the tenant's slice. An unknown tenant
    /// reads as empty, it is not an error.
    pub fn read<T>(
        &self,
        tenant_id: TenantId,
        f: impl FnOnce(&TenantState) -> T,
    ) -> Result<T, StoreError> {
        let tenants = self.tenants.read().map_err(|_| StoreError::Poisoned)?;
        match tenants.get(&tenant_id) {
            Some(state) => Ok(f(state)),
            None => Ok(f(&TenantState::default())),
        }
    }

    /// Run an all-or-nothing transaction against the tenant's slice.
    ///
    /// The closure mutates a working copy while the writer lock is held; the
    /// copy replaces the slice only on `Ok`. Concurrent transactions are
    /// serialized, so read-modify-write sequences inside the closure cannot
    /// lose updates to one another.
    ///
    /// The error type is the caller's, as long as it can absorb a
    /// [`StoreError`] (lock poisoning).
    pub fn transaction<T, E>(
        &self,
        tenant_id: TenantId,
        f: impl FnOnce(&mut TenantState) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut tenants = self.tenants.write().map_err(|_| StoreError::Poisoned)?;
        let mut working = tenants.get(&tenant_id).cloned().unwrap_or_default();

        let value = f(&mut working)?;
        tenants.insert(tenant_id, working);
        Ok(value)
    }

    /// Register an API key; the key string is globally unique.
    pub fn insert_api_key(&self, key: ApiKey) -> Result<(), TransactionError> {
        let mut keys = self.api_keys.write().map_err(|_| StoreError::Poisoned)?;
        if keys.contains_key(&key.key) {
            return Err(DomainError::conflict("api key already exists").into());
        }
        keys.insert(key.key.clone(), key);
        Ok(())
    }

    /// Resolve an API key presented by a caller; `None` means unauthorized.
    pub fn resolve_api_key(&self, key: &str) -> Result<Option<ApiKey>, StoreError> {
        let keys = self.api_keys.read().map_err(|_| StoreError::Poisoned)?;
        Ok(keys.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use stockbook_catalog::{Item, ItemId};
    use stockbook_core::{Money, RecordId, TaxRate};

    fn test_item(tenant_id: TenantId) -> Item {
        Item::new(
            ItemId::new(RecordId::new()),
            tenant_id,
            "SKU-1",
            "Widget",
            Money::from_minor(100),
            Money::from_minor(200),
            TaxRate::ZERO,
            0,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn failed_transaction_leaves_no_trace() {
        let db = Database::new();
        let tenant = TenantId::new();
        let item = test_item(tenant);
        let item_id = item.id;

        let result = db.transaction(tenant, |state| {
            state.items.insert(item_id, item);
            Err::<(), TransactionError>(DomainError::validation("boom").into())
        });

        assert!(result.is_err());
        let count = db.read(tenant, |state| state.items.len()).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn committed_transaction_is_visible() {
        let db = Database::new();
        let tenant = TenantId::new();
        let item = test_item(tenant);
        let item_id = item.id;

        db.transaction(tenant, |state| {
            state.items.insert(item_id, item);
            Ok::<_, TransactionError>(())
        })
        .unwrap();

        assert!(db.read(tenant, |state| state.item(item_id).is_ok()).unwrap());
    }

    #[test]
    fn tenants_are_isolated() {
        let db = Database::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let item = test_item(tenant_a);
        let item_id = item.id;

        db.transaction(tenant_a, |state| {
            state.items.insert(item_id, item);
            Ok::<_, TransactionError>(())
        })
        .unwrap();

        assert_eq!(db.read(tenant_b, |state| state.items.len()).unwrap(), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let db = Arc::new(Database::new());
        let tenant = TenantId::new();
        let item = test_item(tenant);
        let item_id = item.id;

        db.transaction(tenant, |state| {
            state.items.insert(item_id, item);
            Ok::<_, TransactionError>(())
        })
        .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let db = db.clone();
                std::thread::spawn(move || {
                    db.transaction(tenant, |state| {
                        let item = state.item_mut(item_id)?;
                        item.sales.record_sale(1, Money::from_minor(100))?;
                        Ok::<_, TransactionError>(())
                    })
                    .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let count = db
            .read(tenant, |state| state.item(item_id).unwrap().sales.sales_count)
            .unwrap();
        assert_eq!(count, 16);
    }

    #[test]
    fn duplicate_api_key_is_a_conflict() {
        let db = Database::new();
        let tenant = TenantId::new();
        db.insert_api_key(ApiKey::new("k-1", tenant, "pos terminal", Utc::now()))
            .unwrap();
        let err = db
            .insert_api_key(ApiKey::new("k-1", TenantId::new(), "other", Utc::now()))
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Domain(DomainError::Conflict(_))
        ));
    }
}
