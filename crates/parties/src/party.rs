use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, Entity, RecordId, TenantId};

/// Party identifier (tenant-scoped via the owning record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(pub RecordId);

impl PartyId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PartyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Party kind: customer or supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Customer,
    Supplier,
}

/// Party status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    Active,
    Suspended,
}

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A counterparty: customer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub tenant_id: TenantId,
    pub kind: PartyKind,
    pub name: String,
    pub contact: ContactInfo,
    pub status: PartyStatus,
    pub created_at: DateTime<Utc>,
}

impl Party {
    pub fn new(
        id: PartyId,
        tenant_id: TenantId,
        kind: PartyKind,
        name: impl Into<String>,
        contact: ContactInfo,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("party name cannot be empty"));
        }
        Ok(Self {
            id,
            tenant_id,
            kind,
            name,
            contact,
            status: PartyStatus::Active,
            created_at,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == PartyStatus::Active
    }

    pub fn suspend(&mut self) {
        self.status = PartyStatus::Suspended;
    }
}

impl Entity for Party {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
