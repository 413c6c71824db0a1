use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::{ItemId, LocationId};
use stockbook_core::{DomainError, DomainResult, Entity, RecordId, TenantId, UserId};

/// Transfer/adjustment document identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(pub RecordId);

impl MovementId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for MovementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Why an adjustment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    Recount,
    Damage,
    Loss,
    Correction,
}

/// One moved line of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLine {
    pub line_no: u32,
    pub item_id: ItemId,
    pub quantity: i64,
}

/// Immutable record of stock moved between two locations of one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransfer {
    pub id: MovementId,
    pub tenant_id: TenantId,
    pub number: String,
    pub from_location_id: LocationId,
    pub to_location_id: LocationId,
    pub moved_by: UserId,
    pub moved_at: DateTime<Utc>,
    pub notes: Option<String>,
    lines: Vec<TransferLine>,
}

impl StockTransfer {
    pub fn new(
        id: MovementId,
        tenant_id: TenantId,
        number: impl Into<String>,
        from_location_id: LocationId,
        to_location_id: LocationId,
        moved_by: UserId,
        moved_at: DateTime<Utc>,
        notes: Option<String>,
        lines: Vec<TransferLine>,
    ) -> DomainResult<Self> {
        if from_location_id == to_location_id {
            return Err(DomainError::validation(
                "transfer source and destination must differ",
            ));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("transfer must have at least one line"));
        }
        for line in &lines {
            if line.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "transfer line {}: quantity must be positive",
                    line.line_no
                )));
            }
        }
        Ok(Self {
            id,
            tenant_id,
            number: number.into(),
            from_location_id,
            to_location_id,
            moved_by,
            moved_at,
            notes,
            lines,
        })
    }

    pub fn lines(&self) -> &[TransferLine] {
        &self.lines
    }
}

impl Entity for StockTransfer {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Immutable record of a signed on-hand correction at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub id: MovementId,
    pub tenant_id: TenantId,
    pub number: String,
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub delta: i64,
    pub reason: AdjustmentReason,
    pub adjusted_by: UserId,
    pub adjusted_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl StockAdjustment {
    pub fn new(
        id: MovementId,
        tenant_id: TenantId,
        number: impl Into<String>,
        item_id: ItemId,
        location_id: LocationId,
        delta: i64,
        reason: AdjustmentReason,
        adjusted_by: UserId,
        adjusted_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> DomainResult<Self> {
        if delta == 0 {
            return Err(DomainError::validation("adjustment delta cannot be zero"));
        }
        Ok(Self {
            id,
            tenant_id,
            number: number.into(),
            item_id,
            location_id,
            delta,
            reason,
            adjusted_by,
            adjusted_at,
            notes,
        })
    }
}

impl Entity for StockAdjustment {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
