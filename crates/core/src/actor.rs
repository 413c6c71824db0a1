//! Authenticated caller identity.
//!
//! The core trusts the identity provider: an [`Actor`] arrives fully formed
//! (from session middleware, an API key lookup, or a test fixture) and every
//! engine/projection operation takes its tenant scope from it.

use serde::{Deserialize, Serialize};

use crate::id::{TenantId, UserId};

/// Coarse-grained permission grants attached to an actor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    PostReceipts,
    PostSales,
    AdjustStock,
    ViewReports,
}

/// The authenticated identity on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub permissions: Vec<Permission>,
}

impl Actor {
    pub fn new(user_id: UserId, tenant_id: TenantId, permissions: Vec<Permission>) -> Self {
        Self {
            user_id,
            tenant_id,
            permissions,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
