use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::TenantId;

/// A stored API key for the public read API. The key string is the lookup
/// handle; the tenant it resolves to scopes every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub tenant_id: TenantId,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    pub fn new(
        key: impl Into<String>,
        tenant_id: TenantId,
        label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            tenant_id,
            label: label.into(),
            created_at,
        }
    }
}
