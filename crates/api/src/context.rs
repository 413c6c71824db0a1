use stockbook_core::TenantId;

/// Tenant scope of an authenticated request, set by the API-key middleware.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
