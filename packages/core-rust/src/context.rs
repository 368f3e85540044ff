/// Header carrying the tenant identifier on inbound requests.
pub const TENANT_ID_HEADER: &str = "X-Tenant-Id";

/// Per-request tenant scope.
///
/// Starts unresolved and becomes resolved at most once, when the inbound
/// request carries a non-blank tenant header. Read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<String>,
}

impl TenantContext {
    /// A context with no tenant.
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// A context for `tenant_id`. Blank ids yield an unresolved context.
    #[must_use]
    pub fn resolved(tenant_id: impl Into<String>) -> Self {
        let tenant_id = tenant_id.into();
        if tenant_id.trim().is_empty() {
            Self::unresolved()
        } else {
            Self {
                tenant_id: Some(tenant_id),
            }
        }
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    #[must_use]
    pub fn has_tenant(&self) -> bool {
        self.tenant_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}
