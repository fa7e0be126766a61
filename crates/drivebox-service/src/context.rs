//! Per-request tenant context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current tenant-scoped request.
///
/// The caller layer resolves identity to a tenant namespace and builds the
/// service set around that tenant's database pool; this context carries the
/// tenant label into every operation so logs can be attributed. Explicit
/// context passing replaces ambient per-process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantContext {
    /// The tenant namespace this request operates on.
    pub tenant: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl TenantContext {
    /// Creates a new tenant context.
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            request_time: Utc::now(),
        }
    }
}
