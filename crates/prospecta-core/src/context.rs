// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant and user context threaded explicitly through every operation.
//!
//! Cross-tenant access is rejected upstream (the gateway trusts its proxy);
//! components here only scope queries. The context is an explicit value,
//! never ambient state.

use serde::{Deserialize, Serialize};

/// The (tenant, user) pair that scopes every query and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantCtx {
    /// Top-level isolation boundary (a customer organization).
    pub tenant_id: String,
    /// The calling user within that tenant.
    pub user_id: String,
}

impl TenantCtx {
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
        }
    }
}
