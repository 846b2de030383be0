// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant context extraction.
//!
//! The upstream router resolves authentication to a `(tenant, user)` pair and
//! forwards it in the `X-Tenant-Id` and `X-User-Id` headers. Cross-tenant
//! checks happen there; this extractor only refuses requests that arrive
//! without the pair.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use prospecta_core::TenantCtx;

use crate::handlers::ErrorResponse;

/// Extractor wrapper around [`TenantCtx`] for axum handlers.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantCtx);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = header(parts, "x-tenant-id");
        let user_id = header(parts, "x-user-id");
        match (tenant_id, user_id) {
            (Some(tenant_id), Some(user_id)) => Ok(Tenant(TenantCtx::new(tenant_id, user_id))),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "missing X-Tenant-Id or X-User-Id header".to_string(),
                }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<Tenant, StatusCode> {
        let (mut parts, ()) = req.into_parts();
        Tenant::from_request_parts(&mut parts, &())
            .await
            .map_err(|(status, _)| status)
    }

    #[tokio::test]
    async fn both_headers_present_yields_a_context() {
        let req = Request::builder()
            .header("x-tenant-id", "t-1")
            .header("x-user-id", "u-1")
            .body(())
            .unwrap();
        let Tenant(ctx) = extract(req).await.unwrap();
        assert_eq!(ctx.tenant_id, "t-1");
        assert_eq!(ctx.user_id, "u-1");
    }

    #[tokio::test]
    async fn missing_or_blank_headers_are_rejected() {
        let req = Request::builder().header("x-tenant-id", "t-1").body(()).unwrap();
        assert_eq!(extract(req).await.unwrap_err(), StatusCode::BAD_REQUEST);

        let req = Request::builder()
            .header("x-tenant-id", "t-1")
            .header("x-user-id", "   ")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap_err(), StatusCode::BAD_REQUEST);
    }
}
