// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API gateway for the Prospecta call-session tracker.
//!
//! Exposes the session lifecycle, remaining-leads queue, call recording, and
//! campaign distribution over REST. Every authenticated route requires the
//! tenant context headers (`X-Tenant-Id`, `X-User-Id`) supplied by the
//! upstream router; the gateway never guesses a tenant.

pub mod auth;
pub mod context;
pub mod handlers;
pub mod server;

pub use context::Tenant;

pub use auth::AuthConfig;
pub use server::{start_server, AppState, ServerConfig};
