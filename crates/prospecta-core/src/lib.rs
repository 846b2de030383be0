// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Prospecta call-session tracker.
//!
//! Provides the error taxonomy, the explicit tenant context, the domain
//! types shared across the workspace, and the qualification → pipeline-stage
//! classifier (the single source of truth for the taxonomy).

pub mod classify;
pub mod context;
pub mod error;
pub mod time;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use classify::{classify, stage_for, PipelineStage, Qualification};
pub use context::TenantCtx;
pub use error::ProspectaError;
