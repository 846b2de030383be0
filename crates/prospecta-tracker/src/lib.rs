// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-session tracking and pipeline-stage logic.
//!
//! Orchestrates the session lifecycle (start/pause/resume/end), the
//! remaining-leads queue, call outcome recording with stage reclassification,
//! and campaign lead distribution. Every operation takes an explicit
//! [`prospecta_core::TenantCtx`]; nothing here reads ambient state.

pub mod lifecycle;
pub mod rebalancer;
pub mod recorder;
pub mod resolver;

pub use recorder::CallOutcome;
pub use resolver::RemainingQueue;
