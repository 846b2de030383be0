// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage models.
//!
//! The row shapes are the domain types from `prospecta-core`; re-exported here
//! so query modules and downstream crates import them from one place.

pub use prospecta_core::types::{
    Campaign, CampaignAssignment, CallRecord, CounterDeltas, Lead, PipelineLead, RemainingLead,
    Session, SessionStatus,
};
