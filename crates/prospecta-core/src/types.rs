// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage, tracker, and gateway crates.
//!
//! Timestamps are RFC 3339 strings as stored; durations are integer seconds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::classify::{PipelineStage, Qualification};

/// Lifecycle state of a prospection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

/// One timed block of outbound-call activity by one user against one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub campaign_id: String,
    pub status: SessionStatus,
    pub started_at: String,
    pub pause_time: Option<String>,
    pub resume_time: Option<String>,
    pub ended_at: Option<String>,
    pub pause_reason: Option<String>,
    /// Accumulated paused seconds. Informational: not subtracted from
    /// `total_duration` (see DESIGN.md).
    pub pause_duration: i64,
    /// Elapsed seconds, set exactly once at completion.
    pub total_duration: Option<i64>,
    pub calls_made: i64,
    pub meetings_obtained: i64,
    pub docs_sent: i64,
    pub follow_ups_created: i64,
    pub disqualified: i64,
    pub nrp: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Summary returned when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub duration: i64,
    pub calls: i64,
    pub meetings: i64,
    pub docs_sent: i64,
    pub follow_ups: i64,
    pub disqualified: i64,
    pub nrp: i64,
}

/// Per-call increments applied to a session's counters in a single
/// store-level statement (never read-modify-write in application code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDeltas {
    pub calls_made: i64,
    pub meetings_obtained: i64,
    pub docs_sent: i64,
    pub follow_ups_created: i64,
    pub disqualified: i64,
    pub nrp: i64,
}

impl CounterDeltas {
    /// Deltas for one recorded call.
    ///
    /// `qualification` is `None` when the reported string was unrecognized;
    /// the call still counts, the family counters do not move.
    pub fn for_call(qualification: Option<Qualification>, has_follow_up: bool) -> Self {
        let mut deltas = Self {
            calls_made: 1,
            ..Self::default()
        };
        if has_follow_up {
            deltas.follow_ups_created = 1;
        }
        if let Some(q) = qualification {
            if q.is_meeting() {
                deltas.meetings_obtained = 1;
            }
            if q.is_doc_sent() {
                deltas.docs_sent = 1;
            }
            if q.is_disqualifying() {
                deltas.disqualified = 1;
            }
            if q.is_nrp() {
                deltas.nrp = 1;
            }
        }
        deltas
    }
}

/// One logged call. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub tenant_id: String,
    pub lead_id: String,
    pub user_id: String,
    /// A call may be logged outside a session.
    pub session_id: Option<String>,
    pub duration: i64,
    /// The qualification exactly as reported, including unrecognized values.
    pub qualification: String,
    pub notes: Option<String>,
    pub follow_up_date: Option<String>,
    pub created_at: String,
}

/// Current classification of a lead inside a campaign.
///
/// Keyed by (lead_id, campaign_id); exactly one row per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineLead {
    pub id: String,
    pub tenant_id: String,
    pub lead_id: String,
    pub campaign_id: String,
    pub stage: PipelineStage,
    pub assigned_user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A remaining-queue entry: the pipeline row joined with lead display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainingLead {
    pub pipeline_id: String,
    pub lead_id: String,
    pub stage: PipelineStage,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub updated_at: String,
}

/// Per-user rollup inside a campaign. Counters accumulate across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignAssignment {
    pub campaign_id: String,
    pub user_id: String,
    pub tenant_id: String,
    pub leads_assigned: i64,
    pub time_spent: i64,
    pub calls_made: i64,
    pub meetings_scheduled: i64,
}

/// A prospective customer record, scoped to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub tenant_id: String,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub assigned_to: Option<String>,
    /// Last reported qualification, denormalized from call records.
    pub qualification: Option<String>,
    pub last_call_date: Option<String>,
    pub next_follow_up: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A bounded outreach effort with assigned users and a pool of leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}
