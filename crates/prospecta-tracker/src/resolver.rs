// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remaining-leads queue resolution.
//!
//! The queue is the caller's non-terminal pipeline leads in one campaign,
//! minus the leads already called within the caller's active session. Ordering
//! is most-recently-updated first with a stable tiebreaker, so a paused and
//! resumed session sees the same shrinking queue.

use prospecta_core::types::{RemainingLead, Session};
use prospecta_core::{PipelineStage, ProspectaError, TenantCtx};
use prospecta_storage::queries::{pipeline, sessions};
use prospecta_storage::Database;

/// Sentinel campaign ID used elsewhere for "every campaign"; meaningless here.
const ALL_CAMPAIGNS: &str = "all";

/// The resolved queue plus the session it was resolved against.
#[derive(Debug, Clone)]
pub struct RemainingQueue {
    pub leads: Vec<RemainingLead>,
    pub session: Option<Session>,
    pub has_active_session: bool,
}

impl RemainingQueue {
    pub fn remaining_count(&self) -> usize {
        self.leads.len()
    }
}

/// Resolve the leads still to call for one concrete campaign.
pub async fn remaining_leads(
    db: &Database,
    ctx: &TenantCtx,
    campaign_id: &str,
    filter_stage: Option<PipelineStage>,
) -> Result<RemainingQueue, ProspectaError> {
    if campaign_id.trim().is_empty() {
        return Err(ProspectaError::InvalidArgument(
            "campaign_id is required".to_string(),
        ));
    }
    if campaign_id == ALL_CAMPAIGNS {
        return Err(ProspectaError::InvalidArgument(
            "campaign_id must name one campaign, not `all`".to_string(),
        ));
    }

    let session = sessions::get_active_session_for_campaign(db, ctx, campaign_id).await?;
    let leads = pipeline::remaining_for_user(
        db,
        ctx,
        campaign_id,
        filter_stage,
        session.as_ref().map(|s| s.id.as_str()),
    )
    .await?;

    let has_active_session = session.is_some();
    Ok(RemainingQueue {
        leads,
        session,
        has_active_session,
    })
}
