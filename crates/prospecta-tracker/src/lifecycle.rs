// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle orchestration.
//!
//! Completion and the campaign-assignment fold-in are guarded by the
//! conditional UPDATE in the store: a session folds into its campaign rollup
//! exactly once, and a second `end` call reports `NotFound` instead of double
//! counting.

use prospecta_core::time;
use prospecta_core::types::{Session, SessionStatus, SessionSummary};
use prospecta_core::{ProspectaError, TenantCtx};
use prospecta_storage::queries::{campaigns, sessions};
use prospecta_storage::Database;
use uuid::Uuid;

/// Begin a new session against a campaign.
///
/// No check is made for an existing active session; a user who starts twice
/// simply has two running clocks (see DESIGN.md).
pub async fn start(
    db: &Database,
    ctx: &TenantCtx,
    campaign_id: &str,
) -> Result<Session, ProspectaError> {
    if campaign_id.trim().is_empty() {
        return Err(ProspectaError::InvalidArgument(
            "campaign_id is required".to_string(),
        ));
    }
    let now = time::now();
    let session = Session {
        id: Uuid::new_v4().to_string(),
        tenant_id: ctx.tenant_id.clone(),
        user_id: ctx.user_id.clone(),
        campaign_id: campaign_id.to_string(),
        status: SessionStatus::Active,
        started_at: now.clone(),
        pause_time: None,
        resume_time: None,
        ended_at: None,
        pause_reason: None,
        pause_duration: 0,
        total_duration: None,
        calls_made: 0,
        meetings_obtained: 0,
        docs_sent: 0,
        follow_ups_created: 0,
        disqualified: 0,
        nrp: 0,
        created_at: now.clone(),
        updated_at: now,
    };
    sessions::create_session(db, &session).await?;
    tracing::info!(session_id = %session.id, campaign_id, "session started");
    Ok(session)
}

/// Pause an active session.
pub async fn pause(
    db: &Database,
    ctx: &TenantCtx,
    session_id: &str,
    reason: Option<String>,
) -> Result<(), ProspectaError> {
    let now = time::now();
    let n = sessions::mark_paused(db, ctx, session_id, &now, reason).await?;
    if n == 0 {
        return Err(ProspectaError::not_found("session", session_id));
    }
    tracing::info!(session_id, "session paused");
    Ok(())
}

/// Resume a paused session, accumulating the paused seconds.
///
/// The accumulated `pause_duration` is informational only; `end` computes
/// `total_duration` from wall-clock start to end without subtracting it
/// (see DESIGN.md).
pub async fn resume(
    db: &Database,
    ctx: &TenantCtx,
    session_id: &str,
) -> Result<(), ProspectaError> {
    let session = sessions::get_owned_session(db, ctx, session_id)
        .await?
        .ok_or_else(|| ProspectaError::not_found("session", session_id))?;
    let now = time::now();
    let paused_secs = match &session.pause_time {
        Some(pause_time) => time::seconds_between(pause_time, &now)?.max(0),
        None => 0,
    };
    let n = sessions::mark_resumed(db, ctx, session_id, &now, paused_secs).await?;
    if n == 0 {
        return Err(ProspectaError::not_found("session", session_id));
    }
    tracing::info!(session_id, paused_secs, "session resumed");
    Ok(())
}

/// End a session and fold its totals into the campaign assignment.
pub async fn end(
    db: &Database,
    ctx: &TenantCtx,
    session_id: &str,
) -> Result<SessionSummary, ProspectaError> {
    let session = sessions::get_owned_session(db, ctx, session_id)
        .await?
        .ok_or_else(|| ProspectaError::not_found("session", session_id))?;

    let now = time::now();
    let total = time::seconds_between(&session.started_at, &now)?.max(0);
    let n = sessions::complete_session(db, ctx, session_id, &now, total).await?;
    if n == 0 {
        // Already completed; do not fold in a second time.
        return Err(ProspectaError::not_found("session", session_id));
    }

    // Counters cannot move once the row is completed; re-read for the exact
    // values that were frozen.
    let session = sessions::get_owned_session(db, ctx, session_id)
        .await?
        .ok_or_else(|| ProspectaError::not_found("session", session_id))?;

    campaigns::fold_session_totals(
        db,
        &ctx.tenant_id,
        &session.campaign_id,
        &ctx.user_id,
        total,
        session.calls_made,
        session.meetings_obtained,
    )
    .await?;
    tracing::info!(
        session_id,
        total_duration = total,
        calls = session.calls_made,
        "session ended"
    );

    Ok(SessionSummary {
        duration: total,
        calls: session.calls_made,
        meetings: session.meetings_obtained,
        docs_sent: session.docs_sent,
        follow_ups: session.follow_ups_created,
        disqualified: session.disqualified,
        nrp: session.nrp,
    })
}

/// The caller's most recent active or paused session, if any.
pub async fn get_active(
    db: &Database,
    ctx: &TenantCtx,
) -> Result<Option<Session>, ProspectaError> {
    sessions::get_active_session(db, ctx).await
}

/// The caller's sessions, newest first.
pub async fn list_recent(
    db: &Database,
    ctx: &TenantCtx,
    limit: u32,
) -> Result<Vec<Session>, ProspectaError> {
    sessions::list_recent_sessions(db, ctx, limit).await
}
