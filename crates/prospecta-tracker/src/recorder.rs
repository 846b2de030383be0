// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call outcome recording.
//!
//! Recording a call is a five-step pipeline: validate, append the immutable
//! call record, refresh the lead's denormalized fields, reclassify the
//! pipeline stage, and bump the session counters. Stage reclassification is
//! the one step whose failure is logged and swallowed: a call must always be
//! recordable even when reclassification transiently fails. All other step
//! failures propagate and abort the steps not yet executed.

use prospecta_core::types::{CallRecord, CounterDeltas};
use prospecta_core::{classify, time, ProspectaError, Qualification, TenantCtx};
use prospecta_storage::queries::{calls, leads, pipeline, sessions};
use prospecta_storage::Database;
use uuid::Uuid;

/// One reported call outcome.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    /// `None` logs the call outside any session: no counter increments and no
    /// stage reclassification, since the campaign is unknown.
    pub session_id: Option<String>,
    pub lead_id: String,
    pub duration: i64,
    pub qualification: String,
    pub notes: Option<String>,
    pub follow_up_date: Option<String>,
}

/// Record one call outcome.
pub async fn record_call(
    db: &Database,
    ctx: &TenantCtx,
    outcome: CallOutcome,
) -> Result<CallRecord, ProspectaError> {
    let session = match &outcome.session_id {
        Some(session_id) => Some(
            sessions::get_owned_session(db, ctx, session_id)
                .await?
                .ok_or_else(|| ProspectaError::not_found("session", session_id))?,
        ),
        None => None,
    };
    leads::get_lead(db, &ctx.tenant_id, &outcome.lead_id)
        .await?
        .ok_or_else(|| ProspectaError::not_found("lead", &outcome.lead_id))?;

    let now = time::now();
    let record = CallRecord {
        id: Uuid::new_v4().to_string(),
        tenant_id: ctx.tenant_id.clone(),
        lead_id: outcome.lead_id.clone(),
        user_id: ctx.user_id.clone(),
        session_id: outcome.session_id.clone(),
        duration: outcome.duration,
        qualification: outcome.qualification.clone(),
        notes: outcome.notes.clone(),
        follow_up_date: outcome.follow_up_date.clone(),
        created_at: now.clone(),
    };
    calls::insert_call(db, &record).await?;

    leads::touch_after_call(
        db,
        &ctx.tenant_id,
        &outcome.lead_id,
        &outcome.qualification,
        &now,
        outcome.follow_up_date.clone(),
        outcome.notes.clone(),
    )
    .await?;

    if let Some(session) = &session {
        let stage = classify(&outcome.qualification);
        if let Err(err) = pipeline::upsert_stage(
            db,
            &ctx.tenant_id,
            &outcome.lead_id,
            &session.campaign_id,
            stage,
            &ctx.user_id,
        )
        .await
        {
            // The call stays recorded; the stage will converge on the next call.
            tracing::warn!(
                lead_id = %outcome.lead_id,
                campaign_id = %session.campaign_id,
                %stage,
                error = %err,
                "pipeline reclassification failed, call recorded anyway"
            );
        }

        let deltas = CounterDeltas::for_call(
            Qualification::parse_lenient(&outcome.qualification),
            outcome.follow_up_date.is_some(),
        );
        sessions::apply_counter_deltas(db, &ctx.tenant_id, &session.id, deltas).await?;
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;
    use prospecta_core::types::Lead;
    use prospecta_core::PipelineStage;
    use prospecta_storage::queries::pipeline::get_stage;

    fn ctx() -> TenantCtx {
        TenantCtx::new("t-1", "u-1")
    }

    async fn seed_lead(db: &Database, id: &str) {
        leads::insert_lead(
            db,
            &Lead {
                id: id.to_string(),
                tenant_id: "t-1".to_string(),
                company_name: Some("Acme".to_string()),
                contact_name: None,
                phone: None,
                assigned_to: Some("u-1".to_string()),
                qualification: None,
                last_call_date: None,
                next_follow_up: None,
                notes: None,
                created_at: time::now(),
                updated_at: time::now(),
            },
        )
        .await
        .unwrap();
    }

    fn outcome(session_id: Option<&str>, lead_id: &str, qualification: &str) -> CallOutcome {
        CallOutcome {
            session_id: session_id.map(str::to_string),
            lead_id: lead_id.to_string(),
            duration: 120,
            qualification: qualification.to_string(),
            notes: Some("note".to_string()),
            follow_up_date: None,
        }
    }

    #[tokio::test]
    async fn recording_updates_record_lead_stage_and_counters() {
        let db = Database::open_in_memory().await.unwrap();
        seed_lead(&db, "l-1").await;
        let session = lifecycle::start(&db, &ctx(), "c-1").await.unwrap();

        record_call(&db, &ctx(), outcome(Some(&session.id), "l-1", "meeting_scheduled"))
            .await
            .unwrap();

        let stage = get_stage(&db, "t-1", "l-1", "c-1").await.unwrap().unwrap();
        assert_eq!(stage.stage, PipelineStage::HighlyQualified);

        let lead = leads::get_lead(&db, "t-1", "l-1").await.unwrap().unwrap();
        assert_eq!(lead.qualification.as_deref(), Some("meeting_scheduled"));
        assert!(lead.last_call_date.is_some());

        let session = sessions::get_session(&db, "t-1", &session.id).await.unwrap().unwrap();
        assert_eq!(session.calls_made, 1);
        assert_eq!(session.meetings_obtained, 1);
        assert_eq!(session.nrp, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_session_fails_before_any_write() {
        let db = Database::open_in_memory().await.unwrap();
        seed_lead(&db, "l-1").await;
        let err = record_call(&db, &ctx(), outcome(Some("no-such"), "l-1", "interested"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProspectaError::NotFound { .. }));

        let history = calls::list_calls_for_lead(&db, "t-1", "l-1").await.unwrap();
        assert!(history.is_empty());
        let lead = leads::get_lead(&db, "t-1", "l-1").await.unwrap().unwrap();
        assert!(lead.last_call_date.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_lead_fails_before_any_write() {
        let db = Database::open_in_memory().await.unwrap();
        let session = lifecycle::start(&db, &ctx(), "c-1").await.unwrap();
        let err = record_call(&db, &ctx(), outcome(Some(&session.id), "l-missing", "nrp"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProspectaError::NotFound { .. }));

        let got = sessions::get_session(&db, "t-1", &session.id).await.unwrap().unwrap();
        assert_eq!(got.calls_made, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn sessionless_call_skips_stage_and_counters() {
        let db = Database::open_in_memory().await.unwrap();
        seed_lead(&db, "l-1").await;

        record_call(&db, &ctx(), outcome(None, "l-1", "interested")).await.unwrap();

        let history = calls::list_calls_for_lead(&db, "t-1", "l-1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].session_id.is_none());
        assert!(get_stage(&db, "t-1", "l-1", "c-1").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unrecognized_qualification_counts_the_call_only() {
        let db = Database::open_in_memory().await.unwrap();
        seed_lead(&db, "l-1").await;
        let session = lifecycle::start(&db, &ctx(), "c-1").await.unwrap();

        record_call(&db, &ctx(), outcome(Some(&session.id), "l-1", "xyz")).await.unwrap();

        let stage = get_stage(&db, "t-1", "l-1", "c-1").await.unwrap().unwrap();
        assert_eq!(stage.stage, PipelineStage::ColdCall);
        let got = sessions::get_session(&db, "t-1", &session.id).await.unwrap().unwrap();
        assert_eq!(got.calls_made, 1);
        assert_eq!(got.meetings_obtained + got.docs_sent + got.disqualified + got.nrp, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn follow_up_date_increments_follow_ups() {
        let db = Database::open_in_memory().await.unwrap();
        seed_lead(&db, "l-1").await;
        let session = lifecycle::start(&db, &ctx(), "c-1").await.unwrap();

        let mut with_follow_up = outcome(Some(&session.id), "l-1", "callback");
        with_follow_up.follow_up_date = Some("2026-09-01".to_string());
        record_call(&db, &ctx(), with_follow_up).await.unwrap();

        let got = sessions::get_session(&db, "t-1", &session.id).await.unwrap().unwrap();
        assert_eq!(got.follow_ups_created, 1);
        let lead = leads::get_lead(&db, "t-1", "l-1").await.unwrap().unwrap();
        assert_eq!(lead.next_follow_up.as_deref(), Some("2026-09-01"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_calls_lose_no_counter_updates() {
        let db = Database::open_in_memory().await.unwrap();
        let session = lifecycle::start(&db, &ctx(), "c-1").await.unwrap();
        const N: usize = 16;
        for i in 0..N {
            seed_lead(&db, &format!("l-{i}")).await;
        }

        let mut handles = Vec::new();
        for i in 0..N {
            let db = db.clone();
            let session_id = session.id.clone();
            handles.push(tokio::spawn(async move {
                record_call(
                    &db,
                    &TenantCtx::new("t-1", "u-1"),
                    CallOutcome {
                        session_id: Some(session_id),
                        lead_id: format!("l-{i}"),
                        duration: 30,
                        qualification: "nrp".to_string(),
                        notes: None,
                        follow_up_date: None,
                    },
                )
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let got = sessions::get_session(&db, "t-1", &session.id).await.unwrap().unwrap();
        assert_eq!(got.calls_made, N as i64);
        assert_eq!(got.nrp, N as i64);
        db.close().await.unwrap();
    }
}
