// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session row operations.
//!
//! Lifecycle transitions are expressed as conditional UPDATEs that return the
//! affected-row count; callers turn a zero count into "not found or wrong
//! state". Counter updates are always relative (`col = col + ?`) so concurrent
//! calls against the same session never lose increments.

use prospecta_core::{ProspectaError, TenantCtx};
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::{CounterDeltas, Session, SessionStatus};

const SESSION_COLUMNS: &str = "id, tenant_id, user_id, campaign_id, status, started_at, \
     pause_time, resume_time, ended_at, pause_reason, pause_duration, total_duration, \
     calls_made, meetings_obtained, docs_sent, follow_ups_created, disqualified, nrp, \
     created_at, updated_at";

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    let status: String = row.get(4)?;
    let status: SessionStatus = status.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Session {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        user_id: row.get(2)?,
        campaign_id: row.get(3)?,
        status,
        started_at: row.get(5)?,
        pause_time: row.get(6)?,
        resume_time: row.get(7)?,
        ended_at: row.get(8)?,
        pause_reason: row.get(9)?,
        pause_duration: row.get(10)?,
        total_duration: row.get(11)?,
        calls_made: row.get(12)?,
        meetings_obtained: row.get(13)?,
        docs_sent: row.get(14)?,
        follow_ups_created: row.get(15)?,
        disqualified: row.get(16)?,
        nrp: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}

/// Insert a new session row.
pub async fn create_session(db: &Database, session: &Session) -> Result<(), ProspectaError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, tenant_id, user_id, campaign_id, status, started_at,
                     pause_duration, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    session.id,
                    session.tenant_id,
                    session.user_id,
                    session.campaign_id,
                    session.status.to_string(),
                    session.started_at,
                    session.pause_duration,
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a session by ID within a tenant.
pub async fn get_session(
    db: &Database,
    tenant_id: &str,
    id: &str,
) -> Result<Option<Session>, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let sql =
                format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE tenant_id = ?1 AND id = ?2");
            let mut stmt = conn.prepare(&sql)?;
            let session = stmt
                .query_row(params![tenant_id, id], row_to_session)
                .optional()?;
            Ok(session)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a session by ID, scoped to the calling user.
pub async fn get_owned_session(
    db: &Database,
    ctx: &TenantCtx,
    id: &str,
) -> Result<Option<Session>, ProspectaError> {
    let ctx = ctx.clone();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE tenant_id = ?1 AND user_id = ?2 AND id = ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let session = stmt
                .query_row(params![ctx.tenant_id, ctx.user_id, id], row_to_session)
                .optional()?;
            Ok(session)
        })
        .await
        .map_err(map_tr_err)
}

/// Get the caller's most recent non-completed session, if any.
pub async fn get_active_session(
    db: &Database,
    ctx: &TenantCtx,
) -> Result<Option<Session>, ProspectaError> {
    let ctx = ctx.clone();
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE tenant_id = ?1 AND user_id = ?2 AND status IN ('active', 'paused')
                 ORDER BY started_at DESC LIMIT 1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let session = stmt
                .query_row(params![ctx.tenant_id, ctx.user_id], row_to_session)
                .optional()?;
            Ok(session)
        })
        .await
        .map_err(map_tr_err)
}

/// Get the caller's most recent non-completed session against one campaign.
pub async fn get_active_session_for_campaign(
    db: &Database,
    ctx: &TenantCtx,
    campaign_id: &str,
) -> Result<Option<Session>, ProspectaError> {
    let ctx = ctx.clone();
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE tenant_id = ?1 AND user_id = ?2 AND campaign_id = ?3
                   AND status IN ('active', 'paused')
                 ORDER BY started_at DESC LIMIT 1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let session = stmt
                .query_row(params![ctx.tenant_id, ctx.user_id, campaign_id], row_to_session)
                .optional()?;
            Ok(session)
        })
        .await
        .map_err(map_tr_err)
}

/// List the caller's sessions, newest first.
pub async fn list_recent_sessions(
    db: &Database,
    ctx: &TenantCtx,
    limit: u32,
) -> Result<Vec<Session>, ProspectaError> {
    let ctx = ctx.clone();
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE tenant_id = ?1 AND user_id = ?2
                 ORDER BY started_at DESC LIMIT ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let sessions = stmt
                .query_map(params![ctx.tenant_id, ctx.user_id, limit], row_to_session)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sessions)
        })
        .await
        .map_err(map_tr_err)
}

/// Mark an active session paused. Returns the affected-row count: 0 means the
/// session does not exist, is not owned by the caller, or is not active.
pub async fn mark_paused(
    db: &Database,
    ctx: &TenantCtx,
    id: &str,
    pause_time: &str,
    reason: Option<String>,
) -> Result<usize, ProspectaError> {
    let ctx = ctx.clone();
    let id = id.to_string();
    let pause_time = pause_time.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE sessions SET status = 'paused', pause_time = ?1, pause_reason = ?2,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE tenant_id = ?3 AND user_id = ?4 AND id = ?5 AND status = 'active'",
                params![pause_time, reason, ctx.tenant_id, ctx.user_id, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// Mark a paused session active again, accumulating the paused seconds and
/// clearing the pause reason. Returns the affected-row count.
pub async fn mark_resumed(
    db: &Database,
    ctx: &TenantCtx,
    id: &str,
    resume_time: &str,
    paused_secs: i64,
) -> Result<usize, ProspectaError> {
    let ctx = ctx.clone();
    let id = id.to_string();
    let resume_time = resume_time.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE sessions SET status = 'active', resume_time = ?1,
                     pause_duration = pause_duration + ?2, pause_reason = NULL,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE tenant_id = ?3 AND user_id = ?4 AND id = ?5 AND status = 'paused'",
                params![resume_time, paused_secs, ctx.tenant_id, ctx.user_id, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// Complete a session, setting its end time and total duration exactly once.
///
/// The `status IN ('active', 'paused')` guard makes completion idempotent at
/// the row level: a second end call matches zero rows, so callers can skip the
/// assignment fold-in and avoid double counting.
pub async fn complete_session(
    db: &Database,
    ctx: &TenantCtx,
    id: &str,
    ended_at: &str,
    total_duration: i64,
) -> Result<usize, ProspectaError> {
    let ctx = ctx.clone();
    let id = id.to_string();
    let ended_at = ended_at.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE sessions SET status = 'completed', ended_at = ?1, total_duration = ?2,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE tenant_id = ?3 AND user_id = ?4 AND id = ?5
                   AND status IN ('active', 'paused')",
                params![ended_at, total_duration, ctx.tenant_id, ctx.user_id, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply per-call counter deltas to a session in one relative UPDATE.
pub async fn apply_counter_deltas(
    db: &Database,
    tenant_id: &str,
    id: &str,
    deltas: CounterDeltas,
) -> Result<usize, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE sessions SET
                     calls_made = calls_made + ?1,
                     meetings_obtained = meetings_obtained + ?2,
                     docs_sent = docs_sent + ?3,
                     follow_ups_created = follow_ups_created + ?4,
                     disqualified = disqualified + ?5,
                     nrp = nrp + ?6,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE tenant_id = ?7 AND id = ?8",
                params![
                    deltas.calls_made,
                    deltas.meetings_obtained,
                    deltas.docs_sent,
                    deltas.follow_ups_created,
                    deltas.disqualified,
                    deltas.nrp,
                    tenant_id,
                    id,
                ],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospecta_core::time;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn ctx() -> TenantCtx {
        TenantCtx::new("t-1", "u-1")
    }

    fn make_session(id: &str, started_at: &str) -> Session {
        Session {
            id: id.to_string(),
            tenant_id: "t-1".to_string(),
            user_id: "u-1".to_string(),
            campaign_id: "c-1".to_string(),
            status: SessionStatus::Active,
            started_at: started_at.to_string(),
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
            created_at: time::now(),
            updated_at: time::now(),
        }
    }

    #[tokio::test]
    async fn create_and_get_session_roundtrips() {
        let db = setup_db().await;
        let session = make_session("s-1", "2026-08-25T09:00:00.000Z");
        create_session(&db, &session).await.unwrap();

        let got = get_session(&db, "t-1", "s-1").await.unwrap().unwrap();
        assert_eq!(got.id, "s-1");
        assert_eq!(got.status, SessionStatus::Active);
        assert_eq!(got.calls_made, 0);
        assert_eq!(got.total_duration, None);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn tenant_scoping_hides_foreign_rows() {
        let db = setup_db().await;
        create_session(&db, &make_session("s-1", "2026-08-25T09:00:00.000Z"))
            .await
            .unwrap();
        assert!(get_session(&db, "t-2", "s-1").await.unwrap().is_none());
        let other = TenantCtx::new("t-1", "u-2");
        assert!(get_owned_session(&db, &other, "s-1").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn active_lookup_prefers_newest_and_includes_paused() {
        let db = setup_db().await;
        create_session(&db, &make_session("s-old", "2026-08-25T08:00:00.000Z"))
            .await
            .unwrap();
        create_session(&db, &make_session("s-new", "2026-08-25T09:00:00.000Z"))
            .await
            .unwrap();

        let active = get_active_session(&db, &ctx()).await.unwrap().unwrap();
        assert_eq!(active.id, "s-new");

        let n = mark_paused(&db, &ctx(), "s-new", "2026-08-25T09:30:00.000Z", None)
            .await
            .unwrap();
        assert_eq!(n, 1);
        let active = get_active_session(&db, &ctx()).await.unwrap().unwrap();
        assert_eq!(active.id, "s-new");
        assert_eq!(active.status, SessionStatus::Paused);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pause_requires_active_and_resume_requires_paused() {
        let db = setup_db().await;
        create_session(&db, &make_session("s-1", "2026-08-25T09:00:00.000Z"))
            .await
            .unwrap();

        // Resume before pause matches nothing.
        let n = mark_resumed(&db, &ctx(), "s-1", "2026-08-25T09:10:00.000Z", 60)
            .await
            .unwrap();
        assert_eq!(n, 0);

        assert_eq!(
            mark_paused(&db, &ctx(), "s-1", "2026-08-25T09:10:00.000Z", Some("break".into()))
                .await
                .unwrap(),
            1
        );
        // Double pause matches nothing.
        assert_eq!(
            mark_paused(&db, &ctx(), "s-1", "2026-08-25T09:11:00.000Z", None)
                .await
                .unwrap(),
            0
        );

        let got = get_session(&db, "t-1", "s-1").await.unwrap().unwrap();
        assert_eq!(got.pause_reason.as_deref(), Some("break"));

        assert_eq!(
            mark_resumed(&db, &ctx(), "s-1", "2026-08-25T09:15:00.000Z", 300)
                .await
                .unwrap(),
            1
        );
        let got = get_session(&db, "t-1", "s-1").await.unwrap().unwrap();
        assert_eq!(got.status, SessionStatus::Active);
        assert_eq!(got.pause_duration, 300);
        // Resume clears the reason.
        assert_eq!(got.pause_reason, None);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pause_duration_accumulates_across_cycles() {
        let db = setup_db().await;
        create_session(&db, &make_session("s-1", "2026-08-25T09:00:00.000Z"))
            .await
            .unwrap();
        for paused in [120, 60] {
            mark_paused(&db, &ctx(), "s-1", "2026-08-25T09:10:00.000Z", None)
                .await
                .unwrap();
            mark_resumed(&db, &ctx(), "s-1", "2026-08-25T09:12:00.000Z", paused)
                .await
                .unwrap();
        }
        let got = get_session(&db, "t-1", "s-1").await.unwrap().unwrap();
        assert_eq!(got.pause_duration, 180);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn complete_session_is_single_shot() {
        let db = setup_db().await;
        create_session(&db, &make_session("s-1", "2026-08-25T09:00:00.000Z"))
            .await
            .unwrap();

        let n = complete_session(&db, &ctx(), "s-1", "2026-08-25T10:00:00.000Z", 3600)
            .await
            .unwrap();
        assert_eq!(n, 1);
        // Second completion matches zero rows.
        let n = complete_session(&db, &ctx(), "s-1", "2026-08-25T11:00:00.000Z", 7200)
            .await
            .unwrap();
        assert_eq!(n, 0);

        let got = get_session(&db, "t-1", "s-1").await.unwrap().unwrap();
        assert_eq!(got.status, SessionStatus::Completed);
        assert_eq!(got.total_duration, Some(3600));
        assert_eq!(got.ended_at.as_deref(), Some("2026-08-25T10:00:00.000Z"));
        assert!(get_active_session(&db, &ctx()).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn paused_sessions_can_be_completed() {
        let db = setup_db().await;
        create_session(&db, &make_session("s-1", "2026-08-25T09:00:00.000Z"))
            .await
            .unwrap();
        mark_paused(&db, &ctx(), "s-1", "2026-08-25T09:30:00.000Z", None)
            .await
            .unwrap();
        let n = complete_session(&db, &ctx(), "s-1", "2026-08-25T10:00:00.000Z", 3600)
            .await
            .unwrap();
        assert_eq!(n, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn counter_deltas_are_relative_increments() {
        let db = setup_db().await;
        create_session(&db, &make_session("s-1", "2026-08-25T09:00:00.000Z"))
            .await
            .unwrap();

        let meeting = CounterDeltas {
            calls_made: 1,
            meetings_obtained: 1,
            ..CounterDeltas::default()
        };
        let nrp = CounterDeltas {
            calls_made: 1,
            nrp: 1,
            ..CounterDeltas::default()
        };
        apply_counter_deltas(&db, "t-1", "s-1", meeting).await.unwrap();
        apply_counter_deltas(&db, "t-1", "s-1", nrp).await.unwrap();
        apply_counter_deltas(&db, "t-1", "s-1", nrp).await.unwrap();

        let got = get_session(&db, "t-1", "s-1").await.unwrap().unwrap();
        assert_eq!(got.calls_made, 3);
        assert_eq!(got.meetings_obtained, 1);
        assert_eq!(got.nrp, 2);
        assert_eq!(got.docs_sent, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_recent_sessions_orders_and_limits() {
        let db = setup_db().await;
        for (id, start) in [
            ("s-1", "2026-08-25T08:00:00.000Z"),
            ("s-2", "2026-08-25T09:00:00.000Z"),
            ("s-3", "2026-08-25T10:00:00.000Z"),
        ] {
            create_session(&db, &make_session(id, start)).await.unwrap();
        }
        let recent = list_recent_sessions(&db, &ctx(), 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "s-3");
        assert_eq!(recent[1].id, "s-2");
        db.close().await.unwrap();
    }
}
