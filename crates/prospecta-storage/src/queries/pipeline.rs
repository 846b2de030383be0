// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline stage rows, one per (lead, campaign) pair.
//!
//! Stage writes go through a single upsert keyed on `(lead_id, campaign_id)`,
//! so repeated classification of the same pair converges on one row with
//! last-writer-wins semantics.

use prospecta_core::{PipelineStage, ProspectaError, TenantCtx};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::database::{map_tr_err, Database};
use crate::models::{PipelineLead, RemainingLead};

fn parse_stage(idx: usize, raw: String) -> rusqlite::Result<PipelineStage> {
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Upsert the stage for a (lead, campaign) pair.
///
/// Inserts a fresh row on first classification; on conflict updates the stage
/// and assignee in place and bumps `updated_at`.
pub async fn upsert_stage(
    db: &Database,
    tenant_id: &str,
    lead_id: &str,
    campaign_id: &str,
    stage: PipelineStage,
    assigned_user_id: &str,
) -> Result<(), ProspectaError> {
    let id = Uuid::new_v4().to_string();
    let tenant_id = tenant_id.to_string();
    let lead_id = lead_id.to_string();
    let campaign_id = campaign_id.to_string();
    let assigned_user_id = assigned_user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO pipeline_leads (id, tenant_id, lead_id, campaign_id, stage, assigned_user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (lead_id, campaign_id) DO UPDATE SET
                     stage = excluded.stage,
                     assigned_user_id = excluded.assigned_user_id,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![id, tenant_id, lead_id, campaign_id, stage.to_string(), assigned_user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get the pipeline row for a (lead, campaign) pair.
pub async fn get_stage(
    db: &Database,
    tenant_id: &str,
    lead_id: &str,
    campaign_id: &str,
) -> Result<Option<PipelineLead>, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let lead_id = lead_id.to_string();
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, tenant_id, lead_id, campaign_id, stage, assigned_user_id,
                        created_at, updated_at
                 FROM pipeline_leads
                 WHERE tenant_id = ?1 AND lead_id = ?2 AND campaign_id = ?3",
            )?;
            let row = stmt
                .query_row(params![tenant_id, lead_id, campaign_id], |row| {
                    Ok(PipelineLead {
                        id: row.get(0)?,
                        tenant_id: row.get(1)?,
                        lead_id: row.get(2)?,
                        campaign_id: row.get(3)?,
                        stage: parse_stage(4, row.get(4)?)?,
                        assigned_user_id: row.get(5)?,
                        created_at: row.get(6)?,
                        updated_at: row.get(7)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(map_tr_err)
}

/// Remaining leads for one user inside one campaign, joined with lead display
/// fields.
///
/// Excludes terminal stages always, optionally narrows to one stage, and
/// optionally subtracts leads already called within `exclude_session`. Ordered
/// by most recent stage change, with the row ID as a stable tiebreaker.
pub async fn remaining_for_user(
    db: &Database,
    ctx: &TenantCtx,
    campaign_id: &str,
    stage_filter: Option<PipelineStage>,
    exclude_session: Option<&str>,
) -> Result<Vec<RemainingLead>, ProspectaError> {
    let ctx = ctx.clone();
    let campaign_id = campaign_id.to_string();
    let stage_filter = stage_filter.map(|s| s.to_string());
    let exclude_session = exclude_session.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT pl.id, pl.lead_id, pl.stage, l.company_name, l.contact_name, l.phone,
                        pl.updated_at
                 FROM pipeline_leads pl
                 JOIN leads l ON l.id = pl.lead_id AND l.tenant_id = pl.tenant_id
                 WHERE pl.tenant_id = ?1 AND pl.campaign_id = ?2 AND pl.assigned_user_id = ?3
                   AND pl.stage NOT IN (?4, ?5)
                   AND (?6 IS NULL OR pl.stage = ?6)
                   AND (?7 IS NULL OR pl.lead_id NOT IN (
                         SELECT lead_id FROM call_records
                         WHERE tenant_id = ?1 AND session_id = ?7))
                 ORDER BY pl.updated_at DESC, pl.id",
            )?;
            let rows = stmt
                .query_map(
                    params![
                        ctx.tenant_id,
                        campaign_id,
                        ctx.user_id,
                        PipelineStage::Won.to_string(),
                        PipelineStage::Lost.to_string(),
                        stage_filter,
                        exclude_session,
                    ],
                    |row| {
                        Ok(RemainingLead {
                            pipeline_id: row.get(0)?,
                            lead_id: row.get(1)?,
                            stage: parse_stage(2, row.get(2)?)?,
                            company_name: row.get(3)?,
                            contact_name: row.get(4)?,
                            phone: row.get(5)?,
                            updated_at: row.get(6)?,
                        })
                    },
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Lead IDs assigned to one user inside one campaign, in insertion order.
pub async fn lead_ids_for_user(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
    user_id: &str,
) -> Result<Vec<String>, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT lead_id FROM pipeline_leads
                 WHERE tenant_id = ?1 AND campaign_id = ?2 AND assigned_user_id = ?3
                 ORDER BY created_at, lead_id",
            )?;
            let ids = stmt
                .query_map(params![tenant_id, campaign_id, user_id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}

/// Reassign a batch of pipeline rows to a new user. Returns the affected-row
/// count.
pub async fn reassign_leads(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
    lead_ids: &[String],
    new_user_id: &str,
) -> Result<usize, ProspectaError> {
    if lead_ids.is_empty() {
        return Ok(0);
    }
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    let lead_ids = lead_ids.to_vec();
    let new_user_id = new_user_id.to_string();
    db.connection()
        .call(move |conn| {
            let placeholders = (0..lead_ids.len())
                .map(|i| format!("?{}", i + 4))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE pipeline_leads SET assigned_user_id = ?1,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE tenant_id = ?2 AND campaign_id = ?3 AND lead_id IN ({placeholders})"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut params: Vec<&dyn rusqlite::ToSql> =
                vec![&new_user_id, &tenant_id, &campaign_id];
            for id in &lead_ids {
                params.push(id);
            }
            let n = stmt.execute(params.as_slice())?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{calls, leads};
    use prospecta_core::time;
    use prospecta_core::types::{CallRecord, Lead};

    async fn seed_lead(db: &Database, id: &str, company: &str) {
        let lead = Lead {
            id: id.to_string(),
            tenant_id: "t-1".to_string(),
            company_name: Some(company.to_string()),
            contact_name: None,
            phone: Some("+33100000000".to_string()),
            assigned_to: Some("u-1".to_string()),
            qualification: None,
            last_call_date: None,
            next_follow_up: None,
            notes: None,
            created_at: time::now(),
            updated_at: time::now(),
        };
        leads::insert_lead(db, &lead).await.unwrap();
    }

    #[tokio::test]
    async fn upsert_converges_on_one_row() {
        let db = Database::open_in_memory().await.unwrap();
        upsert_stage(&db, "t-1", "l-1", "c-1", PipelineStage::ColdCall, "u-1")
            .await
            .unwrap();
        upsert_stage(&db, "t-1", "l-1", "c-1", PipelineStage::Qualified, "u-1")
            .await
            .unwrap();
        upsert_stage(&db, "t-1", "l-1", "c-1", PipelineStage::Proposal, "u-2")
            .await
            .unwrap();

        let row = get_stage(&db, "t-1", "l-1", "c-1").await.unwrap().unwrap();
        assert_eq!(row.stage, PipelineStage::Proposal);
        assert_eq!(row.assigned_user_id, "u-2");

        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT count(*) FROM pipeline_leads", [], |r| r.get(0))
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn same_lead_in_two_campaigns_keeps_two_rows() {
        let db = Database::open_in_memory().await.unwrap();
        upsert_stage(&db, "t-1", "l-1", "c-1", PipelineStage::Qualified, "u-1")
            .await
            .unwrap();
        upsert_stage(&db, "t-1", "l-1", "c-2", PipelineStage::Nrp, "u-1")
            .await
            .unwrap();

        let a = get_stage(&db, "t-1", "l-1", "c-1").await.unwrap().unwrap();
        let b = get_stage(&db, "t-1", "l-1", "c-2").await.unwrap().unwrap();
        assert_eq!(a.stage, PipelineStage::Qualified);
        assert_eq!(b.stage, PipelineStage::Nrp);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn remaining_excludes_terminal_stages_and_called_leads() {
        let db = Database::open_in_memory().await.unwrap();
        for (lead, stage) in [
            ("l-1", PipelineStage::ColdCall),
            ("l-2", PipelineStage::Qualified),
            ("l-3", PipelineStage::Won),
            ("l-4", PipelineStage::Lost),
            ("l-5", PipelineStage::Nrp),
        ] {
            seed_lead(&db, lead, &format!("co-{lead}")).await;
            upsert_stage(&db, "t-1", lead, "c-1", stage, "u-1").await.unwrap();
        }
        // l-5 already called in this session.
        calls::insert_call(
            &db,
            &CallRecord {
                id: "cr-1".to_string(),
                tenant_id: "t-1".to_string(),
                lead_id: "l-5".to_string(),
                user_id: "u-1".to_string(),
                session_id: Some("s-1".to_string()),
                duration: 30,
                qualification: "nrp".to_string(),
                notes: None,
                follow_up_date: None,
                created_at: time::now(),
            },
        )
        .await
        .unwrap();

        let ctx = TenantCtx::new("t-1", "u-1");
        let remaining = remaining_for_user(&db, &ctx, "c-1", None, Some("s-1"))
            .await
            .unwrap();
        let mut ids: Vec<_> = remaining.iter().map(|r| r.lead_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["l-1", "l-2"]);

        // Without the session exclusion, l-5 is back.
        let remaining = remaining_for_user(&db, &ctx, "c-1", None, None).await.unwrap();
        assert_eq!(remaining.len(), 3);

        // Stage filter narrows to one stage.
        let qualified = remaining_for_user(&db, &ctx, "c-1", Some(PipelineStage::Qualified), None)
            .await
            .unwrap();
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0].lead_id, "l-2");
        assert_eq!(qualified[0].company_name.as_deref(), Some("co-l-2"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn remaining_is_scoped_to_assignee() {
        let db = Database::open_in_memory().await.unwrap();
        seed_lead(&db, "l-1", "acme").await;
        upsert_stage(&db, "t-1", "l-1", "c-1", PipelineStage::ColdCall, "u-2")
            .await
            .unwrap();
        let ctx = TenantCtx::new("t-1", "u-1");
        assert!(remaining_for_user(&db, &ctx, "c-1", None, None).await.unwrap().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reassign_moves_only_the_named_leads() {
        let db = Database::open_in_memory().await.unwrap();
        for lead in ["l-1", "l-2", "l-3"] {
            upsert_stage(&db, "t-1", lead, "c-1", PipelineStage::ColdCall, "u-1")
                .await
                .unwrap();
        }
        let n = reassign_leads(&db, "t-1", "c-1", &["l-1".into(), "l-3".into()], "u-2")
            .await
            .unwrap();
        assert_eq!(n, 2);

        let moved = lead_ids_for_user(&db, "t-1", "c-1", "u-2").await.unwrap();
        assert_eq!(moved, vec!["l-1", "l-3"]);
        let kept = lead_ids_for_user(&db, "t-1", "c-1", "u-1").await.unwrap();
        assert_eq!(kept, vec!["l-2"]);

        assert_eq!(reassign_leads(&db, "t-1", "c-1", &[], "u-2").await.unwrap(), 0);
        db.close().await.unwrap();
    }
}
