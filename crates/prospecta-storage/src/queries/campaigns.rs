// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign and campaign-assignment operations.
//!
//! Assignment counters are cumulative rollups; every write is either an upsert
//! or a relative increment so that concurrent session ends cannot clobber each
//! other.

use prospecta_core::ProspectaError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::{Campaign, CampaignAssignment};

/// Insert a new campaign.
pub async fn create_campaign(db: &Database, campaign: &Campaign) -> Result<(), ProspectaError> {
    let campaign = campaign.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaigns (id, tenant_id, name, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    campaign.id,
                    campaign.tenant_id,
                    campaign.name,
                    campaign.status,
                    campaign.created_at,
                    campaign.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Create or replace an assignment row with an absolute `leads_assigned` count.
/// Used at campaign creation, where the distribution is computed up front.
pub async fn put_assignment(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
    user_id: &str,
    leads_assigned: i64,
) -> Result<(), ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaign_assignments (campaign_id, user_id, tenant_id, leads_assigned)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (campaign_id, user_id) DO UPDATE SET
                     leads_assigned = excluded.leads_assigned",
                params![campaign_id, user_id, tenant_id, leads_assigned],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Add to an assignment's `leads_assigned` count, creating the row if needed.
pub async fn add_leads_assigned(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
    user_id: &str,
    delta: i64,
) -> Result<(), ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaign_assignments (campaign_id, user_id, tenant_id, leads_assigned)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (campaign_id, user_id) DO UPDATE SET
                     leads_assigned = leads_assigned + ?4",
                params![campaign_id, user_id, tenant_id, delta],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fold a completed session's totals into the per-user campaign rollup.
///
/// One relative upsert, so two sessions ending at once both land.
pub async fn fold_session_totals(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
    user_id: &str,
    time_spent: i64,
    calls_made: i64,
    meetings_scheduled: i64,
) -> Result<(), ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaign_assignments
                     (campaign_id, user_id, tenant_id, time_spent, calls_made, meetings_scheduled)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (campaign_id, user_id) DO UPDATE SET
                     time_spent = time_spent + ?4,
                     calls_made = calls_made + ?5,
                     meetings_scheduled = meetings_scheduled + ?6",
                params![campaign_id, user_id, tenant_id, time_spent, calls_made, meetings_scheduled],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get one assignment row.
pub async fn get_assignment(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
    user_id: &str,
) -> Result<Option<CampaignAssignment>, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT campaign_id, user_id, tenant_id, leads_assigned, time_spent,
                        calls_made, meetings_scheduled
                 FROM campaign_assignments
                 WHERE tenant_id = ?1 AND campaign_id = ?2 AND user_id = ?3",
            )?;
            let assignment = stmt
                .query_row(params![tenant_id, campaign_id, user_id], |row| {
                    Ok(CampaignAssignment {
                        campaign_id: row.get(0)?,
                        user_id: row.get(1)?,
                        tenant_id: row.get(2)?,
                        leads_assigned: row.get(3)?,
                        time_spent: row.get(4)?,
                        calls_made: row.get(5)?,
                        meetings_scheduled: row.get(6)?,
                    })
                })
                .optional()?;
            Ok(assignment)
        })
        .await
        .map_err(map_tr_err)
}

/// User IDs assigned to a campaign, in assignment order.
pub async fn assignment_users(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
) -> Result<Vec<String>, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id FROM campaign_assignments
                 WHERE tenant_id = ?1 AND campaign_id = ?2
                 ORDER BY rowid",
            )?;
            let users = stmt
                .query_map(params![tenant_id, campaign_id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(users)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete one assignment row. Returns the affected-row count.
pub async fn remove_assignment(
    db: &Database,
    tenant_id: &str,
    campaign_id: &str,
    user_id: &str,
) -> Result<usize, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let campaign_id = campaign_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM campaign_assignments
                 WHERE tenant_id = ?1 AND campaign_id = ?2 AND user_id = ?3",
                params![tenant_id, campaign_id, user_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}
