// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead row operations.

use prospecta_core::ProspectaError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::Lead;

/// Insert a new lead.
pub async fn insert_lead(db: &Database, lead: &Lead) -> Result<(), ProspectaError> {
    let lead = lead.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO leads (id, tenant_id, company_name, contact_name, phone,
                     assigned_to, qualification, last_call_date, next_follow_up, notes,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    lead.id,
                    lead.tenant_id,
                    lead.company_name,
                    lead.contact_name,
                    lead.phone,
                    lead.assigned_to,
                    lead.qualification,
                    lead.last_call_date,
                    lead.next_follow_up,
                    lead.notes,
                    lead.created_at,
                    lead.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a lead by ID within a tenant.
pub async fn get_lead(
    db: &Database,
    tenant_id: &str,
    id: &str,
) -> Result<Option<Lead>, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, tenant_id, company_name, contact_name, phone, assigned_to,
                        qualification, last_call_date, next_follow_up, notes,
                        created_at, updated_at
                 FROM leads WHERE tenant_id = ?1 AND id = ?2",
            )?;
            let lead = stmt
                .query_row(params![tenant_id, id], |row| {
                    Ok(Lead {
                        id: row.get(0)?,
                        tenant_id: row.get(1)?,
                        company_name: row.get(2)?,
                        contact_name: row.get(3)?,
                        phone: row.get(4)?,
                        assigned_to: row.get(5)?,
                        qualification: row.get(6)?,
                        last_call_date: row.get(7)?,
                        next_follow_up: row.get(8)?,
                        notes: row.get(9)?,
                        created_at: row.get(10)?,
                        updated_at: row.get(11)?,
                    })
                })
                .optional()?;
            Ok(lead)
        })
        .await
        .map_err(map_tr_err)
}

/// Point a batch of leads at a new owner. Returns the affected-row count.
pub async fn assign_leads(
    db: &Database,
    tenant_id: &str,
    lead_ids: &[String],
    user_id: &str,
) -> Result<usize, ProspectaError> {
    if lead_ids.is_empty() {
        return Ok(0);
    }
    let tenant_id = tenant_id.to_string();
    let lead_ids = lead_ids.to_vec();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let placeholders = (0..lead_ids.len())
                .map(|i| format!("?{}", i + 3))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE leads SET assigned_to = ?1,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE tenant_id = ?2 AND id IN ({placeholders})"
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut params: Vec<&dyn rusqlite::ToSql> = vec![&user_id, &tenant_id];
            for id in &lead_ids {
                params.push(id);
            }
            let n = stmt.execute(params.as_slice())?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// Refresh a lead's denormalized call fields after a recorded call.
///
/// Notes are appended with a blank-line separator; a null or empty new note
/// leaves the existing notes untouched, and a null follow-up date keeps the
/// previous one.
pub async fn touch_after_call(
    db: &Database,
    tenant_id: &str,
    lead_id: &str,
    qualification: &str,
    call_time: &str,
    follow_up_date: Option<String>,
    notes: Option<String>,
) -> Result<usize, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let lead_id = lead_id.to_string();
    let qualification = qualification.to_string();
    let call_time = call_time.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE leads SET
                     qualification = ?1,
                     last_call_date = ?2,
                     next_follow_up = COALESCE(?3, next_follow_up),
                     notes = CASE
                         WHEN ?4 IS NULL OR ?4 = '' THEN notes
                         WHEN notes IS NULL OR notes = '' THEN ?4
                         ELSE notes || char(10) || char(10) || ?4
                     END,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE tenant_id = ?5 AND id = ?6",
                params![qualification, call_time, follow_up_date, notes, tenant_id, lead_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}
