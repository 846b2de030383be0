// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call record operations. Rows are append-only.

use prospecta_core::ProspectaError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};
use crate::models::CallRecord;

/// Insert one call record.
pub async fn insert_call(db: &Database, record: &CallRecord) -> Result<(), ProspectaError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO call_records (id, tenant_id, lead_id, user_id, session_id,
                     duration, qualification, notes, follow_up_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id,
                    record.tenant_id,
                    record.lead_id,
                    record.user_id,
                    record.session_id,
                    record.duration,
                    record.qualification,
                    record.notes,
                    record.follow_up_date,
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Call records for one lead, newest first.
pub async fn list_calls_for_lead(
    db: &Database,
    tenant_id: &str,
    lead_id: &str,
) -> Result<Vec<CallRecord>, ProspectaError> {
    let tenant_id = tenant_id.to_string();
    let lead_id = lead_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, tenant_id, lead_id, user_id, session_id, duration, qualification,
                        notes, follow_up_date, created_at
                 FROM call_records
                 WHERE tenant_id = ?1 AND lead_id = ?2
                 ORDER BY created_at DESC, id",
            )?;
            let records = stmt
                .query_map(params![tenant_id, lead_id], |row| {
                    Ok(CallRecord {
                        id: row.get(0)?,
                        tenant_id: row.get(1)?,
                        lead_id: row.get(2)?,
                        user_id: row.get(3)?,
                        session_id: row.get(4)?,
                        duration: row.get(5)?,
                        qualification: row.get(6)?,
                        notes: row.get(7)?,
                        follow_up_date: row.get(8)?,
                        created_at: row.get(9)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
        .await
        .map_err(map_tr_err)
}
