// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign lead distribution and rebalancing.
//!
//! Creation partitions the selected leads into contiguous chunks of
//! `floor(N/K)`, with the whole remainder folded into the last user's chunk.
//! Removal re-slices the removed user's leads into chunks of
//! `ceil(remaining/others)` across the other assigned users. Both tie-breaks
//! are load-bearing for parity with historical data; do not even them out.

use prospecta_core::types::Campaign;
use prospecta_core::{time, PipelineStage, ProspectaError, TenantCtx};
use prospecta_storage::queries::{campaigns, leads, pipeline};
use prospecta_storage::Database;
use uuid::Uuid;

/// Chunk sizes for distributing `lead_count` leads across `user_count` users
/// at campaign creation. The last user absorbs the remainder.
pub fn creation_chunks(lead_count: usize, user_count: usize) -> Vec<usize> {
    if user_count == 0 {
        return Vec::new();
    }
    let base = lead_count / user_count;
    let mut sizes = vec![base; user_count];
    if let Some(last) = sizes.last_mut() {
        *last += lead_count % user_count;
    }
    sizes
}

/// Chunk sizes for redistributing `remaining` leads across `other_count`
/// users after a removal. Chunks are `ceil(remaining/other_count)` wide;
/// trailing users take what is left, possibly nothing.
pub fn removal_chunks(remaining: usize, other_count: usize) -> Vec<usize> {
    if other_count == 0 {
        return Vec::new();
    }
    let chunk = remaining.div_ceil(other_count);
    let mut left = remaining;
    (0..other_count)
        .map(|_| {
            let take = chunk.min(left);
            left -= take;
            take
        })
        .collect()
}

/// Create a campaign, distribute the selected leads across the assigned
/// users, and seed a `cold_call` pipeline row for every distributed lead so
/// the remaining-leads queue starts full.
pub async fn create_campaign(
    db: &Database,
    ctx: &TenantCtx,
    name: &str,
    lead_ids: &[String],
    user_ids: &[String],
) -> Result<Campaign, ProspectaError> {
    if name.trim().is_empty() {
        return Err(ProspectaError::InvalidArgument(
            "campaign name is required".to_string(),
        ));
    }
    let now = time::now();
    let campaign = Campaign {
        id: Uuid::new_v4().to_string(),
        tenant_id: ctx.tenant_id.clone(),
        name: name.to_string(),
        status: "active".to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    campaigns::create_campaign(db, &campaign).await?;

    let sizes = creation_chunks(lead_ids.len(), user_ids.len());
    let mut offset = 0;
    for (user_id, size) in user_ids.iter().zip(sizes) {
        let slice = &lead_ids[offset..offset + size];
        offset += size;
        campaigns::put_assignment(db, &ctx.tenant_id, &campaign.id, user_id, size as i64).await?;
        leads::assign_leads(db, &ctx.tenant_id, slice, user_id).await?;
        for lead_id in slice {
            pipeline::upsert_stage(
                db,
                &ctx.tenant_id,
                lead_id,
                &campaign.id,
                PipelineStage::ColdCall,
                user_id,
            )
            .await?;
        }
    }
    tracing::info!(
        campaign_id = %campaign.id,
        leads = lead_ids.len(),
        users = user_ids.len(),
        "campaign created"
    );
    Ok(campaign)
}

/// Remove a user from a campaign, redistributing their leads across the
/// remaining assigned users.
///
/// With no other users left, the leads stay assigned to the removed user
/// (see DESIGN.md).
pub async fn remove_user(
    db: &Database,
    ctx: &TenantCtx,
    campaign_id: &str,
    user_id: &str,
) -> Result<(), ProspectaError> {
    campaigns::get_assignment(db, &ctx.tenant_id, campaign_id, user_id)
        .await?
        .ok_or_else(|| ProspectaError::not_found("campaign assignment", user_id))?;

    let others: Vec<String> = campaigns::assignment_users(db, &ctx.tenant_id, campaign_id)
        .await?
        .into_iter()
        .filter(|u| u != user_id)
        .collect();
    let lead_ids = pipeline::lead_ids_for_user(db, &ctx.tenant_id, campaign_id, user_id).await?;

    let sizes = removal_chunks(lead_ids.len(), others.len());
    let mut offset = 0;
    for (other, size) in others.iter().zip(sizes) {
        if size == 0 {
            continue;
        }
        let slice = &lead_ids[offset..offset + size];
        offset += size;
        pipeline::reassign_leads(db, &ctx.tenant_id, campaign_id, slice, other).await?;
        leads::assign_leads(db, &ctx.tenant_id, slice, other).await?;
        campaigns::add_leads_assigned(db, &ctx.tenant_id, campaign_id, other, size as i64).await?;
    }

    campaigns::remove_assignment(db, &ctx.tenant_id, campaign_id, user_id).await?;
    tracing::info!(
        campaign_id,
        removed_user = user_id,
        redistributed = lead_ids.len(),
        heirs = others.len(),
        "user removed from campaign"
    );
    Ok(())
}
