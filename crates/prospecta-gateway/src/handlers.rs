// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the tracker REST API.
//!
//! Error mapping: `InvalidArgument` -> 400, `NotFound` -> 404, everything
//! else -> 500 with a generic body. Store internals never leak to callers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use prospecta_core::types::{RemainingLead, Session, SessionSummary};
use prospecta_core::{PipelineStage, ProspectaError};
use prospecta_tracker::{lifecycle, rebalancer, recorder, resolver};

use crate::context::Tenant;
use crate::server::AppState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Wrapper turning domain errors into HTTP responses.
pub struct ApiError(ProspectaError);

impl From<ProspectaError> for ApiError {
    fn from(err: ProspectaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ProspectaError::InvalidArgument(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            ProspectaError::NotFound { entity, id } => {
                (StatusCode::NOT_FOUND, format!("{entity} `{id}` not found"))
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Request body for POST /v1/sessions/start.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub campaign_id: String,
}

/// Response wrapping one session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// Response wrapping an optional session.
#[derive(Debug, Serialize)]
pub struct ActiveSessionResponse {
    pub session: Option<Session>,
}

/// Generic success acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Request body for PATCH /v1/sessions/{id}/pause.
#[derive(Debug, Deserialize, Default)]
pub struct PauseSessionRequest {
    #[serde(default)]
    pub pause_reason: Option<String>,
}

/// Response body for POST /v1/sessions/{id}/end.
#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub summary: SessionSummary,
}

/// Query parameters for GET /v1/sessions.
#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

/// Response body for GET /v1/sessions.
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<Session>,
}

/// Query parameters for GET /v1/remaining-leads.
#[derive(Debug, Deserialize)]
pub struct RemainingLeadsQuery {
    pub campaign_id: String,
    #[serde(default)]
    pub filter_stage: Option<PipelineStage>,
}

/// Response body for GET /v1/remaining-leads.
#[derive(Debug, Serialize)]
pub struct RemainingLeadsResponse {
    pub leads: Vec<RemainingLead>,
    pub session: Option<Session>,
    pub remaining_count: usize,
    pub has_active_session: bool,
}

/// Request body for POST /v1/calls.
#[derive(Debug, Deserialize)]
pub struct RecordCallRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub lead_id: String,
    #[serde(default)]
    pub duration: i64,
    pub qualification: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<String>,
}

/// Request body for POST /v1/campaigns.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    #[serde(default)]
    pub lead_ids: Vec<String>,
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// Response body for POST /v1/campaigns.
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub campaign: prospecta_core::types::Campaign,
}

/// POST /v1/sessions/start
pub async fn start_session(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Json(body): Json<StartSessionRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = lifecycle::start(&state.db, &ctx, &body.campaign_id).await?;
    Ok(Json(SessionResponse { session }))
}

/// PATCH /v1/sessions/{id}/pause
pub async fn pause_session(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
    Json(body): Json<PauseSessionRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    lifecycle::pause(&state.db, &ctx, &id, body.pause_reason).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// PATCH /v1/sessions/{id}/resume
pub async fn resume_session(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    lifecycle::resume(&state.db, &ctx, &id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /v1/sessions/{id}/end
pub async fn end_session(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<EndSessionResponse>> {
    let summary = lifecycle::end(&state.db, &ctx, &id).await?;
    Ok(Json(EndSessionResponse { summary }))
}

/// GET /v1/sessions/active
pub async fn get_active_session(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
) -> ApiResult<Json<ActiveSessionResponse>> {
    let session = lifecycle::get_active(&state.db, &ctx).await?;
    Ok(Json(ActiveSessionResponse { session }))
}

/// GET /v1/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Query(query): Query<ListSessionsQuery>,
) -> ApiResult<Json<SessionListResponse>> {
    let sessions = lifecycle::list_recent(&state.db, &ctx, query.limit).await?;
    Ok(Json(SessionListResponse { sessions }))
}

/// GET /v1/remaining-leads
pub async fn get_remaining_leads(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Query(query): Query<RemainingLeadsQuery>,
) -> ApiResult<Json<RemainingLeadsResponse>> {
    let queue =
        resolver::remaining_leads(&state.db, &ctx, &query.campaign_id, query.filter_stage).await?;
    Ok(Json(RemainingLeadsResponse {
        remaining_count: queue.remaining_count(),
        has_active_session: queue.has_active_session,
        leads: queue.leads,
        session: queue.session,
    }))
}

/// POST /v1/calls
pub async fn record_call(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Json(body): Json<RecordCallRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    recorder::record_call(
        &state.db,
        &ctx,
        recorder::CallOutcome {
            session_id: body.session_id,
            lead_id: body.lead_id,
            duration: body.duration,
            qualification: body.qualification,
            notes: body.notes,
            follow_up_date: body.follow_up_date,
        },
    )
    .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Json(body): Json<CreateCampaignRequest>,
) -> ApiResult<Json<CampaignResponse>> {
    let campaign =
        rebalancer::create_campaign(&state.db, &ctx, &body.name, &body.lead_ids, &body.user_ids)
            .await?;
    Ok(Json(CampaignResponse { campaign }))
}

/// DELETE /v1/campaigns/{id}/users/{user_id}
pub async fn remove_campaign_user(
    State(state): State<AppState>,
    Tenant(ctx): Tenant,
    Path((campaign_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<SuccessResponse>> {
    rebalancer::remove_user(&state.db, &ctx, &campaign_id, &user_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health (unauthenticated)
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
