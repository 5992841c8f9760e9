// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod actor;

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State as AxumState},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use clap::Parser;
use pdi_ops::{
    Clock, DEMO_PASSWORD, Dashboard, DriftReport, RandomDrift, Store, StoreConfig, SystemClock,
};
use pdi_ops_api::{
    AccessControlResponse, ApiError, AssignInspectorRequest, AssignUserRoleRequest,
    AutoAssignRequest, CreateInspectorRequest, CreateQueueItemRequest, CreateRoleRequest,
    CreateUserRequest, CreateVehicleMasterItemRequest, ListAuditResponse, ListCommissionsRequest,
    ListCommissionsResponse, ListInspectorsRequest, ListInspectorsResponse,
    ListLeaveRequestsResponse, ListQueueRequest, ListQueueResponse, LoginRequest,
    MutationResponse, OverrideCommissionRequest, OverridePriceRequest, QuoteRequest,
    ReasonRequest, ScoreChecklistRequest, ScoreChecklistResponse, SetCategoryPricingRequest,
    SetDefaultPricingRequest, SetMappingPricingRequest, SetPriorityRequest,
    SetQueueStatusRequest, SubmitLeaveRequest, UpdateInspectorRequest, UpdatePermissionsRequest,
    UpdateRoleRequest, UpdateUserRequest, UpdateVehicleMappingRequest,
    UpdateVehicleMasterItemRequest, UpsertChecklistFieldRequest, UpsertChecklistSectionRequest,
    UpsertScoringRuleRequest, UpsertVehicleMappingRequest, WhoAmIResponse, approve_commission,
    approve_leave_request, assign_inspector, assign_user_role, auto_assign, create_inspector,
    create_queue_item, create_role, create_user, create_vehicle_master_item,
    delete_checklist_field, delete_checklist_section, delete_role, delete_scoring_rule,
    delete_user, delete_vehicle_mapping, delete_vehicle_master_item, get_access_control,
    get_checklist, get_dashboard, get_vehicle_master, list_audit, list_commissions,
    list_inspectors, list_leave_requests, list_queue, login, override_commission,
    override_price, quote, record_payment, reject_leave_request, score_checklist,
    set_category_pricing, set_default_pricing, set_mapping_pricing, set_priority,
    set_queue_status, submit_leave_request, translate_domain_error, update_inspector,
    update_role, update_role_permissions, update_user, update_user_permissions,
    update_vehicle_mapping, update_vehicle_master_item, upsert_checklist_field,
    upsert_checklist_section, upsert_scoring_rule, upsert_vehicle_mapping, whoami,
};
use pdi_ops_audit::AuditFilter;
use pdi_ops_domain::{
    BusinessCalendar, ChecklistTemplate, DEFAULT_TIMEZONE, DomainError, MasterKind, PriceQuote,
    VehicleMaster, VehicleType,
};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::{AbortHandle, JoinHandle},
};
use tracing::{error, info, warn};

use crate::actor::RequestActor;

/// PDI Ops Server - HTTP server for the PDI operations console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone used for "today" and hourly buckets
    #[arg(short, long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Seconds between drift ticks. 0 disables the simulation.
    #[arg(long, default_value_t = 0)]
    drift_interval_secs: u64,

    /// Artificial delay added to every request, in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Work factor for password hashes
    #[arg(long, default_value_t = 10)]
    bcrypt_cost: u32,

    /// Password given to every seeded account
    #[arg(long, default_value = DEMO_PASSWORD)]
    demo_password: String,
}

/// Application state shared across handlers.
///
/// The store sits behind a single mutex; every request holds it for the
/// whole operation, as does the drift task.
#[derive(Clone)]
struct AppState {
    /// Domain state and audit log.
    store: Arc<Mutex<Store>>,
    /// Work factor for password hashes created through the API.
    bcrypt_cost: u32,
    /// Artificial delay before each request is handled.
    latency: Duration,
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    location_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always true.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    /// A 401 for callers that could not be identified.
    const fn unauthenticated(message: String) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        Self::from(translate_domain_error(err))
    }
}

/// Parses a path segment such as a vehicle condition or master kind.
fn parse_segment<T>(value: &str) -> Result<T, HttpError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse::<T>().map_err(HttpError::from)
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Handler for POST /login endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    info!(username = %req.username, "Handling login request");

    let store = app_state.store.lock().await;
    let response: WhoAmIResponse = login(&store, &req)?;
    drop(store);

    info!(user_id = %response.user.user_id, "Login succeeded");
    Ok(Json(response))
}

/// Handler for GET /whoami endpoint.
async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    let store = app_state.store.lock().await;
    Ok(Json(whoami(&store, &actor)?))
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Handler for GET /dashboard endpoint.
async fn handle_get_dashboard(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, HttpError> {
    info!(location_id = ?query.location_id, "Handling dashboard request");

    let store = app_state.store.lock().await;
    let dashboard: Dashboard = get_dashboard(&store, &actor, query.location_id.as_deref())?;
    Ok(Json(dashboard))
}

/// Handler for GET /queue endpoint.
async fn handle_list_queue(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<ListQueueRequest>,
) -> Result<Json<ListQueueResponse>, HttpError> {
    info!(
        location_id = ?query.location_id,
        vehicle_type = ?query.vehicle_type,
        "Handling list_queue request"
    );

    let store = app_state.store.lock().await;
    let response: ListQueueResponse = list_queue(&store, &actor, &query)?;
    drop(store);

    info!(count = response.queue.len(), "Listed queue items");
    Ok(Json(response))
}

/// Handler for POST /queue endpoint.
async fn handle_create_queue_item(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<CreateQueueItemRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        location_id = %req.location_id,
        "Handling create_queue_item request"
    );

    // Execute command via API
    let mut store = app_state.store.lock().await;
    let response: MutationResponse = create_queue_item(&mut store, &actor, req)?;
    drop(store);

    info!(message = %response.message, "Queue item created");
    Ok(Json(response))
}

/// Handler for POST /queue/{id}/status endpoint.
async fn handle_set_queue_status(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pdi_id): Path<String>,
    Json(req): Json<SetQueueStatusRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        pdi_id = %pdi_id,
        status = ?req.status,
        "Handling set_status request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(set_queue_status(&mut store, &actor, &pdi_id, req)?))
}

/// Handler for POST /queue/{id}/priority endpoint.
async fn handle_set_priority(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pdi_id): Path<String>,
    Json(req): Json<SetPriorityRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        pdi_id = %pdi_id,
        priority = ?req.priority,
        "Handling set_priority request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(set_priority(&mut store, &actor, &pdi_id, req)?))
}

/// Handler for POST /queue/{id}/assign endpoint.
async fn handle_assign_inspector(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pdi_id): Path<String>,
    Json(req): Json<AssignInspectorRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        pdi_id = %pdi_id,
        inspector_id = ?req.inspector_id,
        "Handling manual_assign request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(assign_inspector(&mut store, &actor, &pdi_id, req)?))
}

/// Handler for POST /queue/auto_assign endpoint.
async fn handle_auto_assign(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<AutoAssignRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        location_id = ?req.location_id,
        vehicle_type = ?req.vehicle_type,
        "Handling auto_assign request"
    );

    let mut store = app_state.store.lock().await;
    let response: MutationResponse = auto_assign(&mut store, &actor, req)?;
    drop(store);

    info!(message = %response.message, "Auto-assign finished");
    Ok(Json(response))
}

/// Handler for POST /queue/{id}/payment endpoint.
async fn handle_record_payment(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pdi_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, pdi_id = %pdi_id, "Handling record_payment request");

    let mut store = app_state.store.lock().await;
    Ok(Json(record_payment(&mut store, &actor, &pdi_id, &req)?))
}

/// Handler for POST /queue/{id}/price endpoint.
async fn handle_override_price(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pdi_id): Path<String>,
    Json(req): Json<OverridePriceRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, pdi_id = %pdi_id, "Handling override_price request");

    let mut store = app_state.store.lock().await;
    Ok(Json(override_price(&mut store, &actor, &pdi_id, req)?))
}

/// Handler for POST /queue/{id}/commission endpoint.
async fn handle_override_commission(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(pdi_id): Path<String>,
    Json(req): Json<OverrideCommissionRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, pdi_id = %pdi_id, "Handling override_commission request");

    let mut store = app_state.store.lock().await;
    Ok(Json(override_commission(&mut store, &actor, &pdi_id, req)?))
}

// ---------------------------------------------------------------------------
// Inspectors and leave
// ---------------------------------------------------------------------------

/// Handler for GET /inspectors endpoint.
async fn handle_list_inspectors(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<ListInspectorsRequest>,
) -> Result<Json<ListInspectorsResponse>, HttpError> {
    let store = app_state.store.lock().await;
    Ok(Json(list_inspectors(&store, &actor, &query)?))
}

/// Handler for POST /inspectors endpoint.
async fn handle_create_inspector(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<CreateInspectorRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, "Handling create_inspector request");

    let mut store = app_state.store.lock().await;
    let response: MutationResponse = create_inspector(&mut store, &actor, req)?;
    drop(store);

    info!(message = %response.message, "Inspector onboarded");
    Ok(Json(response))
}

/// Handler for PATCH /inspectors/{id} endpoint.
async fn handle_update_inspector(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(inspector_id): Path<String>,
    Json(req): Json<UpdateInspectorRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        inspector_id = %inspector_id,
        "Handling update_inspector request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(update_inspector(&mut store, &actor, &inspector_id, req)?))
}

/// Handler for GET /leave_requests endpoint.
async fn handle_list_leave_requests(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
) -> Result<Json<ListLeaveRequestsResponse>, HttpError> {
    let store = app_state.store.lock().await;
    Ok(Json(list_leave_requests(&store, &actor)?))
}

/// Handler for POST /leave_requests endpoint.
async fn handle_submit_leave_request(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<SubmitLeaveRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        inspector_id = %req.inspector_id,
        "Handling submit_leave_request request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(submit_leave_request(&mut store, &actor, req)?))
}

/// Handler for POST /leave_requests/{id}/approve endpoint.
async fn handle_approve_leave_request(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(request_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        request_id = %request_id,
        "Handling approve_leave_request request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(approve_leave_request(&mut store, &actor, &request_id, &req)?))
}

/// Handler for POST /leave_requests/{id}/reject endpoint.
async fn handle_reject_leave_request(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(request_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        request_id = %request_id,
        "Handling reject_leave_request request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(reject_leave_request(&mut store, &actor, &request_id, &req)?))
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

/// Handler for GET /commissions endpoint.
async fn handle_list_commissions(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<ListCommissionsRequest>,
) -> Result<Json<ListCommissionsResponse>, HttpError> {
    let store = app_state.store.lock().await;
    Ok(Json(list_commissions(&store, &actor, &query)?))
}

/// Handler for POST /commissions/{id}/approve endpoint.
async fn handle_approve_commission(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(commission_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        commission_id = %commission_id,
        "Handling approve_commission request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(approve_commission(&mut store, &actor, &commission_id, &req)?))
}

/// Handler for PUT /pricing/default endpoint.
async fn handle_set_default_pricing(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<SetDefaultPricingRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, "Handling set_default_pricing request");

    let mut store = app_state.store.lock().await;
    Ok(Json(set_default_pricing(&mut store, &actor, req)?))
}

// ---------------------------------------------------------------------------
// Vehicle master
// ---------------------------------------------------------------------------

/// Handler for GET /vehicle_master endpoint.
async fn handle_get_vehicle_master(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
) -> Result<Json<VehicleMaster>, HttpError> {
    let store = app_state.store.lock().await;
    Ok(Json(get_vehicle_master(&store, &actor)?))
}

/// Handler for POST /vehicle_master/{kind} endpoint.
async fn handle_create_vehicle_master_item(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(kind): Path<String>,
    Json(req): Json<CreateVehicleMasterItemRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let kind: MasterKind = parse_segment(&kind)?;
    info!(
        actor = %actor.user_id,
        kind = %kind,
        name = %req.name,
        "Handling create_vehicle_master_item request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(create_vehicle_master_item(&mut store, &actor, kind, req)?))
}

/// Handler for PATCH /vehicle_master/{kind}/{id} endpoint.
async fn handle_update_vehicle_master_item(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((kind, id)): Path<(String, String)>,
    Json(req): Json<UpdateVehicleMasterItemRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let kind: MasterKind = parse_segment(&kind)?;
    info!(
        actor = %actor.user_id,
        kind = %kind,
        id = %id,
        "Handling update_vehicle_master_item request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(update_vehicle_master_item(
        &mut store, &actor, kind, &id, req,
    )?))
}

/// Handler for DELETE /vehicle_master/{kind}/{id} endpoint.
async fn handle_delete_vehicle_master_item(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((kind, id)): Path<(String, String)>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let kind: MasterKind = parse_segment(&kind)?;
    info!(
        actor = %actor.user_id,
        kind = %kind,
        id = %id,
        "Handling delete_vehicle_master_item request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(delete_vehicle_master_item(
        &mut store, &actor, kind, &id, &req,
    )?))
}

/// Handler for POST /vehicle_master/mappings endpoint.
async fn handle_upsert_vehicle_mapping(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<UpsertVehicleMappingRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, "Handling upsert_vehicle_mapping request");

    let mut store = app_state.store.lock().await;
    Ok(Json(upsert_vehicle_mapping(&mut store, &actor, req)?))
}

/// Handler for PATCH /vehicle_master/mappings/{id} endpoint.
async fn handle_update_vehicle_mapping(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(mapping_id): Path<String>,
    Json(req): Json<UpdateVehicleMappingRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        mapping_id = %mapping_id,
        "Handling update_vehicle_mapping request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(update_vehicle_mapping(
        &mut store,
        &actor,
        &mapping_id,
        req,
    )?))
}

/// Handler for DELETE /vehicle_master/mappings/{id} endpoint.
async fn handle_delete_vehicle_mapping(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(mapping_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        mapping_id = %mapping_id,
        "Handling delete_vehicle_mapping request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(delete_vehicle_mapping(
        &mut store,
        &actor,
        &mapping_id,
        &req,
    )?))
}

/// Handler for PUT /vehicle_master/mappings/{id}/pricing endpoint.
async fn handle_set_mapping_pricing(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(mapping_id): Path<String>,
    Json(req): Json<SetMappingPricingRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, mapping_id = %mapping_id, "Handling set_mapping_pricing request");

    let mut store = app_state.store.lock().await;
    Ok(Json(set_mapping_pricing(&mut store, &actor, &mapping_id, req)?))
}

/// Handler for PUT /vehicle_master/categories/{id}/pricing endpoint.
async fn handle_set_category_pricing(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(category_id): Path<String>,
    Json(req): Json<SetCategoryPricingRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        actor = %actor.user_id,
        category_id = %category_id,
        "Handling set_category_pricing request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(set_category_pricing(
        &mut store,
        &actor,
        &category_id,
        req,
    )?))
}

/// Handler for GET /vehicle_master/quote endpoint.
async fn handle_quote(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(query): Query<QuoteRequest>,
) -> Result<Json<PriceQuote>, HttpError> {
    let store = app_state.store.lock().await;
    Ok(Json(quote(&store, &actor, &query)?))
}

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

/// Handler for GET /checklists/{condition} endpoint.
async fn handle_get_checklist(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(condition): Path<String>,
) -> Result<Json<ChecklistTemplate>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;

    let store = app_state.store.lock().await;
    Ok(Json(get_checklist(&store, &actor, condition)?))
}

/// Handler for POST /checklists/{condition}/score endpoint.
async fn handle_score_checklist(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(condition): Path<String>,
    Json(req): Json<ScoreChecklistRequest>,
) -> Result<Json<ScoreChecklistResponse>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;

    let store = app_state.store.lock().await;
    Ok(Json(score_checklist(&store, &actor, condition, req)?))
}

/// Handler for PUT /checklists/{condition}/sections endpoint.
async fn handle_upsert_checklist_section(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(condition): Path<String>,
    Json(req): Json<UpsertChecklistSectionRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;
    info!(
        actor = %actor.user_id,
        condition = %condition,
        "Handling upsert_checklist_section request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(upsert_checklist_section(
        &mut store, &actor, condition, req,
    )?))
}

/// Handler for DELETE /checklists/{condition}/sections/{section_id} endpoint.
async fn handle_delete_checklist_section(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((condition, section_id)): Path<(String, String)>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;
    info!(
        actor = %actor.user_id,
        condition = %condition,
        section_id = %section_id,
        "Handling delete_checklist_section request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(delete_checklist_section(
        &mut store,
        &actor,
        condition,
        &section_id,
        &req,
    )?))
}

/// Handler for PUT /checklists/{condition}/sections/{section_id}/fields endpoint.
async fn handle_upsert_checklist_field(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((condition, section_id)): Path<(String, String)>,
    Json(req): Json<UpsertChecklistFieldRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;
    info!(
        actor = %actor.user_id,
        condition = %condition,
        section_id = %section_id,
        "Handling upsert_checklist_field request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(upsert_checklist_field(
        &mut store,
        &actor,
        condition,
        &section_id,
        req,
    )?))
}

/// Handler for DELETE /checklists/{condition}/sections/{section_id}/fields/{field_id} endpoint.
async fn handle_delete_checklist_field(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((condition, section_id, field_id)): Path<(String, String, String)>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;
    info!(
        actor = %actor.user_id,
        condition = %condition,
        section_id = %section_id,
        field_id = %field_id,
        "Handling delete_checklist_field request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(delete_checklist_field(
        &mut store,
        &actor,
        condition,
        &section_id,
        &field_id,
        &req,
    )?))
}

/// Handler for PUT /checklists/{condition}/rules endpoint.
async fn handle_upsert_scoring_rule(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(condition): Path<String>,
    Json(req): Json<UpsertScoringRuleRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;
    info!(actor = %actor.user_id, condition = %condition, "Handling upsert_scoring_rule request");

    let mut store = app_state.store.lock().await;
    Ok(Json(upsert_scoring_rule(&mut store, &actor, condition, req)?))
}

/// Handler for DELETE /checklists/{condition}/rules/{rule_id} endpoint.
async fn handle_delete_scoring_rule(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((condition, rule_id)): Path<(String, String)>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    let condition: VehicleType = parse_segment(&condition)?;
    info!(
        actor = %actor.user_id,
        condition = %condition,
        rule_id = %rule_id,
        "Handling delete_scoring_rule request"
    );

    let mut store = app_state.store.lock().await;
    Ok(Json(delete_scoring_rule(
        &mut store, &actor, condition, &rule_id, &req,
    )?))
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

/// Handler for GET /access_control endpoint.
async fn handle_get_access_control(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
) -> Result<Json<AccessControlResponse>, HttpError> {
    let store = app_state.store.lock().await;
    Ok(Json(get_access_control(&store, &actor)?))
}

/// Handler for POST /roles endpoint.
async fn handle_create_role(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<CreateRoleRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, role_id = %req.role_id, "Handling create_role request");

    let mut store = app_state.store.lock().await;
    Ok(Json(create_role(&mut store, &actor, req)?))
}

/// Handler for PATCH /roles/{id} endpoint.
async fn handle_update_role(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(role_id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, role_id = %role_id, "Handling update_role request");

    let mut store = app_state.store.lock().await;
    Ok(Json(update_role(&mut store, &actor, &role_id, req)?))
}

/// Handler for DELETE /roles/{id} endpoint.
async fn handle_delete_role(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(role_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, role_id = %role_id, "Handling delete_role request");

    let mut store = app_state.store.lock().await;
    Ok(Json(delete_role(&mut store, &actor, &role_id, &req)?))
}

/// Handler for PUT /roles/{id}/permissions endpoint.
async fn handle_update_role_permissions(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(role_id): Path<String>,
    Json(req): Json<UpdatePermissionsRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, role_id = %role_id, "Handling update_role_permissions request");

    let mut store = app_state.store.lock().await;
    Ok(Json(update_role_permissions(
        &mut store, &actor, &role_id, req,
    )?))
}

/// Handler for POST /users endpoint.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, "Handling create_user request");

    let mut store = app_state.store.lock().await;
    let response: MutationResponse =
        create_user(&mut store, &actor, req, app_state.bcrypt_cost)?;
    drop(store);

    info!(message = %response.message, "User created");
    Ok(Json(response))
}

/// Handler for PATCH /users/{id} endpoint.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, user_id = %user_id, "Handling update_user request");

    let mut store = app_state.store.lock().await;
    Ok(Json(update_user(
        &mut store,
        &actor,
        &user_id,
        req,
        app_state.bcrypt_cost,
    )?))
}

/// Handler for DELETE /users/{id} endpoint.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(user_id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, user_id = %user_id, "Handling delete_user request");

    let mut store = app_state.store.lock().await;
    Ok(Json(delete_user(&mut store, &actor, &user_id, &req)?))
}

/// Handler for PUT /users/{id}/role endpoint.
async fn handle_assign_user_role(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(user_id): Path<String>,
    Json(req): Json<AssignUserRoleRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, user_id = %user_id, "Handling assign_user_role request");

    let mut store = app_state.store.lock().await;
    Ok(Json(assign_user_role(&mut store, &actor, &user_id, req)?))
}

/// Handler for PUT /users/{id}/permissions endpoint.
async fn handle_update_user_permissions(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path(user_id): Path<String>,
    Json(req): Json<UpdatePermissionsRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(actor = %actor.user_id, user_id = %user_id, "Handling update_user_permissions request");

    let mut store = app_state.store.lock().await;
    Ok(Json(update_user_permissions(
        &mut store, &actor, &user_id, req,
    )?))
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Handler for GET /audit endpoint.
async fn handle_list_audit(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Query(filter): Query<AuditFilter>,
) -> Result<Json<ListAuditResponse>, HttpError> {
    info!(
        location_id = ?filter.location_id,
        entity_type = ?filter.entity_type,
        correlation_id = ?filter.correlation_id,
        "Handling list_audit request"
    );

    let store = app_state.store.lock().await;
    let response: ListAuditResponse = list_audit(&store, &actor, &filter)?;
    drop(store);

    info!(count = response.entries.len(), "Listed audit entries");
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Router, middleware and background work
// ---------------------------------------------------------------------------

/// Delays every request by the configured latency.
async fn simulate_latency(
    AxumState(latency): AxumState<Duration>,
    request: Request,
    next: Next,
) -> Response {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    next.run(request).await
}

/// Routes for the queue, dashboard and finance screens.
fn queue_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handle_get_dashboard))
        .route("/queue", get(handle_list_queue).post(handle_create_queue_item))
        .route("/queue/auto_assign", post(handle_auto_assign))
        .route("/queue/{id}/status", post(handle_set_queue_status))
        .route("/queue/{id}/priority", post(handle_set_priority))
        .route("/queue/{id}/assign", post(handle_assign_inspector))
        .route("/queue/{id}/payment", post(handle_record_payment))
        .route("/queue/{id}/price", post(handle_override_price))
        .route("/queue/{id}/commission", post(handle_override_commission))
        .route("/commissions", get(handle_list_commissions))
        .route("/commissions/{id}/approve", post(handle_approve_commission))
        .route("/pricing/default", put(handle_set_default_pricing))
}

/// Routes for the inspector roster and leave.
fn inspector_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/inspectors",
            get(handle_list_inspectors).post(handle_create_inspector),
        )
        .route("/inspectors/{id}", patch(handle_update_inspector))
        .route(
            "/leave_requests",
            get(handle_list_leave_requests).post(handle_submit_leave_request),
        )
        .route(
            "/leave_requests/{id}/approve",
            post(handle_approve_leave_request),
        )
        .route("/leave_requests/{id}/reject", post(handle_reject_leave_request))
}

/// Routes for the vehicle taxonomy and checklist builder.
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/vehicle_master", get(handle_get_vehicle_master))
        .route("/vehicle_master/quote", get(handle_quote))
        .route("/vehicle_master/mappings", post(handle_upsert_vehicle_mapping))
        .route(
            "/vehicle_master/mappings/{id}",
            patch(handle_update_vehicle_mapping).delete(handle_delete_vehicle_mapping),
        )
        .route(
            "/vehicle_master/mappings/{id}/pricing",
            put(handle_set_mapping_pricing),
        )
        .route(
            "/vehicle_master/categories/{id}/pricing",
            put(handle_set_category_pricing),
        )
        .route("/vehicle_master/{kind}", post(handle_create_vehicle_master_item))
        .route(
            "/vehicle_master/{kind}/{id}",
            patch(handle_update_vehicle_master_item).delete(handle_delete_vehicle_master_item),
        )
        .route("/checklists/{condition}", get(handle_get_checklist))
        .route("/checklists/{condition}/score", post(handle_score_checklist))
        .route(
            "/checklists/{condition}/sections",
            put(handle_upsert_checklist_section),
        )
        .route(
            "/checklists/{condition}/sections/{section_id}",
            delete(handle_delete_checklist_section),
        )
        .route(
            "/checklists/{condition}/sections/{section_id}/fields",
            put(handle_upsert_checklist_field),
        )
        .route(
            "/checklists/{condition}/sections/{section_id}/fields/{field_id}",
            delete(handle_delete_checklist_field),
        )
        .route("/checklists/{condition}/rules", put(handle_upsert_scoring_rule))
        .route(
            "/checklists/{condition}/rules/{rule_id}",
            delete(handle_delete_scoring_rule),
        )
}

/// Routes for roles, users and permissions.
fn access_routes() -> Router<AppState> {
    Router::new()
        .route("/access_control", get(handle_get_access_control))
        .route("/roles", post(handle_create_role))
        .route(
            "/roles/{id}",
            patch(handle_update_role).delete(handle_delete_role),
        )
        .route("/roles/{id}/permissions", put(handle_update_role_permissions))
        .route("/users", post(handle_create_user))
        .route(
            "/users/{id}",
            patch(handle_update_user).delete(handle_delete_user),
        )
        .route("/users/{id}/role", put(handle_assign_user_role))
        .route("/users/{id}/permissions", put(handle_update_user_permissions))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    let latency: Duration = app_state.latency;
    Router::new()
        .route("/login", post(handle_login))
        .route("/whoami", get(handle_whoami))
        .route("/audit", get(handle_list_audit))
        .merge(queue_routes())
        .merge(inspector_routes())
        .merge(catalog_routes())
        .merge(access_routes())
        .layer(middleware::from_fn_with_state(latency, simulate_latency))
        .with_state(app_state)
}

/// Runs the drift generator against the shared store every `period`.
fn spawn_drift(store: Arc<Mutex<Store>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut source: RandomDrift = RandomDrift;
        let mut ticker: tokio::time::Interval = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let report: DriftReport = store.lock().await.drift(&mut source);
            if let Some(pdi_id) = &report.new_item {
                info!(pdi_id = %pdi_id, "Drift added a walk-in job");
            }
        }
    })
}

/// How the drift task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriftExit {
    Finished,
    Cancelled,
    Panicked,
}

/// Waits for the drift task and logs how it ended.
async fn watch_drift(handle: JoinHandle<()>) -> DriftExit {
    match handle.await {
        Ok(()) => {
            warn!("Drift simulation finished unexpectedly");
            DriftExit::Finished
        }
        Err(e) if e.is_cancelled() => {
            info!("Drift simulation stopped");
            DriftExit::Cancelled
        }
        Err(e) => {
            error!(error = %e, "Drift simulation panicked");
            DriftExit::Panicked
        }
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing PDI Ops Server");

    let calendar: BusinessCalendar = BusinessCalendar::parse(&args.timezone)?;
    info!(timezone = %args.timezone, "Using business timezone");

    // Seed the demo data
    let password_hash: String = bcrypt::hash(&args.demo_password, args.bcrypt_cost)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Store = Store::seeded(clock, StoreConfig { calendar }, &password_hash);
    info!(
        queue = store.state().queue.len(),
        inspectors = store.state().inspectors.len(),
        "Loaded demo data"
    );

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
        bcrypt_cost: args.bcrypt_cost,
        latency: Duration::from_millis(args.latency_ms),
    };

    let drift: Option<(AbortHandle, JoinHandle<DriftExit>)> = if args.drift_interval_secs > 0 {
        info!(interval_secs = args.drift_interval_secs, "Starting drift simulation");
        let handle: JoinHandle<()> = spawn_drift(
            Arc::clone(&app_state.store),
            Duration::from_secs(args.drift_interval_secs),
        );
        let abort: AbortHandle = handle.abort_handle();
        Some((abort, tokio::spawn(watch_drift(handle))))
    } else {
        None
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some((abort, watcher)) = drift {
        abort.abort();
        watcher.await?;
    }

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::actor::ACTOR_HEADER;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode as HttpStatusCode},
    };
    use pdi_ops::FixedClock;
    use serde_json::{Value, json};
    use time::macros::datetime;
    use tower::ServiceExt;

    const TEST_BCRYPT_COST: u32 = 4;

    /// Helper to create test app state around a freshly seeded store.
    fn create_test_app_state() -> AppState {
        let clock: Arc<FixedClock> = Arc::new(FixedClock::new(datetime!(2026-02-10 06:00 UTC)));
        let hash: String = bcrypt::hash(DEMO_PASSWORD, TEST_BCRYPT_COST).unwrap();
        AppState {
            store: Arc::new(Mutex::new(Store::seeded(
                clock,
                StoreConfig::default(),
                &hash,
            ))),
            bcrypt_cost: TEST_BCRYPT_COST,
            latency: Duration::ZERO,
        }
    }

    /// Helper to build a request, optionally acting as a user and carrying a JSON body.
    fn create_test_request(
        method: &str,
        uri: &str,
        actor: Option<&str>,
        body: Option<&Value>,
    ) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(user_id) = actor {
            builder = builder.header(ACTOR_HEADER, user_id);
        }
        match body {
            Some(json_body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(json_body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Sends one request and returns the status and parsed body.
    async fn send(app: &Router, request: HttpRequest<Body>) -> (HttpStatusCode, Value) {
        let response: Response = app.clone().oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn create_test_intake() -> Value {
        json!({
            "location_id": "LOC-PUN-01",
            "vehicle_type": "new",
            "customer_name": "Kavya Iyer",
            "customer_phone": "+91 98450 11223",
            "vehicle_number": "mh12ab9090",
            "priority": "P2",
            "expected_duration_minutes": 30,
            "reason": "Walk-in"
        })
    }

    #[tokio::test]
    async fn test_login_returns_user_and_permissions() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({"username": "SuperAdmin", "password": DEMO_PASSWORD});

        let (status, response) =
            send(&app, create_test_request("POST", "/login", None, Some(&body))).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["user"]["user_id"], "USR-SA-1");
        assert!(response["permissions"].is_object());
        assert!(response["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({"username": "superadmin", "password": "wrong-password"});

        let (status, response) =
            send(&app, create_test_request("POST", "/login", None, Some(&body))).await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(response["error"], true);
    }

    #[tokio::test]
    async fn test_missing_actor_header_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());

        let (status, response) = send(&app, create_test_request("GET", "/queue", None, None)).await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(response["error"], true);
        assert!(
            response["message"]
                .as_str()
                .unwrap()
                .contains(ACTOR_HEADER)
        );
    }

    #[tokio::test]
    async fn test_unknown_actor_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(
            &app,
            create_test_request("GET", "/whoami", Some("USR-NOPE"), None),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_whoami_reports_actor() {
        let app: Router = build_router(create_test_app_state());

        let (status, response) = send(
            &app,
            create_test_request("GET", "/whoami", Some("USR-OPS-1"), None),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["user"]["role_id"], "ops_admin");
    }

    #[tokio::test]
    async fn test_create_queue_item_then_list() {
        let app: Router = build_router(create_test_app_state());

        let (status, created) = send(
            &app,
            create_test_request("POST", "/queue", Some("USR-OPS-1"), Some(&create_test_intake())),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(created["outcome"]["kind"], "created");
        assert_eq!(created["outcome"]["id"], "PDI-24006");
        assert_eq!(created["audit_event_ids"][0], "EVT-1002");

        let (status, listed) = send(
            &app,
            create_test_request(
                "GET",
                "/queue?location_id=LOC-PUN-01&vehicle_type=new",
                Some("USR-OPS-1"),
                None,
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(listed["queue"][0]["id"], "PDI-24006");
        assert_eq!(listed["queue"][0]["vehicle_number"], "MH12AB9090");
    }

    #[tokio::test]
    async fn test_viewer_cannot_create_queue_item() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        let (status, response) = send(
            &app,
            create_test_request("POST", "/queue", Some("USR-RO-1"), Some(&create_test_intake())),
        )
        .await;

        assert_eq!(status, HttpStatusCode::FORBIDDEN);
        assert_eq!(response["error"], true);
        assert_eq!(app_state.store.lock().await.state().queue.len(), 5);
    }

    #[tokio::test]
    async fn test_blank_customer_name_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        let mut intake: Value = create_test_intake();
        intake["customer_name"] = json!("  ");

        let (status, _) = send(
            &app,
            create_test_request("POST", "/queue", Some("USR-OPS-1"), Some(&intake)),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_location_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(
            &app,
            create_test_request(
                "GET",
                "/dashboard?location_id=LOC-XXX-99",
                Some("USR-OPS-1"),
                None,
            ),
        )
        .await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_closing_unpaid_job_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({"status": "closed", "reason": "Done"});

        let (status, response) = send(
            &app,
            create_test_request(
                "POST",
                "/queue/PDI-24001/status",
                Some("USR-OPS-1"),
                Some(&body),
            ),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["error"], true);
    }

    #[tokio::test]
    async fn test_closing_paid_job_succeeds_and_is_audited() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({"status": "closed", "reason": "Inspection complete"});

        let (status, _) = send(
            &app,
            create_test_request(
                "POST",
                "/queue/PDI-24003/status",
                Some("USR-OPS-1"),
                Some(&body),
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, audit) = send(
            &app,
            create_test_request(
                "GET",
                "/audit?entity_type=queue_item",
                Some("USR-SA-1"),
                None,
            ),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(audit["entries"][0]["entity"]["id"], "PDI-24003");
        assert_eq!(audit["entries"][0]["reason"], "Inspection complete");
    }

    #[tokio::test]
    async fn test_auto_assign_returns_correlation_id() {
        let app: Router = build_router(create_test_app_state());

        let (status, response) = send(
            &app,
            create_test_request("POST", "/queue/auto_assign", Some("USR-OPS-1"), Some(&json!({}))),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["outcome"]["kind"], "assigned");
        assert!(
            response["outcome"]["correlation_id"]
                .as_str()
                .unwrap()
                .starts_with("AUTO-")
        );
    }

    #[tokio::test]
    async fn test_quote_uses_mapping_and_surcharge() {
        let app: Router = build_router(create_test_app_state());

        let (status, response) = send(
            &app,
            create_test_request(
                "GET",
                "/vehicle_master/quote?condition=new&make_id=MAKE-HONDA&model_id=MODEL-CITY&variant_id=VAR-VX&distance_km=15",
                Some("USR-RO-1"),
                None,
            ),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["mapping_id"], "MAP-0002");
        assert_eq!(response["total_inr"], 700);
    }

    #[tokio::test]
    async fn test_create_make_through_kind_segment() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({"name": "Kia", "reason": "Catalog refresh"});

        let (status, response) = send(
            &app,
            create_test_request("POST", "/vehicle_master/make", Some("USR-FIN-1"), Some(&body)),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["outcome"]["id"], "MAKE-KIA");
    }

    #[tokio::test]
    async fn test_unknown_master_kind_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        let body: Value = json!({"name": "Kia"});

        let (status, _) = send(
            &app,
            create_test_request("POST", "/vehicle_master/brand", Some("USR-FIN-1"), Some(&body)),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_checklist_score_by_condition() {
        let app: Router = build_router(create_test_app_state());

        let (status, response) = send(
            &app,
            create_test_request(
                "POST",
                "/checklists/new/score",
                Some("USR-RO-1"),
                Some(&json!({"checked": 3})),
            ),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["score_pct"], 80);
    }

    #[tokio::test]
    async fn test_super_admin_cannot_delete_self() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(
            &app,
            create_test_request(
                "DELETE",
                "/users/USR-SA-1",
                Some("USR-SA-1"),
                Some(&json!({"reason": "Cleanup"})),
            ),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_http_error_status_mapping() {
        let cases: Vec<(ApiError, HttpStatusCode)> = vec![
            (
                ApiError::AuthenticationFailed {
                    reason: String::from("x"),
                },
                HttpStatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Unauthorized {
                    action: String::from("x"),
                    required_permission: String::from("queue:update"),
                },
                HttpStatusCode::FORBIDDEN,
            ),
            (
                ApiError::DomainRuleViolation {
                    rule: String::from("x"),
                    message: String::from("x"),
                },
                HttpStatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::InvalidInput {
                    field: String::from("x"),
                    message: String::from("x"),
                },
                HttpStatusCode::BAD_REQUEST,
            ),
            (
                ApiError::PasswordPolicyViolation {
                    message: String::from("x"),
                },
                HttpStatusCode::BAD_REQUEST,
            ),
            (
                ApiError::ResourceNotFound {
                    resource_type: String::from("x"),
                    message: String::from("x"),
                },
                HttpStatusCode::NOT_FOUND,
            ),
            (
                ApiError::Internal {
                    message: String::from("x"),
                },
                HttpStatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let http_error: HttpError = HttpError::from(err);
            assert_eq!(http_error.status, expected);
        }
    }

    #[tokio::test]
    async fn test_drift_task_keeps_store_consistent() {
        let app_state: AppState = create_test_app_state();
        let handle = spawn_drift(Arc::clone(&app_state.store), Duration::from_millis(5));

        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.abort();

        let store = app_state.store.lock().await;
        assert!(store.state().queue.len() >= 5);
        assert_eq!(store.state().inspectors.len(), 5);
    }

    #[tokio::test]
    async fn test_watch_drift_reports_stopped_task() {
        let app_state: AppState = create_test_app_state();
        let handle: JoinHandle<()> =
            spawn_drift(Arc::clone(&app_state.store), Duration::from_millis(5));
        let abort: AbortHandle = handle.abort_handle();
        let watcher: JoinHandle<DriftExit> = tokio::spawn(watch_drift(handle));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!watcher.is_finished());
        abort.abort();

        assert_eq!(watcher.await.unwrap(), DriftExit::Cancelled);
    }

    #[tokio::test]
    async fn test_watch_drift_reports_panicked_task() {
        let handle: JoinHandle<()> = tokio::spawn(async { panic!("drift source failed") });

        assert_eq!(watch_drift(handle).await, DriftExit::Panicked);
    }
}
