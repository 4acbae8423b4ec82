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

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use ward_duty::{Clock, FacilityClock, Roster};
use ward_duty_api::{
    ApiError, AuthenticatedActor, BookDutyRequest, BulkCreateSchedulesRequest,
    CancelBookingRequest, CompleteBookingRequest, CreateScheduleRequest, DeleteBookingRequest,
    DutyHistoryView, Role, RotationSiteRequest, ScheduleActionRequest, ScheduleView, Viewer,
    approve_schedule, authenticate_stub, book_duty, bulk_create_schedules, cancel_booking,
    complete_booking, create_schedule, delete_pending_booking, delete_schedule, duty_history,
    reject_schedule, schedule_views,
};
use ward_duty_audit::{AuditEvent, Cause};
use ward_duty_persistence::{
    NotificationData, PersistTransitionResult, PersistenceError, SqlitePersistence,
};

/// Ward Duty Server - HTTP server for the clinical duty roster
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// MySQL/MariaDB connection URL. Takes precedence over --database.
    #[arg(long)]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone the facility's calendar days are evaluated in
    #[arg(short, long, default_value = "Asia/Manila")]
    timezone: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, serialized behind a mutex.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Source of "now" and the facility-local calendar day.
    clock: Arc<dyn Clock>,
}

/// Actor and cause fields common to every write request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorFields {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// API request for creating a schedule.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateScheduleApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The duty date (`YYYY-MM-DD`).
    date: String,
    /// The hospital site code.
    location: String,
    /// Optional human-readable site name.
    site_name: Option<String>,
    /// Shift start (`HH:MM`).
    shift_start: String,
    /// Shift end (`HH:MM`).
    shift_end: String,
    /// Description shown to students.
    description: String,
    /// Seat capacity.
    max_students: u32,
}

/// API request for bulk schedule generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BulkCreateApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// First day of the range (`YYYY-MM-DD`, inclusive).
    start_date: String,
    /// Last day of the range (`YYYY-MM-DD`, inclusive).
    end_date: String,
    /// Weekday indices (0 = Sunday). Defaults to Monday-Friday.
    weekdays: Option<Vec<u8>>,
    /// The monthly site rotation.
    rotation: Vec<RotationSiteApiEntry>,
    /// Shift start (`HH:MM`).
    shift_start: String,
    /// Shift end (`HH:MM`).
    shift_end: String,
    /// Description applied to every generated schedule.
    description: String,
}

/// One rotation entry in a bulk request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RotationSiteApiEntry {
    /// The hospital site code.
    site_code: String,
    /// Optional human-readable site name.
    site_name: Option<String>,
    /// Seat capacity for schedules generated at this site.
    capacity: u32,
}

/// API request for booking a duty.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BookDutyApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
    /// The schedule to book.
    schedule_id: i64,
}

/// API request for actions on a booking or schedule by ID in the path.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorOnlyApiRequest {
    #[serde(flatten)]
    actor: ActorFields,
}

/// Query parameters identifying the viewer of a read endpoint.
#[derive(Debug, Deserialize)]
struct ViewerQuery {
    /// The actor ID.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The linked student (required for parent viewers).
    student_id: Option<i64>,
}

/// Query parameters for the duty log.
#[derive(Debug, Deserialize)]
struct DutyLogQuery {
    /// The actor ID.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// Maximum number of entries (default 50).
    limit: Option<i64>,
}

/// API response for write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Human-readable outcome.
    message: String,
    /// The event ID of the persisted duty log entry.
    event_id: i64,
    /// The booking ID, for operations that created a booking.
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_id: Option<i64>,
    /// The schedule IDs, for operations that created schedules.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    schedule_ids: Vec<i64>,
}

/// Serializable duty log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DutyLogResponse {
    /// The event ID.
    event_id: Option<i64>,
    /// The actor ID.
    actor_id: String,
    /// The actor type.
    actor_type: String,
    /// The action name.
    action_name: String,
    /// Optional action details.
    action_details: Option<String>,
    /// The schedule in scope, if any.
    schedule_id: Option<i64>,
    /// The booking in scope, if any.
    booking_id: Option<i64>,
    /// The affected student, if any.
    target_student_id: Option<i64>,
    /// State before the transition.
    before_snapshot: String,
    /// State after the transition.
    after_snapshot: String,
}

/// Serializable notification entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NotificationResponse {
    /// The notification ID.
    notification_id: i64,
    /// Short title.
    title: String,
    /// Message body.
    message: String,
    /// Severity level.
    severity: String,
    /// Whether the notification has been read.
    read: bool,
    /// Creation timestamp (RFC 3339).
    created_at: String,
}

/// Unread notification count.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnreadCountResponse {
    /// Number of unread notifications.
    unread: i64,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
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
        let status = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::RuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        match err {
            // A storage-level constraint caught a race the optimistic
            // checks missed; report it exactly like the policy would.
            PersistenceError::Conflict(domain_err) => {
                ward_duty_api::translate_domain_error(domain_err).into()
            }
            PersistenceError::NotFound(message) => Self {
                status: StatusCode::NOT_FOUND,
                message,
            },
            other => {
                error!(error = %other, "Persistence error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("Persistence error: {other}"),
                }
            }
        }
    }
}

/// Authenticates the actor fields of a write request.
fn authenticate(fields: &ActorFields) -> Result<(AuthenticatedActor, Cause), HttpError> {
    let role: Role = Role::parse(&fields.actor_role).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;
    let actor: AuthenticatedActor =
        authenticate_stub(fields.actor_id, role).map_err(|e| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: e.to_string(),
        })?;
    let cause: Cause = Cause::new(fields.cause_id.clone(), fields.cause_description.clone());
    Ok((actor, cause))
}

/// Loads the roster for the current facility-local day.
async fn load_roster(app_state: &AppState) -> Result<Roster, HttpError> {
    let today = app_state.clock.today();
    let mut persistence = app_state.persistence.lock().await;
    let roster = persistence.load_roster(today)?;
    drop(persistence);
    Ok(roster)
}

/// Persists a transition and dispatches its notifications best-effort.
async fn persist(
    app_state: &AppState,
    command: &ward_duty::Command,
    transition: &ward_duty::TransitionResult,
) -> Result<PersistTransitionResult, HttpError> {
    let now = app_state.clock.now_utc();
    let mut persistence = app_state.persistence.lock().await;
    let persisted = persistence.persist_transition(command, transition, now)?;
    persistence.dispatch_notifications(&transition.notifications, now);
    drop(persistence);
    Ok(persisted)
}

/// Handler for POST `/schedules` endpoint.
async fn handle_create_schedule(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateScheduleApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        date = %req.date,
        location = %req.location,
        "Handling create_schedule request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = CreateScheduleRequest {
        date: req.date,
        location: req.location,
        site_name: req.site_name,
        shift_start: req.shift_start,
        shift_end: req.shift_end,
        description: req.description,
        max_students: req.max_students,
    };
    let result = create_schedule(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    info!(
        event_id = persisted.event_id,
        "Successfully created schedule"
    );

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: None,
        schedule_ids: persisted.schedule_ids,
    }))
}

/// Handler for POST `/schedules/bulk` endpoint.
async fn handle_bulk_create_schedules(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkCreateApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        start_date = %req.start_date,
        end_date = %req.end_date,
        "Handling bulk_create_schedules request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = BulkCreateSchedulesRequest {
        start_date: req.start_date,
        end_date: req.end_date,
        weekdays: req.weekdays,
        rotation: req
            .rotation
            .into_iter()
            .map(|entry| RotationSiteRequest {
                site_code: entry.site_code,
                site_name: entry.site_name,
                capacity: entry.capacity,
            })
            .collect(),
        shift_start: req.shift_start,
        shift_end: req.shift_end,
        description: req.description,
    };
    let result =
        bulk_create_schedules(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    info!(
        event_id = persisted.event_id,
        created = result.response.created,
        skipped = result.response.skipped,
        "Successfully generated schedules"
    );

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: None,
        schedule_ids: persisted.schedule_ids,
    }))
}

/// Handler for GET `/schedules` endpoint.
///
/// Returns the roster calendar projected for the requesting viewer.
async fn handle_list_schedules(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<ScheduleView>>, HttpError> {
    let viewer = resolve_viewer(&query)?;
    let roster = load_roster(&app_state).await?;

    Ok(Json(schedule_views(&roster, viewer)))
}

/// Handler for POST `/schedules/{id}/approve` endpoint.
async fn handle_approve_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<ActorOnlyApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        schedule_id, "Handling approve_schedule request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = ScheduleActionRequest { schedule_id };
    let result = approve_schedule(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    info!(
        event_id = persisted.event_id,
        students_notified = result.response.students_notified,
        "Successfully approved schedule"
    );

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: None,
        schedule_ids: Vec::new(),
    }))
}

/// Handler for POST `/schedules/{id}/reject` endpoint.
async fn handle_reject_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<ActorOnlyApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        schedule_id, "Handling reject_schedule request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = ScheduleActionRequest { schedule_id };
    let result = reject_schedule(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    info!(
        event_id = persisted.event_id,
        bookings_cancelled = result.response.bookings_cancelled,
        "Successfully rejected schedule"
    );

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: None,
        schedule_ids: Vec::new(),
    }))
}

/// Handler for DELETE `/schedules/{id}` endpoint.
async fn handle_delete_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<ActorOnlyApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        schedule_id, "Handling delete_schedule request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = ScheduleActionRequest { schedule_id };
    let result = delete_schedule(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: None,
        schedule_ids: Vec::new(),
    }))
}

/// Handler for POST `/bookings` endpoint.
async fn handle_book_duty(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BookDutyApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        schedule_id = req.schedule_id,
        "Handling book_duty request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = BookDutyRequest {
        schedule_id: req.schedule_id,
    };
    let result = book_duty(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    info!(
        event_id = persisted.event_id,
        booking_id = ?persisted.booking_id,
        "Successfully booked duty"
    );

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: persisted.booking_id,
        schedule_ids: Vec::new(),
    }))
}

/// Handler for POST `/bookings/{id}/cancel` endpoint.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(req): Json<ActorOnlyApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        booking_id, "Handling cancel_booking request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = CancelBookingRequest { booking_id };
    let result = cancel_booking(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: Some(booking_id),
        schedule_ids: Vec::new(),
    }))
}

/// Handler for POST `/bookings/{id}/complete` endpoint.
async fn handle_complete_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(req): Json<ActorOnlyApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        booking_id, "Handling complete_booking request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = CompleteBookingRequest { booking_id };
    let result = complete_booking(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: Some(booking_id),
        schedule_ids: Vec::new(),
    }))
}

/// Handler for DELETE `/bookings/{id}` endpoint.
async fn handle_delete_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
    Json(req): Json<ActorOnlyApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        booking_id, "Handling delete_booking request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let roster = load_roster(&app_state).await?;

    let request = DeleteBookingRequest { booking_id };
    let result =
        delete_pending_booking(&roster, &request, &actor, cause, app_state.clock.as_ref())?;
    let persisted = persist(&app_state, &result.command, &result.transition).await?;

    Ok(Json(WriteResponse {
        success: true,
        message: result.response.message,
        event_id: persisted.event_id,
        booking_id: Some(booking_id),
        schedule_ids: Vec::new(),
    }))
}

/// Handler for GET `/students/{id}/duties` endpoint.
///
/// Students may read their own history; parents the linked student's;
/// admins anyone's.
async fn handle_student_duties(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<DutyHistoryView>>, HttpError> {
    let viewer = resolve_viewer(&query)?;
    let allowed = match viewer {
        Viewer::Admin => true,
        Viewer::Student(id) | Viewer::Parent { student_id: id } => id == student_id,
    };
    if !allowed {
        return Err(HttpError {
            status: StatusCode::FORBIDDEN,
            message: String::from("You can only view your own duty history"),
        });
    }

    let roster = load_roster(&app_state).await?;
    Ok(Json(duty_history(&roster, student_id)))
}

/// Handler for GET `/duty_log` endpoint. Admin only.
async fn handle_duty_log(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<DutyLogQuery>,
) -> Result<Json<Vec<DutyLogResponse>>, HttpError> {
    let role: Role = Role::parse(&query.actor_role).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;
    if role != Role::Admin {
        return Err(HttpError {
            status: StatusCode::FORBIDDEN,
            message: String::from("Unauthorized: 'view duty log' requires admin role"),
        });
    }

    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEvent> = persistence.get_duty_log(query.limit.unwrap_or(50))?;
    drop(persistence);

    let response: Vec<DutyLogResponse> = events.iter().map(duty_log_to_response).collect();
    Ok(Json(response))
}

/// Handler for GET `/notifications` endpoint.
async fn handle_notifications(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<NotificationResponse>>, HttpError> {
    let role: Role = Role::parse(&query.actor_role).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;

    let mut persistence = app_state.persistence.lock().await;
    let rows: Vec<NotificationData> = match role {
        Role::Admin => persistence.notifications_for_admins(50)?,
        Role::Student | Role::Parent => {
            persistence.notifications_for_student(query.actor_id, 50)?
        }
    };
    drop(persistence);

    let response: Vec<NotificationResponse> = rows
        .into_iter()
        .map(|row| NotificationResponse {
            notification_id: row.notification_id,
            title: row.title,
            message: row.message,
            severity: row.severity,
            read: row.is_read != 0,
            created_at: row.created_at,
        })
        .collect();
    Ok(Json(response))
}

/// Handler for GET `/notifications/unread_count` endpoint.
async fn handle_unread_count(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<UnreadCountResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let unread = persistence.unread_count_for_student(query.actor_id)?;
    drop(persistence);

    Ok(Json(UnreadCountResponse { unread }))
}

/// Handler for POST `/notifications/{id}/read` endpoint.
async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    Path(notification_id): Path<i64>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let now = app_state.clock.now_utc();
    let mut persistence = app_state.persistence.lock().await;
    persistence.mark_notification_read(notification_id, now)?;
    drop(persistence);

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Resolves the viewer of a read endpoint from its query parameters.
fn resolve_viewer(query: &ViewerQuery) -> Result<Viewer, HttpError> {
    let role: Role = Role::parse(&query.actor_role).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;
    match role {
        Role::Admin => Ok(Viewer::Admin),
        Role::Student => Ok(Viewer::Student(query.actor_id)),
        Role::Parent => query.student_id.map_or_else(
            || {
                Err(HttpError {
                    status: StatusCode::BAD_REQUEST,
                    message: String::from("Parent viewers must pass student_id"),
                })
            },
            |student_id| Ok(Viewer::Parent { student_id }),
        ),
    }
}

/// Converts an `AuditEvent` to a `DutyLogResponse`.
fn duty_log_to_response(event: &AuditEvent) -> DutyLogResponse {
    DutyLogResponse {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        schedule_id: event.schedule_id,
        booking_id: event.booking_id,
        target_student_id: event.target_student_id,
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/schedules", post(handle_create_schedule))
        .route("/schedules", get(handle_list_schedules))
        .route("/schedules/bulk", post(handle_bulk_create_schedules))
        .route("/schedules/{schedule_id}/approve", post(handle_approve_schedule))
        .route("/schedules/{schedule_id}/reject", post(handle_reject_schedule))
        .route("/schedules/{schedule_id}", delete(handle_delete_schedule))
        .route("/bookings", post(handle_book_duty))
        .route("/bookings/{booking_id}/cancel", post(handle_cancel_booking))
        .route("/bookings/{booking_id}/complete", post(handle_complete_booking))
        .route("/bookings/{booking_id}", delete(handle_delete_booking))
        .route("/students/{student_id}/duties", get(handle_student_duties))
        .route("/duty_log", get(handle_duty_log))
        .route("/notifications", get(handle_notifications))
        .route("/notifications/unread_count", get(handle_unread_count))
        .route(
            "/notifications/{notification_id}/read",
            post(handle_mark_notification_read),
        )
        .with_state(app_state)
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

    info!("Initializing Ward Duty Server");

    let clock: FacilityClock = FacilityClock::new(&args.timezone)?;
    info!(timezone = clock.timezone_name(), "Facility timezone set");

    // Initialize persistence based on CLI arguments
    let persistence: SqlitePersistence = if let Some(mysql_url) = &args.mysql_url {
        info!("Using MySQL database");
        SqlitePersistence::new_with_mysql_url(mysql_url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: Arc::new(clock),
    };

    // Expired markers can no longer block anything; clear them out at
    // startup.
    {
        let today = app_state.clock.today();
        let mut persistence = app_state.persistence.lock().await;
        persistence.prune_expired_markers(today)?;
    }

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
