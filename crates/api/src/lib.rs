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

mod capabilities;
mod error;
mod request_response;
mod views;

#[cfg(test)]
mod tests;

use tracing::debug;
use ward_duty::{
    CancelActor, Clock, Command, Roster, TransitionResult, apply,
};
use ward_duty_audit::{Actor, Cause};
use ward_duty_domain::{
    BookingStatus, HospitalSite, RotationSite, ShiftWindow, duty_dates_in_range,
};

pub use capabilities::{Capability, require, role_has};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use request_response::{
    ApproveScheduleResponse, BookDutyRequest, BookDutyResponse, BulkCreateSchedulesRequest,
    BulkCreateSchedulesResponse, CancelBookingRequest, CancelBookingResponse,
    CompleteBookingRequest, CompleteBookingResponse, CreateScheduleRequest,
    CreateScheduleResponse, DeleteBookingRequest, DeleteBookingResponse,
    DeleteScheduleResponse, RejectScheduleResponse, RotationSiteRequest, ScheduleActionRequest,
};
pub use views::{
    DutyHistoryView, OccupantView, OwnBookingView, ScheduleView, Viewer, duty_history,
    schedule_views,
};

use request_response::{parse_date_field, parse_time_field, parse_weekday_index};

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: manages schedules and approves bookings.
    ///
    /// Admins may create, bulk-generate, approve, reject and delete
    /// schedules, and may cancel any student's booking.
    Admin,
    /// Student role: books, cancels, completes and deletes their own
    /// duty bookings.
    Student,
    /// Parent role: read-only visibility of the linked student's duties.
    Parent,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }

    /// Parses a role from a string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the string is not a
    /// recognized role.
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            "parent" => Ok(Self::Parent),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: '{s}'. Must be 'admin', 'student' or 'parent'"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor's user ID.
    pub id: i64,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.to_string(), self.role.as_str().to_string())
    }
}

/// Stub authentication function.
///
/// This does NOT implement real authentication - credential checking
/// is outside this system's scope. The caller asserts an identity and
/// a role; in a deployment this is fed from the session layer in
/// front of the API.
///
/// # Arguments
///
/// * `actor_id` - The identifier of the actor to authenticate
/// * `role` - The role to assign to the actor
///
/// # Errors
///
/// Returns an error if the asserted identity is invalid.
pub fn authenticate_stub(actor_id: i64, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id <= 0 {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID must be positive"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// The result of a successful API operation.
///
/// Carries the user-facing response alongside the command and
/// transition the caller must hand to the persistence layer.
#[derive(Debug, Clone)]
pub struct ApiResult<T> {
    /// The user-facing response.
    pub response: T,
    /// The command that was applied.
    pub command: Command,
    /// The transition to persist.
    pub transition: TransitionResult,
}

fn run(
    roster: &Roster,
    command: Command,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, ApiError> {
    apply(roster, command, actor.to_audit_actor(), cause, clock).map_err(translate_core_error)
}

/// Creates a single duty schedule.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the schedule
/// violates a creation rule.
pub fn create_schedule(
    roster: &Roster,
    request: &CreateScheduleRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<CreateScheduleResponse>, ApiError> {
    require(actor, Capability::CreateSchedule)?;

    let date = parse_date_field(&request.date, "date")?;
    let shift = ShiftWindow::new(
        parse_time_field(&request.shift_start, "shift_start")?,
        parse_time_field(&request.shift_end, "shift_end")?,
    )
    .map_err(translate_domain_error)?;
    let location = request.site_name.as_ref().map_or_else(
        || HospitalSite::new(&request.location),
        |name| HospitalSite::with_name(&request.location, name),
    );

    let command = Command::CreateSchedule {
        date,
        location,
        shift,
        description: request.description.clone(),
        max_students: request.max_students,
        admin_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    debug!(date = %request.date, location = %request.location, "Schedule created");

    Ok(ApiResult {
        response: CreateScheduleResponse {
            date: request.date.clone(),
            location: request.location.to_uppercase(),
            max_students: request.max_students,
            message: String::from("Schedule created successfully"),
        },
        command,
        transition,
    })
}

/// Generates schedules over a date range using the monthly site rotation.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the range is invalid.
pub fn bulk_create_schedules(
    roster: &Roster,
    request: &BulkCreateSchedulesRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<BulkCreateSchedulesResponse>, ApiError> {
    require(actor, Capability::BulkCreateSchedules)?;

    let start_date = parse_date_field(&request.start_date, "start_date")?;
    let end_date = parse_date_field(&request.end_date, "end_date")?;
    let shift = ShiftWindow::new(
        parse_time_field(&request.shift_start, "shift_start")?,
        parse_time_field(&request.shift_end, "shift_end")?,
    )
    .map_err(translate_domain_error)?;

    let weekdays = match &request.weekdays {
        Some(indices) => indices
            .iter()
            .map(|i| parse_weekday_index(*i))
            .collect::<Result<Vec<_>, _>>()?,
        None => ward_duty_domain::DEFAULT_DUTY_WEEKDAYS.to_vec(),
    };
    let rotation: Vec<RotationSite> = request
        .rotation
        .iter()
        .map(|site| {
            let hospital = site.site_name.as_ref().map_or_else(
                || HospitalSite::new(&site.site_code),
                |name| HospitalSite::with_name(&site.site_code, name),
            );
            RotationSite::new(hospital, site.capacity)
        })
        .collect();

    let requested = duty_dates_in_range(start_date, end_date, &weekdays)
        .map_err(translate_domain_error)?
        .len();

    let command = Command::BulkCreateSchedules {
        start_date,
        end_date,
        weekdays,
        rotation,
        shift,
        description: request.description.clone(),
        admin_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    let created = transition
        .new_roster
        .schedules
        .iter()
        .filter(|s| s.schedule_id.is_none())
        .count();
    let skipped = requested - created;

    Ok(ApiResult {
        response: BulkCreateSchedulesResponse {
            created,
            skipped,
            message: format!("Created {created} schedules successfully"),
        },
        command,
        transition,
    })
}

/// Books a duty seat for the acting student.
///
/// # Errors
///
/// Returns an error if the actor is not a student or a booking rule
/// rejects the request.
pub fn book_duty(
    roster: &Roster,
    request: &BookDutyRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<BookDutyResponse>, ApiError> {
    require(actor, Capability::BookDuty)?;

    let date = roster
        .schedule_date(request.schedule_id)
        .map(|d| d.to_string());

    let command = Command::BookDuty {
        schedule_id: request.schedule_id,
        student_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    Ok(ApiResult {
        response: BookDutyResponse {
            schedule_id: request.schedule_id,
            date: date.unwrap_or_default(),
            message: String::from("Duty booked successfully! Waiting for admin approval"),
        },
        command,
        transition,
    })
}

/// Cancels a booking.
///
/// Students may cancel only their own bookings; admins may cancel any.
///
/// # Errors
///
/// Returns an error if the actor lacks the capability or a
/// cancellation rule rejects the request.
pub fn cancel_booking(
    roster: &Roster,
    request: &CancelBookingRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<CancelBookingResponse>, ApiError> {
    let cancel_actor = match actor.role {
        Role::Admin => {
            require(actor, Capability::CancelAnyBooking)?;
            CancelActor::Admin(actor.id)
        }
        Role::Student | Role::Parent => {
            require(actor, Capability::CancelOwnBooking)?;
            CancelActor::Student(actor.id)
        }
    };

    let date = roster
        .booking(request.booking_id)
        .and_then(|b| roster.schedule_date(b.schedule_id))
        .map(|d| d.to_string());

    let command = Command::CancelBooking {
        booking_id: request.booking_id,
        actor: cancel_actor,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    Ok(ApiResult {
        response: CancelBookingResponse {
            booking_id: request.booking_id,
            date: date.unwrap_or_default(),
            message: String::from(
                "Duty cancelled successfully. Note: you cannot book another duty for this date today",
            ),
        },
        command,
        transition,
    })
}

/// Marks the acting student's duty as completed.
///
/// # Errors
///
/// Returns an error if the actor is not the owning student or the
/// schedule is not approved.
pub fn complete_booking(
    roster: &Roster,
    request: &CompleteBookingRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<CompleteBookingResponse>, ApiError> {
    require(actor, Capability::CompleteBooking)?;

    let command = Command::CompleteBooking {
        booking_id: request.booking_id,
        student_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    Ok(ApiResult {
        response: CompleteBookingResponse {
            booking_id: request.booking_id,
            message: String::from("Duty marked as completed"),
        },
        command,
        transition,
    })
}

/// Hard-deletes the acting student's booked entry under a pending schedule.
///
/// # Errors
///
/// Returns an error if the booking is not the actor's, not booked, or
/// its schedule is no longer pending.
pub fn delete_pending_booking(
    roster: &Roster,
    request: &DeleteBookingRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<DeleteBookingResponse>, ApiError> {
    require(actor, Capability::DeleteOwnPendingBooking)?;

    let command = Command::DeletePendingBooking {
        booking_id: request.booking_id,
        student_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    Ok(ApiResult {
        response: DeleteBookingResponse {
            booking_id: request.booking_id,
            message: String::from("Duty entry deleted successfully"),
        },
        command,
        transition,
    })
}

/// Approves a pending schedule.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the schedule is
/// not pending.
pub fn approve_schedule(
    roster: &Roster,
    request: &ScheduleActionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<ApproveScheduleResponse>, ApiError> {
    require(actor, Capability::ApproveSchedule)?;

    let command = Command::ApproveSchedule {
        schedule_id: request.schedule_id,
        admin_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;
    let students_notified = transition.notifications.len();

    Ok(ApiResult {
        response: ApproveScheduleResponse {
            schedule_id: request.schedule_id,
            students_notified,
            message: format!(
                "Schedule approved successfully! {students_notified} student(s) notified"
            ),
        },
        command,
        transition,
    })
}

/// Rejects a pending schedule, cancelling every booked booking under it.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the schedule is
/// not pending.
pub fn reject_schedule(
    roster: &Roster,
    request: &ScheduleActionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<RejectScheduleResponse>, ApiError> {
    require(actor, Capability::RejectSchedule)?;

    let command = Command::RejectSchedule {
        schedule_id: request.schedule_id,
        admin_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    let bookings_cancelled = transition
        .new_roster
        .bookings
        .iter()
        .filter(|b| {
            b.schedule_id == request.schedule_id
                && b.status == BookingStatus::Cancelled
                && b.cancellation_reason.as_deref() == Some(ward_duty::REJECTION_CANCEL_REASON)
        })
        .count();

    Ok(ApiResult {
        response: RejectScheduleResponse {
            schedule_id: request.schedule_id,
            bookings_cancelled,
            message: String::from("Schedule rejected and all bookings cancelled"),
        },
        command,
        transition,
    })
}

/// Hard-deletes a schedule and, by cascade, its bookings.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the schedule does
/// not exist.
pub fn delete_schedule(
    roster: &Roster,
    request: &ScheduleActionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<ApiResult<DeleteScheduleResponse>, ApiError> {
    require(actor, Capability::DeleteSchedule)?;

    let command = Command::DeleteSchedule {
        schedule_id: request.schedule_id,
        admin_id: actor.id,
    };
    let transition = run(roster, command.clone(), actor, cause, clock)?;

    Ok(ApiResult {
        response: DeleteScheduleResponse {
            schedule_id: request.schedule_id,
            message: String::from("Schedule deleted successfully"),
        },
        command,
        transition,
    })
}
