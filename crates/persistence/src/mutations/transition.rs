// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Atomic persistence of roster transitions.
//!
//! `persist_transition` writes the rows a core transition produced in
//! one database transaction: the primary mutation plus its duty log
//! entry either both commit or neither does. The booking constraints
//! declared in the migrations are authoritative; when a write loses a
//! race that slipped past the optimistic policy checks, the resulting
//! constraint violation is translated back into the matching
//! `DomainError` kind instead of surfacing as a raw database error.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use tracing::debug;
use ward_duty::{Command, TransitionResult};
use ward_duty_audit::AuditEvent;
use ward_duty_domain::{Booking, DomainError, Schedule};

use crate::backend::PersistenceBackend;
use crate::data_models::{
    ActionData, ActorData, CauseData, NewBookingRow, NewDutyLogRow, NewMarkerRow, NewScheduleRow,
    StateSnapshotData, format_datetime, parse_date,
};
use crate::diesel_schema::{bookings, cancellation_markers, duty_logs, schedules};
use crate::error::PersistenceError;

/// The identifiers assigned by the database while persisting a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The duty log event ID.
    pub event_id: i64,
    /// The booking ID, for transitions that inserted a booking.
    pub booking_id: Option<i64>,
    /// The schedule IDs, for transitions that inserted schedules.
    pub schedule_ids: Vec<i64>,
}

/// Builds the insertable duty log row for an audit event.
///
/// The overrides backfill IDs the database assigned during this same
/// transaction, which the pure core transition could not know yet.
fn duty_log_row(
    event: &AuditEvent,
    schedule_id: Option<i64>,
    booking_id: Option<i64>,
    recorded_at: OffsetDateTime,
) -> Result<NewDutyLogRow, PersistenceError> {
    let actor_json = serde_json::to_string(&ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    })?;
    let cause_json = serde_json::to_string(&CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    })?;
    let action_json = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_snapshot_json = serde_json::to_string(&StateSnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_snapshot_json = serde_json::to_string(&StateSnapshotData {
        data: event.after.data.clone(),
    })?;

    Ok(NewDutyLogRow {
        schedule_id: schedule_id.or(event.schedule_id),
        booking_id: booking_id.or(event.booking_id),
        target_student_id: event.target_student_id,
        actor_json,
        cause_json,
        action_json,
        before_snapshot_json,
        after_snapshot_json,
        created_at: format_datetime(recorded_at)?,
    })
}

/// Returns the schedules the transition created (not yet persisted).
fn created_schedules(result: &TransitionResult) -> Vec<&Schedule> {
    result
        .new_roster
        .schedules
        .iter()
        .filter(|s| s.schedule_id.is_none())
        .collect()
}

/// Returns the booking the transition created, if any.
fn created_booking(result: &TransitionResult) -> Option<&Booking> {
    result
        .new_roster
        .bookings
        .iter()
        .find(|b| b.booking_id.is_none())
}

/// Translates a failed schedule insert.
fn translate_schedule_conflict(
    error: &diesel::result::Error,
    schedule: &Schedule,
) -> PersistenceError {
    if is_unique_violation(error) {
        return PersistenceError::Conflict(DomainError::DuplicateSiteDate {
            date: schedule.date,
            location: schedule.location.code().to_string(),
        });
    }
    PersistenceError::DatabaseError(error.to_string())
}

/// Returns whether the error is a unique constraint violation.
fn is_unique_violation(error: &diesel::result::Error) -> bool {
    matches!(
        error,
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Extracts the backend message from a database error.
fn database_error_message(error: &diesel::result::Error) -> String {
    match error {
        diesel::result::Error::DatabaseError(_, info) => info.message().to_string(),
        other => other.to_string(),
    }
}

backend_fn! {

/// Persists a core transition atomically.
///
/// The primary mutation, marker maintenance and the duty log entry are
/// wrapped in one transaction. Constraint violations raised by the
/// storage layer are translated into `PersistenceError::Conflict` with
/// the matching domain error; capacity conflicts re-query the
/// authoritative counts so the error reports the same `current/max`
/// numbers a pre-check would have.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `command` - The command that produced the transition
/// * `result` - The transition produced by the core
/// * `recorded_at` - Timestamp for the duty log entry
///
/// # Errors
///
/// Returns an error if the write fails; a lost race surfaces as
/// `PersistenceError::Conflict`.
#[allow(clippy::too_many_lines)]
pub fn persist_transition(
    conn: &mut _,
    command: &Command,
    result: &TransitionResult,
    recorded_at: OffsetDateTime,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.transaction::<PersistTransitionResult, PersistenceError, _>(|conn| {
        let mut booking_id: Option<i64> = None;
        let mut schedule_ids: Vec<i64> = Vec::new();

        match command {
            Command::CreateSchedule { .. } | Command::BulkCreateSchedules { .. } => {
                for schedule in created_schedules(result) {
                    let row = NewScheduleRow::from_domain(schedule)?;
                    diesel::insert_into(schedules::table)
                        .values(&row)
                        .execute(conn)
                        .map_err(|e| translate_schedule_conflict(&e, schedule))?;
                    schedule_ids.push(conn.last_insert_rowid()?);
                }
            }
            Command::BookDuty {
                schedule_id,
                student_id,
            } => {
                let booking = created_booking(result).ok_or_else(|| {
                    PersistenceError::Other(String::from(
                        "BookDuty transition carries no new booking",
                    ))
                })?;
                let row = NewBookingRow::from_domain(booking)?;
                if let Err(error) =
                    diesel::insert_into(bookings::table).values(&row).execute(conn)
                {
                    // The optimistic checks lost a race; the violated
                    // constraint tells us which rule fired.
                    let message = database_error_message(&error);

                    if message.contains("capacity exceeded") {
                        let max: i32 = schedules::table
                            .filter(schedules::schedule_id.eq(*schedule_id))
                            .select(schedules::max_students)
                            .first(conn)
                            .unwrap_or(0);
                        let current: i64 = bookings::table
                            .filter(bookings::schedule_id.eq(*schedule_id))
                            .filter(bookings::status.ne("cancelled"))
                            .count()
                            .get_result(conn)
                            .unwrap_or(0);
                        return Err(PersistenceError::Conflict(
                            DomainError::CapacityExceeded {
                                current: u32::try_from(current).unwrap_or(u32::MAX),
                                max: u32::try_from(max).unwrap_or(0),
                            },
                        ));
                    }

                    if message.contains("duplicate date booking") {
                        let date = schedules::table
                            .filter(schedules::schedule_id.eq(*schedule_id))
                            .select(schedules::duty_date)
                            .first::<String>(conn)
                            .ok()
                            .and_then(|d| parse_date(&d).ok());
                        if let Some(date) = date {
                            return Err(PersistenceError::Conflict(
                                DomainError::ConflictingDateBooking {
                                    date,
                                    student_id: *student_id,
                                },
                            ));
                        }
                    }

                    if is_unique_violation(&error)
                        || message.contains("duplicate active booking")
                    {
                        return Err(PersistenceError::Conflict(
                            DomainError::DuplicateBooking {
                                schedule_id: *schedule_id,
                                student_id: *student_id,
                            },
                        ));
                    }

                    return Err(PersistenceError::DatabaseError(error.to_string()));
                }
                booking_id = Some(conn.last_insert_rowid()?);
            }
            Command::CancelBooking {
                booking_id: cancelled_id,
                ..
            } => {
                let booking = result
                    .new_roster
                    .booking(*cancelled_id)
                    .ok_or(PersistenceError::Conflict(DomainError::BookingNotFound(
                        *cancelled_id,
                    )))?;
                let cancelled_at = booking.cancelled_at.map(format_datetime).transpose()?;
                diesel::update(
                    bookings::table.filter(bookings::booking_id.eq(*cancelled_id)),
                )
                .set((
                    bookings::status.eq(booking.status.as_str()),
                    bookings::cancelled_at.eq(cancelled_at),
                    bookings::cancellation_reason.eq(booking.cancellation_reason.clone()),
                ))
                .execute(conn)?;

                // Two cancellations of the same duty date on the same
                // day collide on the marker's unique triple; the
                // second insert is harmless and ignored.
                if let Some(marker) = result.new_roster.markers.last() {
                    let marker_row = NewMarkerRow::from_domain(marker)?;
                    match diesel::insert_into(cancellation_markers::table)
                        .values(&marker_row)
                        .execute(conn)
                    {
                        Ok(_)
                        | Err(diesel::result::Error::DatabaseError(
                            DatabaseErrorKind::UniqueViolation,
                            _,
                        )) => {}
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            Command::CompleteBooking {
                booking_id: completed_id,
                ..
            } => {
                let booking = result
                    .new_roster
                    .booking(*completed_id)
                    .ok_or(PersistenceError::Conflict(DomainError::BookingNotFound(
                        *completed_id,
                    )))?;
                let completed_at = booking.completed_at.map(format_datetime).transpose()?;
                diesel::update(
                    bookings::table.filter(bookings::booking_id.eq(*completed_id)),
                )
                .set((
                    bookings::status.eq(booking.status.as_str()),
                    bookings::completed_at.eq(completed_at),
                ))
                .execute(conn)?;
            }
            Command::DeletePendingBooking {
                booking_id: deleted_id,
                ..
            } => {
                // The status filter re-checks the precondition at the
                // authoritative layer.
                let removed = diesel::delete(
                    bookings::table
                        .filter(bookings::booking_id.eq(*deleted_id))
                        .filter(bookings::status.eq("booked")),
                )
                .execute(conn)?;
                if removed == 0 {
                    return Err(PersistenceError::Conflict(DomainError::BookingNotFound(
                        *deleted_id,
                    )));
                }
            }
            Command::ApproveSchedule { schedule_id, .. } => {
                let schedule = result
                    .new_roster
                    .schedule(*schedule_id)
                    .ok_or(PersistenceError::Conflict(DomainError::ScheduleNotFound(
                        *schedule_id,
                    )))?;
                let approved_at = schedule.approved_at.map(format_datetime).transpose()?;
                diesel::update(
                    schedules::table.filter(schedules::schedule_id.eq(*schedule_id)),
                )
                .set((
                    schedules::status.eq(schedule.status.as_str()),
                    schedules::approved_by.eq(schedule.approved_by),
                    schedules::approved_at.eq(approved_at),
                ))
                .execute(conn)?;
            }
            Command::RejectSchedule { schedule_id, .. } => {
                // The cascade and the status flip are one transaction:
                // no reader may observe a cancelled schedule with live
                // bookings.
                let cancelled_at = format_datetime(recorded_at)?;
                diesel::update(
                    bookings::table
                        .filter(bookings::schedule_id.eq(*schedule_id))
                        .filter(bookings::status.eq("booked")),
                )
                .set((
                    bookings::status.eq("cancelled"),
                    bookings::cancelled_at.eq(cancelled_at),
                    bookings::cancellation_reason.eq(ward_duty::REJECTION_CANCEL_REASON),
                ))
                .execute(conn)?;
                diesel::update(
                    schedules::table.filter(schedules::schedule_id.eq(*schedule_id)),
                )
                .set(schedules::status.eq("cancelled"))
                .execute(conn)?;
            }
            Command::DeleteSchedule { schedule_id, .. } => {
                // Bookings go with the schedule via ON DELETE CASCADE.
                diesel::delete(
                    schedules::table.filter(schedules::schedule_id.eq(*schedule_id)),
                )
                .execute(conn)?;
            }
        }

        // A lone created schedule is attributable; bulk creation stays
        // unscoped.
        let schedule_id_override = if schedule_ids.len() == 1 {
            schedule_ids.first().copied()
        } else {
            None
        };
        let log_row = duty_log_row(
            &result.audit_event,
            schedule_id_override,
            booking_id,
            recorded_at,
        )?;
        diesel::insert_into(duty_logs::table)
            .values(&log_row)
            .execute(conn)?;
        let event_id = conn.last_insert_rowid()?;

        debug!(event_id, action = %result.audit_event.action.name, "Persisted transition");

        Ok(PersistTransitionResult {
            event_id,
            booking_id,
            schedule_ids,
        })
    })
}

}
