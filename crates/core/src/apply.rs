// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure roster transitions.
//!
//! Every command is applied against an immutable roster and yields a
//! new roster, exactly one audit event, and the notifications the
//! transition produced. The checks here are optimistic: the
//! persistence layer re-enforces the capacity and uniqueness rules at
//! write time and translates constraint violations back into the same
//! error kinds, so races between concurrent sessions cannot slip past.

use crate::clock::Clock;
use crate::command::{CancelActor, Command};
use crate::error::CoreError;
use crate::state::{
    Notification, NotificationRecipient, Roster, Severity, TransitionResult,
};
use time::Date;
use ward_duty_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ward_duty_domain::{
    Booking, BookingStatus, CancellationMarker, DomainError, Schedule, ScheduleStatus,
    active_count, duty_dates_in_range, is_full, site_for_month, validate_schedule_date,
    validate_schedule_fields, validate_site_date_unique,
};

/// Reason recorded on bookings cancelled by an admin rejection cascade.
pub const REJECTION_CANCEL_REASON: &str = "Schedule rejected by admin";

/// Applies a command to the current roster, producing a new roster,
/// an audit event, and notifications.
///
/// # Arguments
///
/// * `roster` - The current roster (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `clock` - Source of the current instant and facility-local day
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new roster, audit event and
///   notifications
/// * `Err(CoreError)` if the command violates a domain rule
///
/// # Errors
///
/// Returns an error if the command violates domain rules; see
/// `DomainError` for the failure taxonomy.
pub fn apply(
    roster: &Roster,
    command: Command,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::CreateSchedule {
            date,
            location,
            shift,
            description,
            max_students,
            admin_id,
        } => {
            validate_schedule_date(date, clock.today())?;

            let schedule: Schedule = Schedule::new(
                date,
                location,
                shift,
                description,
                max_students,
                admin_id,
                clock.now_utc(),
            );
            validate_schedule_fields(&schedule)?;
            validate_site_date_unique(date, &schedule.location, &roster.schedules)?;

            let before: StateSnapshot = roster.to_snapshot();
            let mut new_roster: Roster = roster.clone();
            new_roster.schedules.push(schedule.clone());
            let after: StateSnapshot = new_roster.to_snapshot();

            let action: Action = Action::new(
                String::from("CreateSchedule"),
                Some(format!(
                    "Created schedule at '{}' on {} ({} seats)",
                    schedule.location, schedule.date, schedule.max_students
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, None, None, None);

            Ok(TransitionResult {
                new_roster,
                audit_event,
                notifications: Vec::new(),
            })
        }
        Command::BulkCreateSchedules {
            start_date,
            end_date,
            weekdays,
            rotation,
            shift,
            description,
            admin_id,
        } => {
            validate_schedule_date(start_date, clock.today())?;

            let dates: Vec<Date> = duty_dates_in_range(start_date, end_date, &weekdays)?;

            let before: StateSnapshot = roster.to_snapshot();
            let mut new_roster: Roster = roster.clone();
            let mut created: usize = 0;
            let mut skipped: usize = 0;

            for date in dates {
                let site = site_for_month(&rotation, date)?;
                // A (date, site) pair that is already scheduled is skipped,
                // so a range can be re-run to fill gaps.
                if validate_site_date_unique(date, &site.site, &new_roster.schedules).is_err() {
                    skipped += 1;
                    continue;
                }
                let schedule: Schedule = Schedule::new(
                    date,
                    site.site.clone(),
                    shift,
                    description.clone(),
                    site.default_capacity,
                    admin_id,
                    clock.now_utc(),
                );
                validate_schedule_fields(&schedule)?;
                new_roster.schedules.push(schedule);
                created += 1;
            }

            let after: StateSnapshot = new_roster.to_snapshot();
            let action: Action = Action::new(
                String::from("BulkCreateSchedules"),
                Some(format!(
                    "Generated {created} schedules from {start_date} to {end_date} ({skipped} already scheduled)"
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, None, None, None);

            Ok(TransitionResult {
                new_roster,
                audit_event,
                notifications: Vec::new(),
            })
        }
        Command::BookDuty {
            schedule_id,
            student_id,
        } => book_duty(roster, schedule_id, student_id, actor, cause, clock),
        Command::CancelBooking {
            booking_id,
            actor: cancel_actor,
        } => cancel_booking(roster, booking_id, cancel_actor, actor, cause, clock),
        Command::CompleteBooking {
            booking_id,
            student_id,
        } => complete_booking(roster, booking_id, student_id, actor, cause, clock),
        Command::DeletePendingBooking {
            booking_id,
            student_id,
        } => delete_pending_booking(roster, booking_id, student_id, actor, cause),
        Command::ApproveSchedule {
            schedule_id,
            admin_id,
        } => approve_schedule(roster, schedule_id, admin_id, actor, cause, clock),
        Command::RejectSchedule { schedule_id, .. } => {
            reject_schedule(roster, schedule_id, actor, cause, clock)
        }
        Command::DeleteSchedule { schedule_id, .. } => {
            delete_schedule(roster, schedule_id, actor, cause)
        }
    }
}

/// The booking policy.
///
/// Preconditions, in order, each a distinct failure:
/// schedule exists, seats remain, no active booking on this schedule,
/// no booked duty anywhere on the date, no same-day cancellation marker.
fn book_duty(
    roster: &Roster,
    schedule_id: i64,
    student_id: i64,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    let schedule: &Schedule = roster
        .schedule(schedule_id)
        .ok_or(DomainError::ScheduleNotFound(schedule_id))?;

    if is_full(schedule, &roster.bookings) {
        return Err(CoreError::DomainViolation(DomainError::CapacityExceeded {
            current: active_count(schedule, &roster.bookings),
            max: schedule.max_students,
        }));
    }

    let already_on_schedule = roster
        .bookings
        .iter()
        .any(|b| b.schedule_id == schedule_id && b.student_id == student_id && b.occupies_seat());
    if already_on_schedule {
        return Err(CoreError::DomainViolation(DomainError::DuplicateBooking {
            schedule_id,
            student_id,
        }));
    }

    // One duty per calendar day, across all sites.
    if roster.booked_on_date(student_id, schedule.date).is_some() {
        return Err(CoreError::DomainViolation(
            DomainError::ConflictingDateBooking {
                date: schedule.date,
                student_id,
            },
        ));
    }

    let today: Date = clock.today();
    if roster
        .markers
        .iter()
        .any(|m| m.blocks(student_id, schedule.date, today))
    {
        return Err(CoreError::DomainViolation(
            DomainError::SameDayRebookBlocked {
                date: schedule.date,
                student_id,
            },
        ));
    }

    let duty_date: Date = schedule.date;
    let before: StateSnapshot = roster.to_snapshot();
    let mut new_roster: Roster = roster.clone();
    new_roster
        .bookings
        .push(Booking::new(schedule_id, student_id, clock.now_utc()));
    let after: StateSnapshot = new_roster.to_snapshot();

    let action: Action = Action::new(
        String::from("BookDuty"),
        Some(format!("Student booked duty for {duty_date}")),
    );
    // The booking ID is assigned by the persistence layer on insert.
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        Some(schedule_id),
        None,
        Some(student_id),
    );

    let notifications: Vec<Notification> = vec![Notification::new(
        NotificationRecipient::AllAdmins,
        String::from("New Duty Booking"),
        format!("A student has booked duty for {duty_date}"),
        Severity::Info,
    )];

    Ok(TransitionResult {
        new_roster,
        audit_event,
        notifications,
    })
}

/// The cancellation policy.
///
/// Nobody may cancel on the duty's own calendar day; students may only
/// cancel their own bookings. A successful cancellation records a
/// same-day marker so the student cannot rebook the date until tomorrow.
fn cancel_booking(
    roster: &Roster,
    booking_id: i64,
    cancel_actor: CancelActor,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    let booking: &Booking = roster
        .booking(booking_id)
        .ok_or(DomainError::BookingNotFound(booking_id))?;
    let schedule: &Schedule = roster
        .schedule(booking.schedule_id)
        .ok_or(DomainError::ScheduleNotFound(booking.schedule_id))?;

    let today: Date = clock.today();
    if schedule.date == today {
        return Err(CoreError::DomainViolation(
            DomainError::SameDayCancelForbidden {
                date: schedule.date,
            },
        ));
    }

    if let CancelActor::Student(student_id) = cancel_actor
        && booking.student_id != student_id
    {
        return Err(CoreError::DomainViolation(DomainError::NotBookingOwner {
            booking_id,
            student_id,
        }));
    }

    booking.status.validate_transition(BookingStatus::Cancelled)?;

    let owner_id: i64 = booking.student_id;
    let duty_date: Date = schedule.date;
    let reason: &str = match cancel_actor {
        CancelActor::Student(_) => "Cancelled by student",
        CancelActor::Admin(_) => "Cancelled by admin",
    };

    let before: StateSnapshot = roster.to_snapshot();
    let mut new_roster: Roster = roster.clone();
    for b in &mut new_roster.bookings {
        if b.booking_id == Some(booking_id) {
            b.status = BookingStatus::Cancelled;
            b.cancelled_at = Some(clock.now_utc());
            b.cancellation_reason = Some(reason.to_string());
        }
    }
    new_roster
        .markers
        .push(CancellationMarker::new(owner_id, duty_date, today));
    let after: StateSnapshot = new_roster.to_snapshot();

    let action: Action = Action::new(
        String::from("CancelBooking"),
        Some(format!("Duty for {duty_date} cancelled ({reason})")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        Some(schedule.schedule_id.unwrap_or_default()),
        Some(booking_id),
        Some(owner_id),
    );

    // A student cancelling sees the outcome synchronously; only an
    // admin-initiated cancellation needs to reach the student.
    let notifications: Vec<Notification> = match cancel_actor {
        CancelActor::Admin(_) => vec![Notification::new(
            NotificationRecipient::Student(owner_id),
            String::from("Duty Booking Cancelled"),
            format!("Your duty booking for {duty_date} was cancelled by an admin"),
            Severity::Warning,
        )],
        CancelActor::Student(_) => Vec::new(),
    };

    Ok(TransitionResult {
        new_roster,
        audit_event,
        notifications,
    })
}

/// Marks a duty as performed.
///
/// Only the owning student may complete a booking, and only once the
/// schedule has been approved. The seat stays occupied afterwards.
fn complete_booking(
    roster: &Roster,
    booking_id: i64,
    student_id: i64,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    let booking: &Booking = roster
        .booking(booking_id)
        .ok_or(DomainError::BookingNotFound(booking_id))?;

    if booking.student_id != student_id {
        return Err(CoreError::DomainViolation(DomainError::NotBookingOwner {
            booking_id,
            student_id,
        }));
    }

    let schedule: &Schedule = roster
        .schedule(booking.schedule_id)
        .ok_or(DomainError::ScheduleNotFound(booking.schedule_id))?;
    if schedule.status != ScheduleStatus::Approved {
        return Err(CoreError::DomainViolation(
            DomainError::CompletionRequiresApprovedSchedule {
                booking_id,
                schedule_status: schedule.status,
            },
        ));
    }

    booking.status.validate_transition(BookingStatus::Completed)?;

    let duty_date: Date = schedule.date;
    let before: StateSnapshot = roster.to_snapshot();
    let mut new_roster: Roster = roster.clone();
    for b in &mut new_roster.bookings {
        if b.booking_id == Some(booking_id) {
            b.status = BookingStatus::Completed;
            b.completed_at = Some(clock.now_utc());
        }
    }
    let after: StateSnapshot = new_roster.to_snapshot();

    let action: Action = Action::new(
        String::from("CompleteBooking"),
        Some(format!("Duty for {duty_date} marked as completed")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        Some(schedule.schedule_id.unwrap_or_default()),
        Some(booking_id),
        Some(student_id),
    );

    Ok(TransitionResult {
        new_roster,
        audit_event,
        notifications: Vec::new(),
    })
}

/// Hard-deletes a booked booking under a still-pending schedule.
///
/// This is a permanent removal, not a status transition; the seat is
/// freed immediately. Approved or completed bookings cannot be deleted.
fn delete_pending_booking(
    roster: &Roster,
    booking_id: i64,
    student_id: i64,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let booking: &Booking = roster
        .booking(booking_id)
        .ok_or(DomainError::BookingNotFound(booking_id))?;

    if booking.student_id != student_id {
        return Err(CoreError::DomainViolation(DomainError::NotBookingOwner {
            booking_id,
            student_id,
        }));
    }

    let schedule: &Schedule = roster
        .schedule(booking.schedule_id)
        .ok_or(DomainError::ScheduleNotFound(booking.schedule_id))?;
    if booking.status != BookingStatus::Booked || schedule.status != ScheduleStatus::Pending {
        return Err(CoreError::DomainViolation(
            DomainError::DeleteRequiresPendingBooking {
                booking_id,
                booking_status: booking.status,
                schedule_status: schedule.status,
            },
        ));
    }

    let duty_date: Date = schedule.date;
    let before: StateSnapshot = roster.to_snapshot();
    let mut new_roster: Roster = roster.clone();
    new_roster
        .bookings
        .retain(|b| b.booking_id != Some(booking_id));
    let after: StateSnapshot = new_roster.to_snapshot();

    let action: Action = Action::new(
        String::from("DeletePendingBooking"),
        Some(format!("Booking for {duty_date} permanently removed")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        Some(schedule.schedule_id.unwrap_or_default()),
        Some(booking_id),
        Some(student_id),
    );

    Ok(TransitionResult {
        new_roster,
        audit_event,
        notifications: Vec::new(),
    })
}

/// Approves a pending schedule and notifies every booked student.
fn approve_schedule(
    roster: &Roster,
    schedule_id: i64,
    admin_id: i64,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    let schedule: &Schedule = roster
        .schedule(schedule_id)
        .ok_or(DomainError::ScheduleNotFound(schedule_id))?;
    schedule
        .status
        .validate_transition(ScheduleStatus::Approved)?;

    let duty_date: Date = schedule.date;
    let before: StateSnapshot = roster.to_snapshot();
    let mut new_roster: Roster = roster.clone();
    for s in &mut new_roster.schedules {
        if s.schedule_id == Some(schedule_id) {
            s.status = ScheduleStatus::Approved;
            s.approved_by = Some(admin_id);
            s.approved_at = Some(clock.now_utc());
        }
    }
    let after: StateSnapshot = new_roster.to_snapshot();

    let notifications: Vec<Notification> = roster
        .bookings
        .iter()
        .filter(|b| b.schedule_id == schedule_id && b.status == BookingStatus::Booked)
        .map(|b| {
            Notification::new(
                NotificationRecipient::Student(b.student_id),
                String::from("Duty Schedule Approved"),
                format!("Your duty schedule for {duty_date} has been approved"),
                Severity::Success,
            )
        })
        .collect();

    let action: Action = Action::new(
        String::from("ApproveSchedule"),
        Some(format!(
            "Approved schedule at '{}' on {} ({} students notified)",
            schedule.location,
            duty_date,
            notifications.len()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        Some(schedule_id),
        None,
        None,
    );

    Ok(TransitionResult {
        new_roster,
        audit_event,
        notifications,
    })
}

/// Rejects a pending schedule.
///
/// Every booking still `Booked` under the schedule is cancelled with a
/// fixed reason, bypassing the same-day and ownership checks of the
/// cancellation policy, then the schedule itself is cancelled. The
/// persistence layer writes the whole cascade in one transaction so no
/// reader can observe a cancelled schedule with live bookings.
fn reject_schedule(
    roster: &Roster,
    schedule_id: i64,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    let schedule: &Schedule = roster
        .schedule(schedule_id)
        .ok_or(DomainError::ScheduleNotFound(schedule_id))?;
    schedule
        .status
        .validate_transition(ScheduleStatus::Cancelled)?;

    let duty_date: Date = schedule.date;
    let before: StateSnapshot = roster.to_snapshot();
    let mut new_roster: Roster = roster.clone();
    let mut cancelled_students: Vec<i64> = Vec::new();

    for b in &mut new_roster.bookings {
        if b.schedule_id == schedule_id && b.status == BookingStatus::Booked {
            b.status = BookingStatus::Cancelled;
            b.cancelled_at = Some(clock.now_utc());
            b.cancellation_reason = Some(REJECTION_CANCEL_REASON.to_string());
            cancelled_students.push(b.student_id);
        }
    }
    for s in &mut new_roster.schedules {
        if s.schedule_id == Some(schedule_id) {
            s.status = ScheduleStatus::Cancelled;
        }
    }
    let after: StateSnapshot = new_roster.to_snapshot();

    let notifications: Vec<Notification> = cancelled_students
        .iter()
        .map(|student_id| {
            Notification::new(
                NotificationRecipient::Student(*student_id),
                String::from("Duty Schedule Rejected"),
                format!(
                    "Your duty booking for {duty_date} was cancelled: schedule rejected by admin"
                ),
                Severity::Warning,
            )
        })
        .collect();

    let action: Action = Action::new(
        String::from("RejectSchedule"),
        Some(format!(
            "Rejected schedule at '{}' on {} ({} bookings cancelled)",
            schedule.location,
            duty_date,
            cancelled_students.len()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        Some(schedule_id),
        None,
        None,
    );

    Ok(TransitionResult {
        new_roster,
        audit_event,
        notifications,
    })
}

/// Unconditionally removes a schedule and all its bookings.
///
/// Unlike rejection this is destructive and applies to any schedule
/// status. The bookings go with the schedule by referential cascade.
fn delete_schedule(
    roster: &Roster,
    schedule_id: i64,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let schedule: &Schedule = roster
        .schedule(schedule_id)
        .ok_or(DomainError::ScheduleNotFound(schedule_id))?;
    let duty_date: Date = schedule.date;
    let location: String = schedule.location.to_string();

    let before: StateSnapshot = roster.to_snapshot();
    let mut new_roster: Roster = roster.clone();
    let bookings_before: usize = new_roster.bookings.len();
    new_roster.bookings.retain(|b| b.schedule_id != schedule_id);
    let removed: usize = bookings_before - new_roster.bookings.len();
    new_roster
        .schedules
        .retain(|s| s.schedule_id != Some(schedule_id));
    let after: StateSnapshot = new_roster.to_snapshot();

    let action: Action = Action::new(
        String::from("DeleteSchedule"),
        Some(format!(
            "Deleted schedule at '{location}' on {duty_date} ({removed} bookings removed)"
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        Some(schedule_id),
        None,
        None,
    );

    Ok(TransitionResult {
        new_roster,
        audit_event,
        notifications: Vec::new(),
    })
}
