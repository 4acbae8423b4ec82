// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the booking policy: capacity, duplicates, the one-duty-per-day
//! rule and the same-day rebooking block.

use super::helpers::{
    TODAY, booking, roster_with_schedule, schedule, student_actor, test_cause, test_clock,
};
use crate::{
    CoreError, Command, NotificationRecipient, Roster, apply,
};
use time::macros::date;
use ward_duty_domain::{BookingStatus, CancellationMarker, DomainError};

fn book(roster: &Roster, schedule_id: i64, student_id: i64) -> Result<crate::TransitionResult, CoreError> {
    apply(
        roster,
        Command::BookDuty {
            schedule_id,
            student_id,
        },
        student_actor(student_id),
        test_cause(),
        &test_clock(),
    )
}

#[test]
fn test_booking_unknown_schedule_fails() {
    let roster = Roster::new();

    let result = book(&roster, 99, 7);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ScheduleNotFound(99)))
    ));
}

#[test]
fn test_successful_booking_adds_booked_row() {
    let roster = roster_with_schedule();

    let result = book(&roster, 1, 7).unwrap();

    assert_eq!(result.new_roster.bookings.len(), 1);
    let created = &result.new_roster.bookings[0];
    assert_eq!(created.booking_id, None);
    assert_eq!(created.schedule_id, 1);
    assert_eq!(created.student_id, 7);
    assert_eq!(created.status, BookingStatus::Booked);
}

#[test]
fn test_successful_booking_notifies_admins() {
    let roster = roster_with_schedule();

    let result = book(&roster, 1, 7).unwrap();

    assert_eq!(result.notifications.len(), 1);
    assert_eq!(
        result.notifications[0].recipient,
        NotificationRecipient::AllAdmins
    );
    assert_eq!(result.notifications[0].title, "New Duty Booking");
}

#[test]
fn test_booking_audit_event_names_student_and_schedule() {
    let roster = roster_with_schedule();

    let result = book(&roster, 1, 7).unwrap();

    assert_eq!(result.audit_event.action.name, "BookDuty");
    assert_eq!(result.audit_event.schedule_id, Some(1));
    assert_eq!(result.audit_event.target_student_id, Some(7));
}

#[test]
fn test_full_schedule_rejects_booking_with_counts() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let result = book(&roster, 1, 9);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::CapacityExceeded {
            current: 2,
            max: 2
        }))
    ));
}

#[test]
fn test_completed_booking_still_occupies_seat_for_capacity() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    let mut completed = booking(11, 1, 8);
    completed.status = BookingStatus::Completed;
    roster.bookings.push(completed);

    let result = book(&roster, 1, 9);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::CapacityExceeded { .. }
        ))
    ));
}

#[test]
fn test_cancelled_booking_frees_its_seat() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    let mut cancelled = booking(11, 1, 8);
    cancelled.status = BookingStatus::Cancelled;
    roster.bookings.push(cancelled);

    assert!(book(&roster, 1, 9).is_ok());
}

#[test]
fn test_duplicate_booking_on_same_schedule_fails() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));

    let result = book(&roster, 1, 7);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::DuplicateBooking {
            schedule_id: 1,
            student_id: 7
        }))
    ));
}

#[test]
fn test_one_duty_per_day_across_sites() {
    // Two schedules on the same date at different sites.
    let mut roster = roster_with_schedule();
    let mut other_site = schedule(2, date!(2026 - 03 - 10), 2);
    other_site.location = ward_duty_domain::HospitalSite::new("ISDH-CABUGAO");
    roster.schedules.push(other_site);
    roster.bookings.push(booking(10, 1, 7));

    let result = book(&roster, 2, 7);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::ConflictingDateBooking { student_id: 7, .. }
        ))
    ));
}

#[test]
fn test_other_date_does_not_conflict() {
    let mut roster = roster_with_schedule();
    roster.schedules.push(schedule(2, date!(2026 - 03 - 11), 2));
    roster.bookings.push(booking(10, 1, 7));

    assert!(book(&roster, 2, 7).is_ok());
}

#[test]
fn test_same_day_cancellation_marker_blocks_rebooking() {
    let mut roster = roster_with_schedule();
    roster
        .markers
        .push(CancellationMarker::new(7, date!(2026 - 03 - 10), TODAY));

    let result = book(&roster, 1, 7);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::SameDayRebookBlocked { student_id: 7, .. }
        ))
    ));
}

#[test]
fn test_marker_from_yesterday_does_not_block() {
    let mut roster = roster_with_schedule();
    roster.markers.push(CancellationMarker::new(
        7,
        date!(2026 - 03 - 10),
        date!(2026 - 03 - 04),
    ));

    assert!(book(&roster, 1, 7).is_ok());
}

#[test]
fn test_marker_blocks_other_schedule_on_same_date() {
    // The block is keyed by duty date, not by schedule: cancelling a
    // booking at one site blocks rebooking that date anywhere today.
    let mut roster = roster_with_schedule();
    let mut other_site = schedule(2, date!(2026 - 03 - 10), 2);
    other_site.location = ward_duty_domain::HospitalSite::new("ISDH-CABUGAO");
    roster.schedules.push(other_site);
    roster
        .markers
        .push(CancellationMarker::new(7, date!(2026 - 03 - 10), TODAY));

    let result = book(&roster, 2, 7);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::SameDayRebookBlocked { .. }
        ))
    ));
}

#[test]
fn test_capacity_check_precedes_duplicate_check() {
    // The failure modes are checked in a fixed order; a full schedule
    // reports capacity even to a student who already holds a seat there.
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let result = book(&roster, 1, 7);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::CapacityExceeded { .. }
        ))
    ));
}

#[test]
fn test_spec_capacity_scenario_two_seats_three_students() {
    // A books, B books, C is refused with 2/2; see the approval tests
    // for the admin half of this scenario.
    let roster = roster_with_schedule();

    let after_a = book(&roster, 1, 7).unwrap().new_roster;
    let mut after_a_persisted = after_a;
    after_a_persisted.bookings[0].booking_id = Some(10);

    let after_b = book(&after_a_persisted, 1, 8).unwrap().new_roster;
    let mut after_b_persisted = after_b;
    after_b_persisted.bookings[1].booking_id = Some(11);

    let result = book(&after_b_persisted, 1, 9);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::CapacityExceeded {
            current: 2,
            max: 2
        }))
    ));
}
