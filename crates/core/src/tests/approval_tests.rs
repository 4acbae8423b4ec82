// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the schedule approval state machine and the rejection cascade.

use super::helpers::{
    NOW, admin_actor, booking, roster_with_schedule, student_actor, test_cause, test_clock,
};
use crate::{Command, CoreError, NotificationRecipient, REJECTION_CANCEL_REASON, Roster, apply};
use ward_duty_domain::{BookingStatus, DomainError, ScheduleStatus, active_count};

fn approve(roster: &Roster, schedule_id: i64) -> Result<crate::TransitionResult, CoreError> {
    apply(
        roster,
        Command::ApproveSchedule {
            schedule_id,
            admin_id: 1,
        },
        admin_actor(),
        test_cause(),
        &test_clock(),
    )
}

fn reject(roster: &Roster, schedule_id: i64) -> Result<crate::TransitionResult, CoreError> {
    apply(
        roster,
        Command::RejectSchedule {
            schedule_id,
            admin_id: 1,
        },
        admin_actor(),
        test_cause(),
        &test_clock(),
    )
}

#[test]
fn test_approving_unknown_schedule_fails() {
    let result = approve(&Roster::new(), 99);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ScheduleNotFound(99)))
    ));
}

#[test]
fn test_approval_sets_status_and_attribution() {
    let roster = roster_with_schedule();

    let result = approve(&roster, 1).unwrap();

    let schedule = result.new_roster.schedule(1).unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Approved);
    assert_eq!(schedule.approved_by, Some(1));
    assert_eq!(schedule.approved_at, Some(NOW));
}

#[test]
fn test_approval_notifies_every_booked_student() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let result = approve(&roster, 1).unwrap();

    assert_eq!(result.notifications.len(), 2);
    let recipients: Vec<NotificationRecipient> = result
        .notifications
        .iter()
        .map(|n| n.recipient)
        .collect();
    assert!(recipients.contains(&NotificationRecipient::Student(7)));
    assert!(recipients.contains(&NotificationRecipient::Student(8)));
}

#[test]
fn test_approval_leaves_bookings_booked() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));

    let result = approve(&roster, 1).unwrap();

    assert_eq!(
        result.new_roster.booking(10).unwrap().status,
        BookingStatus::Booked
    );
}

#[test]
fn test_approved_schedule_cannot_be_approved_again() {
    let roster = roster_with_schedule();
    let approved = approve(&roster, 1).unwrap();

    let again = approve(&approved.new_roster, 1);

    assert!(matches!(
        again,
        Err(CoreError::DomainViolation(
            DomainError::InvalidScheduleTransition {
                from: ScheduleStatus::Approved,
                to: ScheduleStatus::Approved
            }
        ))
    ));
}

#[test]
fn test_approved_schedule_cannot_be_rejected() {
    let roster = roster_with_schedule();
    let approved = approve(&roster, 1).unwrap();

    let rejected = reject(&approved.new_roster, 1);

    assert!(matches!(
        rejected,
        Err(CoreError::DomainViolation(
            DomainError::InvalidScheduleTransition { .. }
        ))
    ));
}

#[test]
fn test_reject_cascades_to_all_booked_bookings() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let result = reject(&roster, 1).unwrap();

    let schedule = result.new_roster.schedule(1).unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Cancelled);
    for booking_id in [10, 11] {
        let b = result.new_roster.booking(booking_id).unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(
            b.cancellation_reason.as_deref(),
            Some(REJECTION_CANCEL_REASON)
        );
        assert!(b.cancelled_at.is_some());
    }
}

#[test]
fn test_reject_notifies_every_cancelled_student() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let result = reject(&roster, 1).unwrap();

    assert_eq!(result.notifications.len(), 2);
}

#[test]
fn test_reject_leaves_no_booked_booking_behind() {
    // The cascade invariant: after rejection no reader may observe a
    // cancelled schedule with live bookings.
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));

    let result = reject(&roster, 1).unwrap();

    let live = result
        .new_roster
        .bookings
        .iter()
        .filter(|b| b.schedule_id == 1 && b.status == BookingStatus::Booked)
        .count();
    assert_eq!(live, 0);
}

#[test]
fn test_reject_records_no_cancellation_markers() {
    // The administrative cascade bypasses the cancellation policy, so
    // students are free to book a replacement duty the same day.
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));

    let result = reject(&roster, 1).unwrap();

    assert!(result.new_roster.markers.is_empty());
}

#[test]
fn test_reject_does_not_touch_cancelled_bookings() {
    let mut roster = roster_with_schedule();
    let mut prior = booking(10, 1, 7);
    prior.status = BookingStatus::Cancelled;
    prior.cancellation_reason = Some(String::from("Cancelled by student"));
    roster.bookings.push(prior);

    let result = reject(&roster, 1).unwrap();

    assert_eq!(
        result
            .new_roster
            .booking(10)
            .unwrap()
            .cancellation_reason
            .as_deref(),
        Some("Cancelled by student")
    );
    assert!(result.notifications.is_empty());
}

#[test]
fn test_delete_schedule_removes_schedule_and_bookings() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let result = apply(
        &roster,
        Command::DeleteSchedule {
            schedule_id: 1,
            admin_id: 1,
        },
        admin_actor(),
        test_cause(),
        &test_clock(),
    )
    .unwrap();

    assert!(result.new_roster.schedules.is_empty());
    assert!(result.new_roster.bookings.is_empty());
}

#[test]
fn test_delete_schedule_has_no_status_precondition() {
    let roster = roster_with_schedule();
    let approved = approve(&roster, 1).unwrap();

    let result = apply(
        &approved.new_roster,
        Command::DeleteSchedule {
            schedule_id: 1,
            admin_id: 1,
        },
        admin_actor(),
        test_cause(),
        &test_clock(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_spec_scenario_booking_approval_completion() {
    // Schedule S1 with two seats: A books, B books, C is refused,
    // admin approves (both stay booked, both notified), A completes
    // and the seat count stays at two.
    let roster = roster_with_schedule();

    let a = apply(
        &roster,
        Command::BookDuty {
            schedule_id: 1,
            student_id: 7,
        },
        student_actor(7),
        test_cause(),
        &test_clock(),
    )
    .unwrap();
    let mut state = a.new_roster;
    state.bookings[0].booking_id = Some(10);

    let b = apply(
        &state,
        Command::BookDuty {
            schedule_id: 1,
            student_id: 8,
        },
        student_actor(8),
        test_cause(),
        &test_clock(),
    )
    .unwrap();
    let mut state = b.new_roster;
    state.bookings[1].booking_id = Some(11);

    let c = apply(
        &state,
        Command::BookDuty {
            schedule_id: 1,
            student_id: 9,
        },
        student_actor(9),
        test_cause(),
        &test_clock(),
    );
    assert!(matches!(
        c,
        Err(CoreError::DomainViolation(DomainError::CapacityExceeded {
            current: 2,
            max: 2
        }))
    ));

    let approved = approve(&state, 1).unwrap();
    assert_eq!(approved.notifications.len(), 2);
    let state = approved.new_roster;

    let completed = apply(
        &state,
        Command::CompleteBooking {
            booking_id: 10,
            student_id: 7,
        },
        student_actor(7),
        test_cause(),
        &test_clock(),
    )
    .unwrap();

    let schedule = completed.new_roster.schedule(1).unwrap();
    assert_eq!(active_count(schedule, &completed.new_roster.bookings), 2);
}
