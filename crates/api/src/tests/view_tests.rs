// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the role-parameterized roster projections.

use super::helpers::{booking, roster_with_schedule, schedule};
use crate::{Viewer, duty_history, schedule_views};
use time::macros::date;
use ward_duty_domain::BookingStatus;

#[test]
fn test_admin_view_includes_occupants() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let views = schedule_views(&roster, Viewer::Admin);

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].active_count, 2);
    assert_eq!(views[0].remaining, 0);
    assert!(views[0].is_full);
    assert_eq!(views[0].occupants.len(), 2);
    assert_eq!(views[0].occupants[0].student_id, 7);
}

#[test]
fn test_student_view_hides_other_students() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let views = schedule_views(&roster, Viewer::Student(7));

    assert!(views[0].occupants.is_empty());
    let own = views[0].own_booking.as_ref().unwrap();
    assert_eq!(own.booking_id, 10);
    assert_eq!(own.status, "booked");
    // Seat counts stay visible so students can find open slots.
    assert_eq!(views[0].active_count, 2);
    assert!(views[0].is_full);
}

#[test]
fn test_student_without_booking_sees_no_own_booking() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));

    let views = schedule_views(&roster, Viewer::Student(9));

    assert!(views[0].own_booking.is_none());
    assert_eq!(views[0].remaining, 1);
}

#[test]
fn test_cancelled_booking_is_not_an_own_booking() {
    let mut roster = roster_with_schedule();
    let mut cancelled = booking(10, 1, 7);
    cancelled.status = BookingStatus::Cancelled;
    roster.bookings.push(cancelled);

    let views = schedule_views(&roster, Viewer::Student(7));

    assert!(views[0].own_booking.is_none());
    assert_eq!(views[0].active_count, 0);
}

#[test]
fn test_parent_view_mirrors_linked_student() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));
    roster.bookings.push(booking(11, 1, 8));

    let parent_views = schedule_views(&roster, Viewer::Parent { student_id: 7 });

    assert!(parent_views[0].occupants.is_empty());
    assert_eq!(parent_views[0].own_booking.as_ref().unwrap().booking_id, 10);
}

#[test]
fn test_duty_history_is_scoped_and_newest_first() {
    let mut roster = roster_with_schedule();
    roster.schedules.push(schedule(2, date!(2026 - 03 - 11), 2));
    let mut early = booking(10, 1, 7);
    early.booking_time = time::macros::datetime!(2026-03-01 09:00 UTC);
    let mut late = booking(11, 2, 7);
    late.booking_time = time::macros::datetime!(2026-03-02 09:00 UTC);
    roster.bookings.push(early);
    roster.bookings.push(late);
    roster.bookings.push(booking(12, 1, 8));

    let history = duty_history(&roster, 7);

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].booking_id, 11);
    assert_eq!(history[1].booking_id, 10);
    assert_eq!(history[0].location, "ISDH-MAGSINGAL");
}

#[test]
fn test_duty_history_carries_cancellation_details() {
    let mut roster = roster_with_schedule();
    let mut cancelled = booking(10, 1, 7);
    cancelled.status = BookingStatus::Cancelled;
    cancelled.cancelled_at = Some(time::macros::datetime!(2026-03-03 10:00 UTC));
    cancelled.cancellation_reason = Some(String::from("Cancelled by student"));
    roster.bookings.push(cancelled);

    let history = duty_history(&roster, 7);

    assert_eq!(history[0].booking_status, "cancelled");
    assert!(history[0].cancelled_at.is_some());
    assert_eq!(
        history[0].cancellation_reason.as_deref(),
        Some("Cancelled by student")
    );
}
