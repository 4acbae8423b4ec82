// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for role enforcement at the API boundary.

use super::helpers::{
    admin, booking, parent, roster_with_schedule, student, test_cause, test_clock,
};
use crate::{
    ApiError, BookDutyRequest, CancelBookingRequest, CreateScheduleRequest, Role,
    ScheduleActionRequest, approve_schedule, authenticate_stub, book_duty, cancel_booking,
    create_schedule, reject_schedule,
};

fn create_request() -> CreateScheduleRequest {
    CreateScheduleRequest {
        date: String::from("2026-03-20"),
        location: String::from("ISDH-MAGSINGAL"),
        site_name: None,
        shift_start: String::from("08:00"),
        shift_end: String::from("20:00"),
        description: String::from("Community Health Center Duty"),
        max_students: 4,
    }
}

#[test]
fn test_authenticate_stub_rejects_non_positive_ids() {
    assert!(authenticate_stub(0, Role::Student).is_err());
    assert!(authenticate_stub(-3, Role::Admin).is_err());
    assert!(authenticate_stub(7, Role::Student).is_ok());
}

#[test]
fn test_role_parse_is_case_insensitive() {
    assert_eq!(Role::parse("Admin").unwrap(), Role::Admin);
    assert_eq!(Role::parse("STUDENT").unwrap(), Role::Student);
    assert_eq!(Role::parse("parent").unwrap(), Role::Parent);
    assert!(Role::parse("operator").is_err());
}

#[test]
fn test_student_cannot_create_schedules() {
    let result = create_schedule(
        &roster_with_schedule(),
        &create_request(),
        &student(7),
        test_cause(),
        &test_clock(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_parent_cannot_create_schedules() {
    let result = create_schedule(
        &roster_with_schedule(),
        &create_request(),
        &parent(),
        test_cause(),
        &test_clock(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_admin_cannot_book_duties() {
    let result = book_duty(
        &roster_with_schedule(),
        &BookDutyRequest { schedule_id: 1 },
        &admin(),
        test_cause(),
        &test_clock(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_parent_cannot_book_duties() {
    let result = book_duty(
        &roster_with_schedule(),
        &BookDutyRequest { schedule_id: 1 },
        &parent(),
        test_cause(),
        &test_clock(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_student_cannot_approve_or_reject() {
    let roster = roster_with_schedule();
    let request = ScheduleActionRequest { schedule_id: 1 };

    assert!(matches!(
        approve_schedule(&roster, &request, &student(7), test_cause(), &test_clock()),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        reject_schedule(&roster, &request, &student(7), test_cause(), &test_clock()),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_student_cancelling_anothers_booking_is_unauthorized() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));

    let result = cancel_booking(
        &roster,
        &CancelBookingRequest { booking_id: 10 },
        &student(8),
        test_cause(),
        &test_clock(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_admin_may_cancel_any_booking() {
    let mut roster = roster_with_schedule();
    roster.bookings.push(booking(10, 1, 7));

    let result = cancel_booking(
        &roster,
        &CancelBookingRequest { booking_id: 10 },
        &admin(),
        test_cause(),
        &test_clock(),
    );

    assert!(result.is_ok());
}
