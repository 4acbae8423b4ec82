// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Booking, BookingStatus, HospitalSite, Schedule, ScheduleStatus, ShiftWindow, active_count,
    is_full, remaining,
};
use time::macros::{date, datetime, time};

fn schedule_with_capacity(schedule_id: i64, max_students: u32) -> Schedule {
    Schedule::with_id(
        schedule_id,
        date!(2026 - 03 - 10),
        HospitalSite::new("ISDH-MAGSINGAL"),
        ShiftWindow::new(time!(08:00), time!(20:00)).unwrap(),
        String::from("Community Health Center Duty"),
        max_students,
        ScheduleStatus::Pending,
        1,
        datetime!(2026-03-01 08:00 UTC),
        None,
        None,
    )
}

fn booking(booking_id: i64, schedule_id: i64, student_id: i64, status: BookingStatus) -> Booking {
    Booking::with_id(
        booking_id,
        schedule_id,
        student_id,
        datetime!(2026-03-01 09:00 UTC),
        status,
        None,
        None,
        None,
    )
}

#[test]
fn test_empty_schedule_has_full_remaining_capacity() {
    let schedule = schedule_with_capacity(1, 2);

    assert_eq!(active_count(&schedule, &[]), 0);
    assert!(!is_full(&schedule, &[]));
    assert_eq!(remaining(&schedule, &[]), 2);
}

#[test]
fn test_booked_and_completed_count_toward_capacity() {
    let schedule = schedule_with_capacity(1, 3);
    let bookings = vec![
        booking(10, 1, 7, BookingStatus::Booked),
        booking(11, 1, 8, BookingStatus::Completed),
        booking(12, 1, 9, BookingStatus::Cancelled),
    ];

    assert_eq!(active_count(&schedule, &bookings), 2);
    assert_eq!(remaining(&schedule, &bookings), 1);
    assert!(!is_full(&schedule, &bookings));
}

#[test]
fn test_full_schedule_is_full() {
    let schedule = schedule_with_capacity(1, 2);
    let bookings = vec![
        booking(10, 1, 7, BookingStatus::Booked),
        booking(11, 1, 8, BookingStatus::Booked),
    ];

    assert!(is_full(&schedule, &bookings));
    assert_eq!(remaining(&schedule, &bookings), 0);
}

#[test]
fn test_bookings_of_other_schedules_are_ignored() {
    let schedule = schedule_with_capacity(1, 2);
    let bookings = vec![
        booking(10, 2, 7, BookingStatus::Booked),
        booking(11, 3, 8, BookingStatus::Booked),
    ];

    assert_eq!(active_count(&schedule, &bookings), 0);
}

#[test]
fn test_unpersisted_schedule_counts_no_bookings() {
    let schedule = Schedule::new(
        date!(2026 - 03 - 10),
        HospitalSite::new("ISDH-MAGSINGAL"),
        ShiftWindow::new(time!(08:00), time!(20:00)).unwrap(),
        String::new(),
        2,
        1,
        datetime!(2026-03-01 08:00 UTC),
    );
    let bookings = vec![booking(10, 1, 7, BookingStatus::Booked)];

    assert_eq!(active_count(&schedule, &bookings), 0);
}

#[test]
fn test_remaining_never_underflows() {
    // The storage layer prevents over-booking; if rows were imported in
    // an over-booked state, remaining still reports zero.
    let schedule = schedule_with_capacity(1, 1);
    let bookings = vec![
        booking(10, 1, 7, BookingStatus::Booked),
        booking(11, 1, 8, BookingStatus::Booked),
    ];

    assert_eq!(remaining(&schedule, &bookings), 0);
    assert!(is_full(&schedule, &bookings));
}
