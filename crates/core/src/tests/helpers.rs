// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{FixedClock, Roster};
use time::macros::{date, datetime, time};
use time::{Date, OffsetDateTime};
use ward_duty_audit::{Actor, Cause};
use ward_duty_domain::{
    Booking, BookingStatus, HospitalSite, Schedule, ScheduleStatus, ShiftWindow,
};

/// The calendar day all helper fixtures treat as "today".
pub const TODAY: Date = date!(2026 - 03 - 05);

/// The instant all helper fixtures treat as "now".
pub const NOW: OffsetDateTime = datetime!(2026-03-05 08:00 UTC);

pub fn test_clock() -> FixedClock {
    FixedClock::new(NOW, TODAY)
}

/// A clock advanced to the next calendar day, for marker-expiry tests.
pub fn next_day_clock() -> FixedClock {
    FixedClock::new(datetime!(2026-03-06 08:00 UTC), date!(2026 - 03 - 06))
}

pub fn admin_actor() -> Actor {
    Actor::new(String::from("admin-1"), String::from("admin"))
}

pub fn student_actor(student_id: i64) -> Actor {
    Actor::new(format!("student-{student_id}"), String::from("student"))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn default_shift() -> ShiftWindow {
    ShiftWindow::new(time!(08:00), time!(20:00)).unwrap()
}

/// Builds a persisted pending schedule on the given date.
pub fn schedule(schedule_id: i64, date: Date, max_students: u32) -> Schedule {
    Schedule::with_id(
        schedule_id,
        date,
        HospitalSite::new("ISDH-MAGSINGAL"),
        default_shift(),
        String::from("Community Health Center Duty"),
        max_students,
        ScheduleStatus::Pending,
        1,
        NOW,
        None,
        None,
    )
}

/// Builds a persisted booked booking.
pub fn booking(booking_id: i64, schedule_id: i64, student_id: i64) -> Booking {
    Booking::with_id(
        booking_id,
        schedule_id,
        student_id,
        NOW,
        BookingStatus::Booked,
        None,
        None,
        None,
    )
}

/// A roster holding one pending schedule five days out, with two seats.
pub fn roster_with_schedule() -> Roster {
    let mut roster = Roster::new();
    roster.schedules.push(schedule(1, date!(2026 - 03 - 10), 2));
    roster
}
