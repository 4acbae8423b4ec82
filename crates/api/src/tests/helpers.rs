// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AuthenticatedActor, Role};
use time::macros::{date, datetime, time};
use time::Date;
use ward_duty::{FixedClock, Roster};
use ward_duty_audit::Cause;
use ward_duty_domain::{
    Booking, BookingStatus, HospitalSite, Schedule, ScheduleStatus, ShiftWindow,
};

pub fn test_clock() -> FixedClock {
    FixedClock::new(datetime!(2026-03-05 08:00 UTC), date!(2026 - 03 - 05))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(1, Role::Admin)
}

pub fn student(id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(id, Role::Student)
}

pub fn parent() -> AuthenticatedActor {
    AuthenticatedActor::new(100, Role::Parent)
}

pub fn schedule(schedule_id: i64, date: Date, max_students: u32) -> Schedule {
    Schedule::with_id(
        schedule_id,
        date,
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

pub fn booking(booking_id: i64, schedule_id: i64, student_id: i64) -> Booking {
    Booking::with_id(
        booking_id,
        schedule_id,
        student_id,
        datetime!(2026-03-01 09:00 UTC),
        BookingStatus::Booked,
        None,
        None,
        None,
    )
}

/// A roster with one pending two-seat schedule on 2026-03-10.
pub fn roster_with_schedule() -> Roster {
    let mut roster = Roster::new();
    roster.schedules.push(schedule(1, date!(2026 - 03 - 10), 2));
    roster
}
