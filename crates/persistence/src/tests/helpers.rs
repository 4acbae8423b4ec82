// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistTransitionResult, Persistence, PersistenceError};
use time::macros::{date, datetime, time};
use time::{Date, OffsetDateTime};
use ward_duty::{CancelActor, Clock, Command, FixedClock, Roster, TransitionResult, apply};
use ward_duty_audit::{Actor, Cause};
use ward_duty_domain::{HospitalSite, ShiftWindow};

/// The calendar day all persistence fixtures treat as "today".
pub const TODAY: Date = date!(2026 - 03 - 05);

/// The instant all persistence fixtures treat as "now".
pub const NOW: OffsetDateTime = datetime!(2026-03-05 08:00 UTC);

pub fn test_clock() -> FixedClock {
    FixedClock::new(NOW, TODAY)
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

pub fn setup() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Applies a command against the current stored roster and persists it.
///
/// This is the same load → apply → persist flow the server runs.
pub fn run_command(
    persistence: &mut Persistence,
    command: Command,
    actor: Actor,
) -> Result<PersistTransitionResult, PersistenceError> {
    run_command_at(persistence, command, actor, &test_clock())
}

/// Like `run_command`, with the clock pinned by the caller.
pub fn run_command_at(
    persistence: &mut Persistence,
    command: Command,
    actor: Actor,
    clock: &FixedClock,
) -> Result<PersistTransitionResult, PersistenceError> {
    let roster: Roster = persistence.load_roster(clock.today())?;
    let result: TransitionResult = apply(&roster, command.clone(), actor, test_cause(), clock)
        .map_err(|e| PersistenceError::Other(e.to_string()))?;
    persistence.persist_transition(&command, &result, clock.now_utc())
}

/// Creates a pending two-seat schedule on 2026-03-10 and returns its ID.
pub fn create_schedule(persistence: &mut Persistence) -> i64 {
    create_schedule_on(persistence, date!(2026 - 03 - 10), "ISDH-MAGSINGAL", 2)
}

pub fn create_schedule_on(
    persistence: &mut Persistence,
    date: Date,
    site: &str,
    max_students: u32,
) -> i64 {
    let result = run_command(
        persistence,
        Command::CreateSchedule {
            date,
            location: HospitalSite::new(site),
            shift: ShiftWindow::new(time!(08:00), time!(20:00)).unwrap(),
            description: String::from("Community Health Center Duty"),
            max_students,
            admin_id: 1,
        },
        admin_actor(),
    )
    .expect("Failed to create schedule");
    result.schedule_ids[0]
}

/// Books a duty through the full load → apply → persist flow.
pub fn book(
    persistence: &mut Persistence,
    schedule_id: i64,
    student_id: i64,
) -> Result<PersistTransitionResult, PersistenceError> {
    run_command(
        persistence,
        Command::BookDuty {
            schedule_id,
            student_id,
        },
        student_actor(student_id),
    )
}

/// Cancels a booking as its owning student.
pub fn cancel(
    persistence: &mut Persistence,
    booking_id: i64,
    student_id: i64,
) -> Result<PersistTransitionResult, PersistenceError> {
    run_command(
        persistence,
        Command::CancelBooking {
            booking_id,
            actor: CancelActor::Student(student_id),
        },
        student_actor(student_id),
    )
}
