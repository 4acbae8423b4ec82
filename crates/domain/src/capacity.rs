// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat capacity evaluation for duty schedules.
//!
//! These functions are pure and must be recomputed from the current
//! booking set on every query. Capacity is never cached: a stale
//! counter could drift from the authoritative booking rows.

use crate::types::{Booking, Schedule};

/// Counts the bookings currently occupying a seat of `schedule`.
///
/// Both `Booked` and `Completed` bookings count toward capacity;
/// a completed duty still holds its seat.
///
/// # Arguments
///
/// * `schedule` - The schedule to count seats for
/// * `bookings` - The booking set to evaluate (typically the full roster)
#[must_use]
pub fn active_count(schedule: &Schedule, bookings: &[Booking]) -> u32 {
    let count = bookings
        .iter()
        .filter(|b| Some(b.schedule_id) == schedule.schedule_id && b.occupies_seat())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Returns whether `schedule` has no seats left.
#[must_use]
pub fn is_full(schedule: &Schedule, bookings: &[Booking]) -> bool {
    active_count(schedule, bookings) >= schedule.max_students
}

/// Returns the number of seats still available on `schedule`.
///
/// Never underflows: an over-booked schedule (which the storage layer
/// prevents) would report zero remaining seats.
#[must_use]
pub fn remaining(schedule: &Schedule, bookings: &[Booking]) -> u32 {
    schedule
        .max_students
        .saturating_sub(active_count(schedule, bookings))
}
