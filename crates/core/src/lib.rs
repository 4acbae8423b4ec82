// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod clock;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use ward_duty_domain::{Booking, DomainError, Schedule};

// Re-export public types and functions
pub use apply::{REJECTION_CANCEL_REASON, apply};
pub use clock::{Clock, FacilityClock, FixedClock};
pub use command::{CancelActor, Command};
pub use error::CoreError;
pub use state::{
    Notification, NotificationRecipient, Roster, Severity, TransitionResult,
};

/// Validates that a schedule exists in the roster.
///
/// This is a read-only validation that does not create audit events.
///
/// # Arguments
///
/// * `roster` - The roster to check
/// * `schedule_id` - The schedule to validate
///
/// # Errors
///
/// Returns `DomainError::ScheduleNotFound` if the schedule does not exist.
pub fn validate_schedule_exists(roster: &Roster, schedule_id: i64) -> Result<&Schedule, DomainError> {
    roster
        .schedule(schedule_id)
        .ok_or(DomainError::ScheduleNotFound(schedule_id))
}

/// Validates that a booking exists in the roster.
///
/// This is a read-only validation that does not create audit events.
///
/// # Arguments
///
/// * `roster` - The roster to check
/// * `booking_id` - The booking to validate
///
/// # Errors
///
/// Returns `DomainError::BookingNotFound` if the booking does not exist.
pub fn validate_booking_exists(roster: &Roster, booking_id: i64) -> Result<&Booking, DomainError> {
    roster
        .booking(booking_id)
        .ok_or(DomainError::BookingNotFound(booking_id))
}
