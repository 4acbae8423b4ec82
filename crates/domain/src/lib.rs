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

mod booking_status;
mod capacity;
mod error;
mod marker;
mod rotation;
mod schedule_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking_status::BookingStatus;
pub use capacity::{active_count, is_full, remaining};
pub use error::DomainError;
pub use marker::CancellationMarker;
pub use rotation::{DEFAULT_DUTY_WEEKDAYS, RotationSite, duty_dates_in_range, site_for_month};
pub use schedule_status::ScheduleStatus;
pub use types::{Booking, HospitalSite, Schedule, ShiftWindow};
pub use validation::{
    validate_schedule_date, validate_schedule_fields, validate_site_date_unique,
};
