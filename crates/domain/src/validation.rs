// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field and uniqueness validation for duty schedules.

use crate::error::DomainError;
use crate::types::{HospitalSite, Schedule};
use time::Date;

/// Validates the field constraints of a schedule.
///
/// # Errors
///
/// Returns an error if:
/// - `max_students` is zero
/// - the site code is empty
pub fn validate_schedule_fields(schedule: &Schedule) -> Result<(), DomainError> {
    if schedule.max_students == 0 {
        return Err(DomainError::InvalidCapacity {
            max_students: schedule.max_students,
        });
    }
    if schedule.location.code().trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Site code cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a schedule date is not in the past.
///
/// Schedules may be created for today or any future day; duty slots in
/// the past cannot be booked and must not be created.
///
/// # Errors
///
/// Returns `DomainError::PastDateSchedule` if `date` is before `today`.
pub fn validate_schedule_date(date: Date, today: Date) -> Result<(), DomainError> {
    if date < today {
        return Err(DomainError::PastDateSchedule { date, today });
    }
    Ok(())
}

/// Validates that no schedule already exists for a `(date, site)` pair.
///
/// The calendar assumes at most one schedule per site per day; duplicates
/// would render ambiguously.
///
/// # Errors
///
/// Returns `DomainError::DuplicateSiteDate` if a schedule for the pair
/// already exists.
pub fn validate_site_date_unique(
    date: Date,
    location: &HospitalSite,
    schedules: &[Schedule],
) -> Result<(), DomainError> {
    if schedules
        .iter()
        .any(|s| s.date == date && s.location == *location)
    {
        return Err(DomainError::DuplicateSiteDate {
            date,
            location: location.code().to_string(),
        });
    }
    Ok(())
}
