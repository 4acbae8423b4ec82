// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Hospital site rotation and bulk date generation.
//!
//! Duty sites rotate monthly: every schedule generated for a given
//! month is placed at the site whose index matches the month in the
//! rotation list, wrapping around the list as the year advances.
//! Bulk creation walks a date range and keeps only the requested
//! weekdays (weekdays default to Monday through Friday).

use crate::error::DomainError;
use crate::types::HospitalSite;
use time::{Date, Weekday};

/// The default duty days for bulk generation: Monday through Friday.
pub const DEFAULT_DUTY_WEEKDAYS: [Weekday; 5] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
];

/// One entry of the monthly site rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSite {
    /// The hospital site.
    pub site: HospitalSite,
    /// Default seat capacity for schedules generated at this site.
    pub default_capacity: u32,
}

impl RotationSite {
    /// Creates a new `RotationSite`.
    #[must_use]
    pub const fn new(site: HospitalSite, default_capacity: u32) -> Self {
        Self {
            site,
            default_capacity,
        }
    }
}

/// Selects the rotation site assigned to the month of `date`.
///
/// Months index into the rotation list modulo its length, so a
/// three-site rotation repeats every quarter.
///
/// # Errors
///
/// Returns `DomainError::EmptyRotation` if the rotation list is empty.
pub fn site_for_month(rotation: &[RotationSite], date: Date) -> Result<&RotationSite, DomainError> {
    if rotation.is_empty() {
        return Err(DomainError::EmptyRotation);
    }
    let month_index = date.month() as usize - 1;
    Ok(&rotation[month_index % rotation.len()])
}

/// Generates the duty dates in `[start, end]` falling on one of `weekdays`.
///
/// # Arguments
///
/// * `start` - First calendar day of the range (inclusive)
/// * `end` - Last calendar day of the range (inclusive)
/// * `weekdays` - The weekdays to keep
///
/// # Errors
///
/// Returns `DomainError::EmptyDateRange` if `end` is before `start`.
pub fn duty_dates_in_range(
    start: Date,
    end: Date,
    weekdays: &[Weekday],
) -> Result<Vec<Date>, DomainError> {
    if end < start {
        return Err(DomainError::EmptyDateRange { start, end });
    }

    let mut dates: Vec<Date> = Vec::new();
    let mut current = start;
    loop {
        if weekdays.contains(&current.weekday()) {
            dates.push(current);
        }
        if current >= end {
            break;
        }
        current = current
            .next_day()
            .ok_or(DomainError::DateArithmeticOverflow)?;
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use time::macros::date;

    fn three_site_rotation() -> Vec<RotationSite> {
        vec![
            RotationSite::new(HospitalSite::new("ISDH-MAGSINGAL"), 4),
            RotationSite::new(HospitalSite::new("ISDH-CABUGAO"), 2),
            RotationSite::new(HospitalSite::new("ISDH-SINAIT"), 3),
        ]
    }

    #[test]
    fn test_site_rotates_by_month_index() {
        let rotation = three_site_rotation();

        let january = site_for_month(&rotation, date!(2026 - 01 - 15)).unwrap();
        let february = site_for_month(&rotation, date!(2026 - 02 - 15)).unwrap();
        let april = site_for_month(&rotation, date!(2026 - 04 - 15)).unwrap();

        assert_eq!(january.site.code(), "ISDH-MAGSINGAL");
        assert_eq!(february.site.code(), "ISDH-CABUGAO");
        // Rotation wraps: April lands back on the first site.
        assert_eq!(april.site.code(), "ISDH-MAGSINGAL");
    }

    #[test]
    fn test_empty_rotation_is_rejected() {
        let result = site_for_month(&[], date!(2026 - 01 - 15));

        assert!(matches!(result, Err(DomainError::EmptyRotation)));
    }

    #[test]
    fn test_weekday_filter_skips_weekends() {
        // 2026-03-02 is a Monday; the range covers two full weeks.
        let dates = duty_dates_in_range(
            date!(2026 - 03 - 02),
            date!(2026 - 03 - 15),
            &DEFAULT_DUTY_WEEKDAYS,
        )
        .unwrap();

        assert_eq!(dates.len(), 10);
        assert!(dates.iter().all(|d| {
            d.weekday() != Weekday::Saturday && d.weekday() != Weekday::Sunday
        }));
    }

    #[test]
    fn test_single_day_range() {
        let dates = duty_dates_in_range(
            date!(2026 - 03 - 02),
            date!(2026 - 03 - 02),
            &DEFAULT_DUTY_WEEKDAYS,
        )
        .unwrap();

        assert_eq!(dates, vec![date!(2026 - 03 - 02)]);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = duty_dates_in_range(
            date!(2026 - 03 - 15),
            date!(2026 - 03 - 02),
            &DEFAULT_DUTY_WEEKDAYS,
        );

        assert!(matches!(result, Err(DomainError::EmptyDateRange { .. })));
    }
}
