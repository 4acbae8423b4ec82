// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Clock abstraction for same-day rule evaluation.
//!
//! The same-day cancellation and rebooking rules compare duty dates
//! against "today" as experienced at the facility, not in UTC. The
//! facility timezone is declared once at startup; every policy
//! decision resolves "today" through the [`Clock`] trait so tests can
//! pin the calendar day.

use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime};
use ward_duty_domain::DomainError;

/// Provides the current instant and the facility-local calendar day.
pub trait Clock: Send + Sync {
    /// Returns the current instant (UTC).
    fn now_utc(&self) -> OffsetDateTime;

    /// Returns the current calendar day in the facility timezone.
    fn today(&self) -> Date;
}

/// Production clock resolving "today" in a declared facility timezone.
#[derive(Debug, Clone, Copy)]
pub struct FacilityClock {
    timezone: Tz,
}

impl FacilityClock {
    /// Creates a new `FacilityClock` for the named IANA timezone.
    ///
    /// # Arguments
    ///
    /// * `timezone` - An IANA timezone name (e.g., "Asia/Manila")
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not a known
    /// IANA timezone.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { timezone: tz })
    }

    /// Returns the declared timezone name.
    #[must_use]
    pub fn timezone_name(&self) -> &'static str {
        self.timezone.name()
    }
}

impl Clock for FacilityClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn today(&self) -> Date {
        let local = Utc::now().with_timezone(&self.timezone).date_naive();
        // The conversion only fails for dates outside time's supported
        // range, which the wall clock cannot produce; fall back to the
        // UTC calendar day rather than panic.
        convert_date(local).unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }
}

/// Converts a chrono calendar date into a `time` calendar date.
fn convert_date(date: chrono::NaiveDate) -> Option<Date> {
    let month = Month::try_from(u8::try_from(date.month()).ok()?).ok()?;
    Date::from_calendar_date(date.year(), month, u8::try_from(date.day()).ok()?).ok()
}

/// A clock pinned to a fixed instant and calendar day.
///
/// Used by tests to exercise the same-day rules deterministically.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: OffsetDateTime,
    today: Date,
}

impl FixedClock {
    /// Creates a `FixedClock` reporting the given instant and day.
    #[must_use]
    pub const fn new(now: OffsetDateTime, today: Date) -> Self {
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.now
    }

    fn today(&self) -> Date {
        self.today
    }
}
