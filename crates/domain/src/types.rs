// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::schedule_status::ScheduleStatus;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};

/// Represents a hospital site identifier.
///
/// Site codes are normalized to uppercase so that calendar lookups
/// are case-insensitive. An optional display name may be attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalSite {
    /// The site code (e.g., "ISDH-MAGSINGAL"). Normalized to uppercase.
    site_code: String,
    /// Optional human-readable site name.
    site_name: Option<String>,
}

// Two sites are equal if they have the same code, regardless of display name.
impl PartialEq for HospitalSite {
    fn eq(&self, other: &Self) -> bool {
        self.site_code == other.site_code
    }
}

impl Eq for HospitalSite {}

impl std::hash::Hash for HospitalSite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.site_code.hash(state);
    }
}

impl HospitalSite {
    /// Creates a new `HospitalSite`.
    ///
    /// Site codes are normalized to uppercase to ensure case-insensitive
    /// uniqueness.
    ///
    /// # Arguments
    ///
    /// * `site_code` - The site code (will be normalized to uppercase)
    #[must_use]
    pub fn new(site_code: &str) -> Self {
        Self {
            site_code: site_code.to_uppercase(),
            site_name: None,
        }
    }

    /// Creates a `HospitalSite` with a display name attached.
    #[must_use]
    pub fn with_name(site_code: &str, site_name: &str) -> Self {
        Self {
            site_code: site_code.to_uppercase(),
            site_name: Some(site_name.to_string()),
        }
    }

    /// Returns the site code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.site_code
    }

    /// Returns the site name if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.site_name.as_deref()
    }
}

impl std::fmt::Display for HospitalSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.site_code)
    }
}

/// A duty shift window within a single calendar day.
///
/// The end time must come strictly after the start time; overnight
/// shifts are not representable and are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    start: Time,
    end: Time,
}

impl ShiftWindow {
    /// Creates a new `ShiftWindow`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidShiftWindow` if `end` is not strictly
    /// after `start`.
    pub fn new(start: Time, end: Time) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidShiftWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the shift start time.
    #[must_use]
    pub const fn start(&self) -> Time {
        self.start
    }

    /// Returns the shift end time.
    #[must_use]
    pub const fn end(&self) -> Time {
        self.end
    }
}

/// A duty schedule: one bookable slot at a hospital site on a calendar day.
///
/// `schedule_id` is the canonical identifier assigned by the database.
/// `None` indicates the schedule has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// The canonical numeric identifier assigned by the database.
    pub schedule_id: Option<i64>,
    /// The calendar day of the duty (no time component).
    pub date: Date,
    /// The hospital site hosting the duty.
    pub location: HospitalSite,
    /// The duty shift window.
    pub shift: ShiftWindow,
    /// Free-form description shown to students.
    pub description: String,
    /// The seat capacity. Always at least 1.
    pub max_students: u32,
    /// The approval status of this schedule.
    pub status: ScheduleStatus,
    /// The admin who created this schedule.
    pub created_by: i64,
    /// Creation timestamp (UTC).
    pub created_at: OffsetDateTime,
    /// The admin who approved this schedule. Set only on approval.
    pub approved_by: Option<i64>,
    /// Approval timestamp (UTC). Set only on approval.
    pub approved_at: Option<OffsetDateTime>,
}

impl Schedule {
    /// Creates a new `Schedule` in `Pending` status without a persisted ID.
    ///
    /// The `schedule_id` will be assigned by the persistence layer upon
    /// first save.
    #[must_use]
    pub const fn new(
        date: Date,
        location: HospitalSite,
        shift: ShiftWindow,
        description: String,
        max_students: u32,
        created_by: i64,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            schedule_id: None,
            date,
            location,
            shift,
            description,
            max_students,
            status: ScheduleStatus::Pending,
            created_by,
            created_at,
            approved_by: None,
            approved_at: None,
        }
    }

    /// Creates a `Schedule` with an existing `schedule_id` (from persistence).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn with_id(
        schedule_id: i64,
        date: Date,
        location: HospitalSite,
        shift: ShiftWindow,
        description: String,
        max_students: u32,
        status: ScheduleStatus,
        created_by: i64,
        created_at: OffsetDateTime,
        approved_by: Option<i64>,
        approved_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            schedule_id: Some(schedule_id),
            date,
            location,
            shift,
            description,
            max_students,
            status,
            created_by,
            created_at,
            approved_by,
            approved_at,
        }
    }
}

/// A booking: one student's claim on a seat of a schedule.
///
/// A booking has its own status, independent of the owning schedule's
/// approval status. A booking occupies a seat for as long as its status
/// is not `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// The canonical numeric identifier assigned by the database.
    pub booking_id: Option<i64>,
    /// The owning schedule.
    pub schedule_id: i64,
    /// The student holding this booking.
    pub student_id: i64,
    /// When the booking was made (UTC).
    pub booking_time: OffsetDateTime,
    /// The booking status.
    pub status: BookingStatus,
    /// Cancellation timestamp (UTC). Set only on cancellation.
    pub cancelled_at: Option<OffsetDateTime>,
    /// Why the booking was cancelled. Set only on cancellation.
    pub cancellation_reason: Option<String>,
    /// Completion timestamp (UTC). Set only on completion.
    pub completed_at: Option<OffsetDateTime>,
}

impl Booking {
    /// Creates a new `Booked` booking without a persisted ID.
    #[must_use]
    pub const fn new(schedule_id: i64, student_id: i64, booking_time: OffsetDateTime) -> Self {
        Self {
            booking_id: None,
            schedule_id,
            student_id,
            booking_time,
            status: BookingStatus::Booked,
            cancelled_at: None,
            cancellation_reason: None,
            completed_at: None,
        }
    }

    /// Creates a `Booking` with an existing `booking_id` (from persistence).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn with_id(
        booking_id: i64,
        schedule_id: i64,
        student_id: i64,
        booking_time: OffsetDateTime,
        status: BookingStatus,
        cancelled_at: Option<OffsetDateTime>,
        cancellation_reason: Option<String>,
        completed_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            booking_id: Some(booking_id),
            schedule_id,
            student_id,
            booking_time,
            status,
            cancelled_at,
            cancellation_reason,
            completed_at,
        }
    }

    /// Returns whether this booking currently occupies a seat.
    ///
    /// Both `Booked` and `Completed` bookings hold their seat; only
    /// `Cancelled` bookings release it.
    #[must_use]
    pub const fn occupies_seat(&self) -> bool {
        self.status.occupies_seat()
    }
}
