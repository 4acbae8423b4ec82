// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::schedule_status::ScheduleStatus;
use time::{Date, Time};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced schedule does not exist.
    ScheduleNotFound(i64),
    /// Referenced booking does not exist.
    BookingNotFound(i64),
    /// The schedule has no seats left.
    CapacityExceeded {
        /// Seats currently occupied.
        current: u32,
        /// The schedule's seat capacity.
        max: u32,
    },
    /// The student already holds an active booking on this schedule.
    DuplicateBooking {
        /// The schedule.
        schedule_id: i64,
        /// The student.
        student_id: i64,
    },
    /// The student already holds an active booking on this calendar date
    /// under a different schedule.
    ConflictingDateBooking {
        /// The duty date.
        date: Date,
        /// The student.
        student_id: i64,
    },
    /// The student cancelled a booking for this duty date earlier today.
    SameDayRebookBlocked {
        /// The duty date.
        date: Date,
        /// The student.
        student_id: i64,
    },
    /// Cancellation attempted on the duty's own calendar day.
    SameDayCancelForbidden {
        /// The duty date (equal to today).
        date: Date,
    },
    /// A student attempted to act on a booking they do not own.
    NotBookingOwner {
        /// The booking.
        booking_id: i64,
        /// The acting student.
        student_id: i64,
    },
    /// Invalid schedule status transition.
    InvalidScheduleTransition {
        /// The current status.
        from: ScheduleStatus,
        /// The requested status.
        to: ScheduleStatus,
    },
    /// Invalid booking status transition.
    InvalidBookingTransition {
        /// The current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },
    /// A booking completion requires the owning schedule to be approved.
    CompletionRequiresApprovedSchedule {
        /// The booking.
        booking_id: i64,
        /// The owning schedule's status.
        schedule_status: ScheduleStatus,
    },
    /// Hard deletion is only allowed for a booked booking on a pending schedule.
    DeleteRequiresPendingBooking {
        /// The booking.
        booking_id: i64,
        /// The booking's status.
        booking_status: BookingStatus,
        /// The owning schedule's status.
        schedule_status: ScheduleStatus,
    },
    /// A schedule already exists for this `(date, site)` pair.
    DuplicateSiteDate {
        /// The duty date.
        date: Date,
        /// The site code.
        location: String,
    },
    /// Schedule date lies in the past.
    PastDateSchedule {
        /// The requested date.
        date: Date,
        /// The current calendar day.
        today: Date,
    },
    /// Shift end does not come after shift start.
    InvalidShiftWindow {
        /// The shift start.
        start: Time,
        /// The shift end.
        end: Time,
    },
    /// Seat capacity must be positive.
    InvalidCapacity {
        /// The invalid capacity value.
        max_students: u32,
    },
    /// Site code is empty or invalid.
    InvalidLocation(String),
    /// Schedule status string is not recognized.
    InvalidScheduleStatus(String),
    /// Booking status string is not recognized.
    InvalidBookingStatus(String),
    /// Notification severity string is not recognized.
    InvalidSeverity(String),
    /// Facility timezone name is not recognized.
    InvalidTimezone(String),
    /// The site rotation list is empty.
    EmptyRotation,
    /// Date range end is before its start.
    EmptyDateRange {
        /// The range start.
        start: Date,
        /// The range end.
        end: Date,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow,
    /// Failed to parse a date or time from a string.
    DateParseError {
        /// The invalid string.
        value: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScheduleNotFound(id) => write!(f, "Schedule {id} not found"),
            Self::BookingNotFound(id) => write!(f, "Booking {id} not found"),
            Self::CapacityExceeded { current, max } => {
                write!(f, "This duty is already full ({current}/{max} students assigned)")
            }
            Self::DuplicateBooking {
                schedule_id,
                student_id,
            } => {
                write!(
                    f,
                    "Student {student_id} has already booked schedule {schedule_id}"
                )
            }
            Self::ConflictingDateBooking { date, student_id } => {
                write!(
                    f,
                    "Student {student_id} already has a duty scheduled on {date} at another site"
                )
            }
            Self::SameDayRebookBlocked { date, student_id } => {
                write!(
                    f,
                    "Student {student_id} cancelled a booking for {date} today and cannot rebook that date until tomorrow"
                )
            }
            Self::SameDayCancelForbidden { date } => {
                write!(f, "Cannot cancel a duty on its own day ({date})")
            }
            Self::NotBookingOwner {
                booking_id,
                student_id,
            } => {
                write!(
                    f,
                    "Booking {booking_id} does not belong to student {student_id}"
                )
            }
            Self::InvalidScheduleTransition { from, to } => {
                write!(f, "Cannot transition schedule from {from} to {to}")
            }
            Self::InvalidBookingTransition { from, to } => {
                write!(f, "Cannot transition booking from {from} to {to}")
            }
            Self::CompletionRequiresApprovedSchedule {
                booking_id,
                schedule_status,
            } => {
                write!(
                    f,
                    "Booking {booking_id} cannot be completed while its schedule is {schedule_status}"
                )
            }
            Self::DeleteRequiresPendingBooking {
                booking_id,
                booking_status,
                schedule_status,
            } => {
                write!(
                    f,
                    "Booking {booking_id} cannot be deleted: booking is {booking_status}, schedule is {schedule_status}"
                )
            }
            Self::DuplicateSiteDate { date, location } => {
                write!(f, "A schedule already exists at '{location}' on {date}")
            }
            Self::PastDateSchedule { date, today } => {
                write!(f, "Cannot create a schedule for {date}: already past (today is {today})")
            }
            Self::InvalidShiftWindow { start, end } => {
                write!(f, "Shift end {end} must come after shift start {start}")
            }
            Self::InvalidCapacity { max_students } => {
                write!(f, "Invalid capacity: {max_students}. Must be at least 1")
            }
            Self::InvalidLocation(msg) => write!(f, "Invalid site: {msg}"),
            Self::InvalidScheduleStatus(s) => {
                write!(f, "Invalid schedule status: '{s}'")
            }
            Self::InvalidBookingStatus(s) => write!(f, "Invalid booking status: '{s}'"),
            Self::InvalidSeverity(s) => write!(f, "Invalid notification severity: '{s}'"),
            Self::InvalidTimezone(s) => write!(f, "Invalid facility timezone: '{s}'"),
            Self::EmptyRotation => write!(f, "Site rotation list is empty"),
            Self::EmptyDateRange { start, end } => {
                write!(f, "Date range end {end} is before start {start}")
            }
            Self::DateArithmeticOverflow => write!(f, "Date arithmetic overflow"),
            Self::DateParseError { value, error } => {
                write!(f, "Failed to parse date '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
