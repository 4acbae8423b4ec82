// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;
use time::Date;
use ward_duty_audit::{AuditEvent, StateSnapshot};
use ward_duty_domain::{Booking, BookingStatus, CancellationMarker, DomainError, Schedule};

/// The complete duty roster state: schedules, bookings and the durable
/// same-day cancellation markers.
///
/// The roster is loaded from the persistence layer, transformed by pure
/// `apply` transitions, and written back atomically. Capacity and
/// conflict checks always read the bookings held here; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    /// All duty schedules.
    pub schedules: Vec<Schedule>,
    /// All bookings across all schedules.
    pub bookings: Vec<Booking>,
    /// Unexpired same-day cancellation markers.
    pub markers: Vec<CancellationMarker>,
}

impl Roster {
    /// Creates a new empty roster.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schedules: Vec::new(),
            bookings: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Looks up a schedule by its persisted ID.
    #[must_use]
    pub fn schedule(&self, schedule_id: i64) -> Option<&Schedule> {
        self.schedules
            .iter()
            .find(|s| s.schedule_id == Some(schedule_id))
    }

    /// Looks up a booking by its persisted ID.
    #[must_use]
    pub fn booking(&self, booking_id: i64) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.booking_id == Some(booking_id))
    }

    /// Finds a student's `Booked` booking on a calendar date, if any.
    ///
    /// At most one such booking can exist (one duty per day system-wide);
    /// the first match is returned.
    #[must_use]
    pub fn booked_on_date(&self, student_id: i64, date: Date) -> Option<&Booking> {
        self.bookings.iter().find(|b| {
            b.student_id == student_id
                && b.status == BookingStatus::Booked
                && self
                    .schedule_date(b.schedule_id)
                    .is_some_and(|d| d == date)
        })
    }

    /// Returns the calendar date of a schedule, if it exists.
    #[must_use]
    pub fn schedule_date(&self, schedule_id: i64) -> Option<Date> {
        self.schedule(schedule_id).map(|s| s.date)
    }

    /// Converts the roster to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "schedules_count={},bookings_count={},markers_count={}",
            self.schedules.len(),
            self.bookings.len(),
            self.markers.len()
        ))
    }
}

/// Notification severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Informational message.
    #[default]
    Info,
    /// Positive outcome (e.g., approval).
    Success,
    /// Something the recipient should act on or be aware of.
    Warning,
    /// A failure or destructive outcome.
    Error,
}

impl Severity {
    /// Returns the string representation of the severity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(DomainError::InvalidSeverity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The recipient of a notification.
///
/// There is no user store in the core; admin recipients are addressed
/// as a group and resolved by the delivery side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationRecipient {
    /// A single student, by ID.
    Student(i64),
    /// Every admin.
    AllAdmins,
}

/// A notification produced by a state transition.
///
/// Delivery is fire-and-forget: a failed delivery must never roll back
/// the transition that produced the notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Who should receive this notification.
    pub recipient: NotificationRecipient,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Severity level.
    pub severity: Severity,
}

impl Notification {
    /// Creates a new `Notification`.
    #[must_use]
    pub const fn new(
        recipient: NotificationRecipient,
        title: String,
        message: String,
        severity: Severity,
    ) -> Self {
        Self {
            recipient,
            title,
            message,
            severity,
        }
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail
/// without side effects. Exactly one audit event records the change;
/// notifications are delivered best-effort by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new roster after the transition.
    pub new_roster: Roster,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Notifications to dispatch for this transition.
    pub notifications: Vec<Notification>,
}
