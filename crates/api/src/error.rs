// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use ward_duty::CoreError;
use ward_duty_domain::DomainError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A booking or approval rule was violated.
    RuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::RuleViolation { rule, message } => {
                write!(f, "Rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly. Each taxonomy kind keeps a stable `rule` name so
/// clients can react without parsing the message.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::ScheduleNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Schedule"),
            message: format!("Schedule {id} does not exist"),
        },
        DomainError::BookingNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {id} does not exist"),
        },
        DomainError::CapacityExceeded { current, max } => ApiError::RuleViolation {
            rule: String::from("capacity"),
            message: format!("This duty is already full ({current}/{max} students assigned)"),
        },
        DomainError::DuplicateBooking { .. } => ApiError::RuleViolation {
            rule: String::from("duplicate_booking"),
            message: String::from("You have already booked this duty"),
        },
        DomainError::ConflictingDateBooking { date, .. } => ApiError::RuleViolation {
            rule: String::from("one_duty_per_day"),
            message: format!(
                "You already have a duty scheduled on {date} at another site. Students can only have one duty per day"
            ),
        },
        DomainError::SameDayRebookBlocked { date, .. } => ApiError::RuleViolation {
            rule: String::from("same_day_rebook"),
            message: format!(
                "You cancelled a booking for {date} today and cannot book that date again until tomorrow"
            ),
        },
        DomainError::SameDayCancelForbidden { .. } => ApiError::RuleViolation {
            rule: String::from("same_day_cancel"),
            message: String::from(
                "Cannot cancel duties on the same day. Cancellations must be done in advance",
            ),
        },
        DomainError::NotBookingOwner { .. } => ApiError::Unauthorized {
            action: String::from("modify booking"),
            required_role: String::from("owning student or admin"),
        },
        DomainError::InvalidScheduleTransition { from, to } => ApiError::RuleViolation {
            rule: String::from("schedule_lifecycle"),
            message: format!("Cannot transition schedule from {from} to {to}"),
        },
        DomainError::InvalidBookingTransition { from, to } => ApiError::RuleViolation {
            rule: String::from("booking_lifecycle"),
            message: format!("Cannot transition booking from {from} to {to}"),
        },
        DomainError::CompletionRequiresApprovedSchedule {
            schedule_status, ..
        } => ApiError::RuleViolation {
            rule: String::from("completion_requires_approval"),
            message: format!(
                "The duty cannot be completed while its schedule is {schedule_status}"
            ),
        },
        DomainError::DeleteRequiresPendingBooking {
            booking_status,
            schedule_status,
            ..
        } => ApiError::RuleViolation {
            rule: String::from("delete_requires_pending"),
            message: format!(
                "Only a booked entry on a pending schedule can be deleted (booking is {booking_status}, schedule is {schedule_status})"
            ),
        },
        DomainError::DuplicateSiteDate { date, location } => ApiError::RuleViolation {
            rule: String::from("unique_site_date"),
            message: format!("A schedule already exists at '{location}' on {date}"),
        },
        DomainError::PastDateSchedule { date, .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Cannot create schedule for past date {date}"),
        },
        DomainError::InvalidShiftWindow { start, end } => ApiError::InvalidInput {
            field: String::from("shift"),
            message: format!("Shift end {end} must come after shift start {start}"),
        },
        DomainError::InvalidCapacity { max_students } => ApiError::InvalidInput {
            field: String::from("max_students"),
            message: format!("Invalid capacity: {max_students}. Must be at least 1"),
        },
        DomainError::InvalidLocation(msg) => ApiError::InvalidInput {
            field: String::from("location"),
            message: msg,
        },
        DomainError::InvalidScheduleStatus(s) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid schedule status: '{s}'"),
        },
        DomainError::InvalidBookingStatus(s) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid booking status: '{s}'"),
        },
        DomainError::InvalidSeverity(s) => ApiError::InvalidInput {
            field: String::from("severity"),
            message: format!("Invalid notification severity: '{s}'"),
        },
        DomainError::InvalidTimezone(s) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: format!("Invalid facility timezone: '{s}'"),
        },
        DomainError::EmptyRotation => ApiError::InvalidInput {
            field: String::from("rotation"),
            message: String::from("Site rotation list is empty"),
        },
        DomainError::EmptyDateRange { start, end } => ApiError::InvalidInput {
            field: String::from("date_range"),
            message: format!("Date range end {end} is before start {start}"),
        },
        DomainError::DateArithmeticOverflow => ApiError::Internal {
            message: String::from("Date arithmetic overflow"),
        },
        DomainError::DateParseError { value, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{value}': {error}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}
