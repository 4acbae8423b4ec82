// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking status and transition logic.
//!
//! Booking status is independent of the owning schedule's approval
//! status. `Cancelled` and `Completed` are terminal.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of a student's booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Active claim on a seat.
    #[default]
    Booked,
    /// Released, either by the student or by an admin cascade.
    Cancelled,
    /// Duty performed. The seat remains occupied.
    Completed,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "booked" => Ok(Self::Booked),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }

    /// Returns whether a booking in this status occupies a seat.
    ///
    /// Completed duties retain their seat; only cancellation releases it.
    #[must_use]
    pub const fn occupies_seat(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Returns true if this status is terminal (cannot transition further).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions are:
    /// - `Booked` → `Cancelled`
    /// - `Booked` → `Completed`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBookingTransition` if the transition
    /// is not permitted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        let valid = matches!(
            (self, target),
            (Self::Booked, Self::Cancelled) | (Self::Booked, Self::Completed)
        );
        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidBookingTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
