// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role capabilities.
//!
//! Each operation names the capability it needs; the mapping from role
//! to capability set lives here and nowhere else. Parents hold only
//! read capabilities.

use crate::error::AuthError;
use crate::{AuthenticatedActor, Role};

/// The discrete permissions an actor can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create a single schedule.
    CreateSchedule,
    /// Generate schedules over a date range.
    BulkCreateSchedules,
    /// Approve a pending schedule.
    ApproveSchedule,
    /// Reject a pending schedule.
    RejectSchedule,
    /// Hard-delete a schedule.
    DeleteSchedule,
    /// Book a duty seat.
    BookDuty,
    /// Cancel one's own booking.
    CancelOwnBooking,
    /// Cancel any student's booking.
    CancelAnyBooking,
    /// Mark one's own duty as completed.
    CompleteBooking,
    /// Hard-delete one's own booked entry under a pending schedule.
    DeleteOwnPendingBooking,
    /// Read the roster calendar.
    ViewRoster,
    /// Read the duty log.
    ViewDutyLog,
    /// Read notifications.
    ViewNotifications,
}

impl Capability {
    /// Returns a human-readable action name for error messages.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::CreateSchedule => "create schedule",
            Self::BulkCreateSchedules => "bulk create schedules",
            Self::ApproveSchedule => "approve schedule",
            Self::RejectSchedule => "reject schedule",
            Self::DeleteSchedule => "delete schedule",
            Self::BookDuty => "book duty",
            Self::CancelOwnBooking => "cancel booking",
            Self::CancelAnyBooking => "cancel any booking",
            Self::CompleteBooking => "complete duty",
            Self::DeleteOwnPendingBooking => "delete pending booking",
            Self::ViewRoster => "view roster",
            Self::ViewDutyLog => "view duty log",
            Self::ViewNotifications => "view notifications",
        }
    }

    /// Returns the role that grants this capability, for error messages.
    #[must_use]
    pub const fn required_role(&self) -> &'static str {
        match self {
            Self::CreateSchedule
            | Self::BulkCreateSchedules
            | Self::ApproveSchedule
            | Self::RejectSchedule
            | Self::DeleteSchedule
            | Self::CancelAnyBooking
            | Self::ViewDutyLog => "admin",
            Self::BookDuty
            | Self::CancelOwnBooking
            | Self::CompleteBooking
            | Self::DeleteOwnPendingBooking => "student",
            Self::ViewRoster | Self::ViewNotifications => "any",
        }
    }
}

/// Returns whether `role` holds `capability`.
#[must_use]
pub const fn role_has(role: Role, capability: Capability) -> bool {
    match role {
        Role::Admin => matches!(
            capability,
            Capability::CreateSchedule
                | Capability::BulkCreateSchedules
                | Capability::ApproveSchedule
                | Capability::RejectSchedule
                | Capability::DeleteSchedule
                | Capability::CancelAnyBooking
                | Capability::ViewRoster
                | Capability::ViewDutyLog
                | Capability::ViewNotifications
        ),
        Role::Student => matches!(
            capability,
            Capability::BookDuty
                | Capability::CancelOwnBooking
                | Capability::CompleteBooking
                | Capability::DeleteOwnPendingBooking
                | Capability::ViewRoster
                | Capability::ViewNotifications
        ),
        Role::Parent => matches!(
            capability,
            Capability::ViewRoster | Capability::ViewNotifications
        ),
    }
}

/// Requires `actor` to hold `capability`.
///
/// # Errors
///
/// Returns `AuthError::Unauthorized` naming the attempted action and
/// the role it requires.
pub fn require(actor: &AuthenticatedActor, capability: Capability) -> Result<(), AuthError> {
    if role_has(actor.role, capability) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized {
            action: capability.action_name().to_string(),
            required_role: capability.required_role().to_string(),
        })
    }
}
