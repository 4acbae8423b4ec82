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
    clippy::all
)]

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// an admin, a student, or a system process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "student", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
///
/// An action describes what state change occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`BookDuty`", "`ApproveSchedule`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of roster state at a point in time.
///
/// Snapshots capture the observable counts around a transition so the
/// duty log can show what a change did without replaying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable duty log event representing a state transition.
///
/// Every successful state change must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
/// - Which schedule, booking, and student were affected (scope)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The storage-assigned event identifier. `None` until persisted.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The schedule this event concerns, if any.
    pub schedule_id: Option<i64>,
    /// The booking this event concerns, if any.
    pub booking_id: Option<i64>,
    /// The student affected by this event, when different from the actor.
    pub target_student_id: Option<i64>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable. The `event_id` is
    /// assigned by the persistence layer.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `schedule_id` - The schedule in scope, if any
    /// * `booking_id` - The booking in scope, if any
    /// * `target_student_id` - The affected student, if any
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        schedule_id: Option<i64>,
        booking_id: Option<i64>,
        target_student_id: Option<i64>,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            schedule_id,
            booking_id,
            target_student_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("admin-1"), String::from("admin"));

        assert_eq!(actor.id, "admin-1");
        assert_eq!(actor.actor_type, "admin");
    }

    #[test]
    fn test_cause_creation_requires_all_fields() {
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Student request"));

        assert_eq!(cause.id, "req-456");
        assert_eq!(cause.description, "Student request");
    }

    #[test]
    fn test_action_creation_with_and_without_details() {
        let bare: Action = Action::new(String::from("BookDuty"), None);
        let detailed: Action = Action::new(
            String::from("BookDuty"),
            Some(String::from("Student booked duty for 2026-03-10")),
        );

        assert_eq!(bare.name, "BookDuty");
        assert_eq!(bare.details, None);
        assert_eq!(
            detailed.details,
            Some(String::from("Student booked duty for 2026-03-10"))
        );
    }

    #[test]
    fn test_audit_event_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("student-7"), String::from("student"));
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Student request"));
        let action: Action = Action::new(String::from("BookDuty"), None);
        let before: StateSnapshot = StateSnapshot::new(String::from("active_count=0"));
        let after: StateSnapshot = StateSnapshot::new(String::from("active_count=1"));

        let event: AuditEvent = AuditEvent::new(
            actor.clone(),
            cause.clone(),
            action.clone(),
            before.clone(),
            after.clone(),
            Some(1),
            Some(10),
            Some(7),
        );

        assert_eq!(event.event_id, None);
        assert_eq!(event.actor, actor);
        assert_eq!(event.cause, cause);
        assert_eq!(event.action, action);
        assert_eq!(event.before, before);
        assert_eq!(event.after, after);
        assert_eq!(event.schedule_id, Some(1));
        assert_eq!(event.booking_id, Some(10));
        assert_eq!(event.target_student_id, Some(7));
    }

    #[test]
    fn test_audit_event_scope_fields_are_optional() {
        let event: AuditEvent = AuditEvent::new(
            Actor::new(String::from("admin-1"), String::from("admin")),
            Cause::new(String::from("req-1"), String::from("Bulk creation")),
            Action::new(String::from("BulkCreateSchedules"), None),
            StateSnapshot::new(String::from("schedules_count=0")),
            StateSnapshot::new(String::from("schedules_count=10")),
            None,
            None,
            None,
        );

        assert_eq!(event.schedule_id, None);
        assert_eq!(event.booking_id, None);
        assert_eq!(event.target_student_id, None);
    }

    #[test]
    fn test_audit_event_is_immutable_once_created() {
        let event: AuditEvent = AuditEvent::new(
            Actor::new(String::from("student-7"), String::from("student")),
            Cause::new(String::from("req-456"), String::from("Student request")),
            Action::new(String::from("CancelBooking"), None),
            StateSnapshot::new(String::from("active_count=1")),
            StateSnapshot::new(String::from("active_count=0")),
            Some(1),
            Some(10),
            None,
        );

        let cloned_event: AuditEvent = event.clone();
        assert_eq!(event, cloned_event);
    }
}
