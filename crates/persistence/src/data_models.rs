// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row models and domain conversions.
//!
//! Dates, times and instants are stored as ISO 8601 text columns;
//! the helpers here are the single place where the wire formats are
//! defined. Corrupt rows surface as `SerializationError`, never panic.

use crate::error::PersistenceError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use ward_duty_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ward_duty_domain::{
    Booking, BookingStatus, CancellationMarker, HospitalSite, Schedule, ScheduleStatus,
    ShiftWindow,
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

/// Formats a calendar date as `YYYY-MM-DD`.
pub(crate) fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(&DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a calendar date from `YYYY-MM-DD`.
pub(crate) fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, &DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("invalid date '{value}': {e}")))
}

/// Formats a time of day as `HH:MM`.
pub(crate) fn format_time_of_day(time: Time) -> Result<String, PersistenceError> {
    time.format(&TIME_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a time of day from `HH:MM`.
pub(crate) fn parse_time_of_day(value: &str) -> Result<Time, PersistenceError> {
    Time::parse(value, &TIME_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("invalid time '{value}': {e}")))
}

/// Formats an instant as RFC 3339.
pub(crate) fn format_datetime(datetime: OffsetDateTime) -> Result<String, PersistenceError> {
    datetime
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses an instant from RFC 3339.
pub(crate) fn parse_datetime(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::SerializationError(format!("invalid timestamp '{value}': {e}"))
    })
}

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A full schedule row.
#[derive(Debug, Clone, diesel::Queryable)]
pub struct ScheduleRow {
    pub schedule_id: i64,
    pub duty_date: String,
    pub location: String,
    pub site_name: Option<String>,
    pub shift_start: String,
    pub shift_end: String,
    pub description: String,
    pub max_students: i32,
    pub status: String,
    pub created_by: i64,
    pub created_at: String,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
}

impl ScheduleRow {
    /// Converts this row into a domain `Schedule`.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if a stored date, time or status
    /// cannot be parsed.
    pub fn into_domain(self) -> Result<Schedule, PersistenceError> {
        let location = self.site_name.as_ref().map_or_else(
            || HospitalSite::new(&self.location),
            |name| HospitalSite::with_name(&self.location, name),
        );
        let shift = ShiftWindow::new(
            parse_time_of_day(&self.shift_start)?,
            parse_time_of_day(&self.shift_end)?,
        )
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let status = ScheduleStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let approved_at = self
            .approved_at
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(Schedule::with_id(
            self.schedule_id,
            parse_date(&self.duty_date)?,
            location,
            shift,
            self.description,
            u32::try_from(self.max_students)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            status,
            self.created_by,
            parse_datetime(&self.created_at)?,
            self.approved_by,
            approved_at,
        ))
    }
}

/// An insertable schedule row.
#[derive(Debug, Clone, diesel::Insertable)]
#[diesel(table_name = crate::diesel_schema::schedules)]
pub struct NewScheduleRow {
    pub duty_date: String,
    pub location: String,
    pub site_name: Option<String>,
    pub shift_start: String,
    pub shift_end: String,
    pub description: String,
    pub max_students: i32,
    pub status: String,
    pub created_by: i64,
    pub created_at: String,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
}

impl NewScheduleRow {
    /// Builds an insertable row from a domain `Schedule`.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if a date or time cannot be formatted.
    pub fn from_domain(schedule: &Schedule) -> Result<Self, PersistenceError> {
        let approved_at = schedule.approved_at.map(format_datetime).transpose()?;
        Ok(Self {
            duty_date: format_date(schedule.date)?,
            location: schedule.location.code().to_string(),
            site_name: schedule.location.name().map(ToString::to_string),
            shift_start: format_time_of_day(schedule.shift.start())?,
            shift_end: format_time_of_day(schedule.shift.end())?,
            description: schedule.description.clone(),
            max_students: i32::try_from(schedule.max_students)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            status: schedule.status.as_str().to_string(),
            created_by: schedule.created_by,
            created_at: format_datetime(schedule.created_at)?,
            approved_by: schedule.approved_by,
            approved_at,
        })
    }
}

/// A full booking row.
#[derive(Debug, Clone, diesel::Queryable)]
pub struct BookingRow {
    pub booking_id: i64,
    pub schedule_id: i64,
    pub student_id: i64,
    pub booking_time: String,
    pub status: String,
    pub cancelled_at: Option<String>,
    pub cancellation_reason: Option<String>,
    pub completed_at: Option<String>,
}

impl BookingRow {
    /// Converts this row into a domain `Booking`.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if a stored timestamp or status
    /// cannot be parsed.
    pub fn into_domain(self) -> Result<Booking, PersistenceError> {
        let status = BookingStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let cancelled_at = self
            .cancelled_at
            .as_deref()
            .map(parse_datetime)
            .transpose()?;
        let completed_at = self
            .completed_at
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(Booking::with_id(
            self.booking_id,
            self.schedule_id,
            self.student_id,
            parse_datetime(&self.booking_time)?,
            status,
            cancelled_at,
            self.cancellation_reason,
            completed_at,
        ))
    }
}

/// An insertable booking row.
#[derive(Debug, Clone, diesel::Insertable)]
#[diesel(table_name = crate::diesel_schema::bookings)]
pub struct NewBookingRow {
    pub schedule_id: i64,
    pub student_id: i64,
    pub booking_time: String,
    pub status: String,
}

impl NewBookingRow {
    /// Builds an insertable row from a domain `Booking`.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the booking time cannot be formatted.
    pub fn from_domain(booking: &Booking) -> Result<Self, PersistenceError> {
        Ok(Self {
            schedule_id: booking.schedule_id,
            student_id: booking.student_id,
            booking_time: format_datetime(booking.booking_time)?,
            status: booking.status.as_str().to_string(),
        })
    }
}

/// A cancellation marker row.
#[derive(Debug, Clone, diesel::Queryable)]
pub struct MarkerRow {
    pub marker_id: i64,
    pub student_id: i64,
    pub duty_date: String,
    pub cancelled_on: String,
}

impl MarkerRow {
    /// Converts this row into a domain `CancellationMarker`.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if a stored date cannot be parsed.
    pub fn into_domain(self) -> Result<CancellationMarker, PersistenceError> {
        Ok(CancellationMarker::new(
            self.student_id,
            parse_date(&self.duty_date)?,
            parse_date(&self.cancelled_on)?,
        ))
    }
}

/// An insertable cancellation marker row.
#[derive(Debug, Clone, diesel::Insertable)]
#[diesel(table_name = crate::diesel_schema::cancellation_markers)]
pub struct NewMarkerRow {
    pub student_id: i64,
    pub duty_date: String,
    pub cancelled_on: String,
}

impl NewMarkerRow {
    /// Builds an insertable row from a domain `CancellationMarker`.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if a date cannot be formatted.
    pub fn from_domain(marker: &CancellationMarker) -> Result<Self, PersistenceError> {
        Ok(Self {
            student_id: marker.student_id,
            duty_date: format_date(marker.duty_date)?,
            cancelled_on: format_date(marker.cancelled_on)?,
        })
    }
}

/// A full duty log row.
#[derive(Debug, Clone, diesel::Queryable)]
pub struct DutyLogRow {
    pub event_id: i64,
    pub schedule_id: Option<i64>,
    pub booking_id: Option<i64>,
    pub target_student_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

impl DutyLogRow {
    /// Converts this row into an `AuditEvent`.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if a stored JSON blob cannot be parsed.
    pub fn into_domain(self) -> Result<AuditEvent, PersistenceError> {
        let actor: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause: CauseData = serde_json::from_str(&self.cause_json)?;
        let action: ActionData = serde_json::from_str(&self.action_json)?;
        let before: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let mut event = AuditEvent::new(
            Actor::new(actor.id, actor.actor_type),
            Cause::new(cause.id, cause.description),
            Action::new(action.name, action.details),
            StateSnapshot::new(before.data),
            StateSnapshot::new(after.data),
            self.schedule_id,
            self.booking_id,
            self.target_student_id,
        );
        event.event_id = Some(self.event_id);
        Ok(event)
    }
}

/// An insertable duty log row.
#[derive(Debug, Clone, diesel::Insertable)]
#[diesel(table_name = crate::diesel_schema::duty_logs)]
pub struct NewDutyLogRow {
    pub schedule_id: Option<i64>,
    pub booking_id: Option<i64>,
    pub target_student_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

/// A notification row as read back by the API.
#[derive(Debug, Clone, PartialEq, Eq, diesel::Queryable)]
pub struct NotificationData {
    pub notification_id: i64,
    pub recipient: String,
    pub user_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub severity: String,
    pub is_read: i32,
    pub created_at: String,
    pub read_at: Option<String>,
}

/// An insertable notification row.
#[derive(Debug, Clone, diesel::Insertable)]
#[diesel(table_name = crate::diesel_schema::notifications)]
pub struct NewNotificationRow {
    pub recipient: String,
    pub user_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub severity: String,
    pub is_read: i32,
    pub created_at: String,
}
