// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.
//!
//! Dates and times cross the boundary as ISO 8601 strings and are
//! parsed here; domain types never leak into the wire contract.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time, Weekday};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

/// Parses a `YYYY-MM-DD` date field.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` naming the field.
pub(crate) fn parse_date_field(value: &str, field: &str) -> Result<Date, ApiError> {
    Date::parse(value, &DATE_FORMAT).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Failed to parse date '{value}': {e}"),
    })
}

/// Parses an `HH:MM` time field.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` naming the field.
pub(crate) fn parse_time_field(value: &str, field: &str) -> Result<Time, ApiError> {
    Time::parse(value, &TIME_FORMAT).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Failed to parse time '{value}': {e}"),
    })
}

/// Parses a weekday index (0 = Sunday through 6 = Saturday).
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for indices outside 0..=6.
pub(crate) fn parse_weekday_index(index: u8) -> Result<Weekday, ApiError> {
    match index {
        0 => Ok(Weekday::Sunday),
        1 => Ok(Weekday::Monday),
        2 => Ok(Weekday::Tuesday),
        3 => Ok(Weekday::Wednesday),
        4 => Ok(Weekday::Thursday),
        5 => Ok(Weekday::Friday),
        6 => Ok(Weekday::Saturday),
        _ => Err(ApiError::InvalidInput {
            field: String::from("weekdays"),
            message: format!("Invalid weekday index {index}. Must be 0 (Sunday) through 6"),
        }),
    }
}

/// Request to create a single schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    /// The duty date (`YYYY-MM-DD`).
    pub date: String,
    /// The hospital site code.
    pub location: String,
    /// Optional human-readable site name.
    pub site_name: Option<String>,
    /// Shift start (`HH:MM`).
    pub shift_start: String,
    /// Shift end (`HH:MM`).
    pub shift_end: String,
    /// Description shown to students.
    pub description: String,
    /// Seat capacity.
    pub max_students: u32,
}

/// Response for a created schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleResponse {
    /// The duty date.
    pub date: String,
    /// The site code.
    pub location: String,
    /// Seat capacity.
    pub max_students: u32,
    /// A success message.
    pub message: String,
}

/// One rotation entry for bulk generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationSiteRequest {
    /// The hospital site code.
    pub site_code: String,
    /// Optional human-readable site name.
    pub site_name: Option<String>,
    /// Seat capacity for schedules generated at this site.
    pub capacity: u32,
}

/// Request to generate schedules over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateSchedulesRequest {
    /// First day of the range (`YYYY-MM-DD`, inclusive).
    pub start_date: String,
    /// Last day of the range (`YYYY-MM-DD`, inclusive).
    pub end_date: String,
    /// Weekday indices to generate for (0 = Sunday). Defaults to
    /// Monday through Friday when omitted.
    pub weekdays: Option<Vec<u8>>,
    /// The monthly site rotation.
    pub rotation: Vec<RotationSiteRequest>,
    /// Shift start (`HH:MM`).
    pub shift_start: String,
    /// Shift end (`HH:MM`).
    pub shift_end: String,
    /// Description applied to every generated schedule.
    pub description: String,
}

/// Response for bulk schedule generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateSchedulesResponse {
    /// Number of schedules created.
    pub created: usize,
    /// Number of dates skipped because the site was already scheduled.
    pub skipped: usize,
    /// A success message.
    pub message: String,
}

/// Request to book a duty seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDutyRequest {
    /// The schedule to book.
    pub schedule_id: i64,
}

/// Response for a booked duty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDutyResponse {
    /// The booked schedule.
    pub schedule_id: i64,
    /// The duty date.
    pub date: String,
    /// A success message.
    pub message: String,
}

/// Request to cancel a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// The booking to cancel.
    pub booking_id: i64,
}

/// Response for a cancelled booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    /// The cancelled booking.
    pub booking_id: i64,
    /// The duty date the booking was for.
    pub date: String,
    /// A success message.
    pub message: String,
}

/// Request to mark a duty as completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteBookingRequest {
    /// The booking to complete.
    pub booking_id: i64,
}

/// Response for a completed duty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteBookingResponse {
    /// The completed booking.
    pub booking_id: i64,
    /// A success message.
    pub message: String,
}

/// Request to hard-delete a booked entry under a pending schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookingRequest {
    /// The booking to delete.
    pub booking_id: i64,
}

/// Response for a deleted booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookingResponse {
    /// The deleted booking.
    pub booking_id: i64,
    /// A success message.
    pub message: String,
}

/// Request for an admin action on a schedule (approve/reject/delete).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleActionRequest {
    /// The target schedule.
    pub schedule_id: i64,
}

/// Response for an approved schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveScheduleResponse {
    /// The approved schedule.
    pub schedule_id: i64,
    /// How many booked students were notified.
    pub students_notified: usize,
    /// A success message.
    pub message: String,
}

/// Response for a rejected schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectScheduleResponse {
    /// The rejected schedule.
    pub schedule_id: i64,
    /// How many bookings the cascade cancelled.
    pub bookings_cancelled: usize,
    /// A success message.
    pub message: String,
}

/// Response for a deleted schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteScheduleResponse {
    /// The deleted schedule.
    pub schedule_id: i64,
    /// A success message.
    pub message: String,
}
