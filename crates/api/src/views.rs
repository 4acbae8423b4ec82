// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-parameterized roster projections.
//!
//! Admin, student and parent views are pure projections over the same
//! canonical schedule/booking rows, parameterized by the viewer. The
//! stored representation never diverges per role: admins see seat
//! occupants, students see the counts plus their own booking, parents
//! see a read-only copy of their linked student's view.

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use ward_duty::Roster;
use ward_duty_domain::{Booking, Schedule, active_count, is_full, remaining};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

fn fmt_date(date: Date) -> String {
    date.format(&DATE_FORMAT).unwrap_or_default()
}

fn fmt_time(time: Time) -> String {
    time.format(&TIME_FORMAT).unwrap_or_default()
}

fn fmt_datetime(datetime: OffsetDateTime) -> String {
    datetime.format(&Rfc3339).unwrap_or_default()
}

/// The viewer a projection is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// An admin: sees occupants and full status everywhere.
    Admin,
    /// A student: sees counts plus their own booking.
    Student(i64),
    /// A parent: read-only view of the linked student's bookings.
    Parent {
        /// The linked student.
        student_id: i64,
    },
}

impl Viewer {
    /// The student whose bookings this viewer may see, if any.
    #[must_use]
    const fn visible_student(&self) -> Option<i64> {
        match self {
            Self::Admin => None,
            Self::Student(id) | Self::Parent { student_id: id } => Some(*id),
        }
    }
}

/// A seat occupant, visible to admins only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupantView {
    /// The booking.
    pub booking_id: i64,
    /// The student holding the seat.
    pub student_id: i64,
    /// The booking status.
    pub status: String,
    /// When the booking was made (RFC 3339).
    pub booking_time: String,
}

/// The viewer's own booking on a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnBookingView {
    /// The booking.
    pub booking_id: i64,
    /// The booking status.
    pub status: String,
    /// When the booking was made (RFC 3339).
    pub booking_time: String,
}

/// One schedule as projected for a viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleView {
    /// The schedule.
    pub schedule_id: i64,
    /// The duty date.
    pub date: String,
    /// The site code.
    pub location: String,
    /// Optional human-readable site name.
    pub site_name: Option<String>,
    /// Shift start (`HH:MM`).
    pub shift_start: String,
    /// Shift end (`HH:MM`).
    pub shift_end: String,
    /// Description shown to students.
    pub description: String,
    /// The approval status.
    pub status: String,
    /// Seat capacity.
    pub max_students: u32,
    /// Seats currently occupied.
    pub active_count: u32,
    /// Seats still available.
    pub remaining: u32,
    /// Whether the schedule is full.
    pub is_full: bool,
    /// Seat occupants. Populated for admins only.
    pub occupants: Vec<OccupantView>,
    /// The visible student's booking on this schedule, if any.
    pub own_booking: Option<OwnBookingView>,
}

/// Projects the roster's schedules for a viewer, ordered by date.
///
/// Counts are recomputed from the bookings on every call.
#[must_use]
pub fn schedule_views(roster: &Roster, viewer: Viewer) -> Vec<ScheduleView> {
    roster
        .schedules
        .iter()
        .map(|schedule| schedule_view(schedule, &roster.bookings, viewer))
        .collect()
}

fn schedule_view(schedule: &Schedule, bookings: &[Booking], viewer: Viewer) -> ScheduleView {
    let occupants: Vec<OccupantView> = if viewer == Viewer::Admin {
        bookings
            .iter()
            .filter(|b| {
                Some(b.schedule_id) == schedule.schedule_id && b.occupies_seat()
            })
            .filter_map(|b| {
                b.booking_id.map(|booking_id| OccupantView {
                    booking_id,
                    student_id: b.student_id,
                    status: b.status.as_str().to_string(),
                    booking_time: fmt_datetime(b.booking_time),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let own_booking = viewer.visible_student().and_then(|student_id| {
        bookings
            .iter()
            .find(|b| {
                Some(b.schedule_id) == schedule.schedule_id
                    && b.student_id == student_id
                    && b.occupies_seat()
            })
            .and_then(|b| {
                b.booking_id.map(|booking_id| OwnBookingView {
                    booking_id,
                    status: b.status.as_str().to_string(),
                    booking_time: fmt_datetime(b.booking_time),
                })
            })
    });

    ScheduleView {
        schedule_id: schedule.schedule_id.unwrap_or_default(),
        date: fmt_date(schedule.date),
        location: schedule.location.code().to_string(),
        site_name: schedule.location.name().map(ToString::to_string),
        shift_start: fmt_time(schedule.shift.start()),
        shift_end: fmt_time(schedule.shift.end()),
        description: schedule.description.clone(),
        status: schedule.status.as_str().to_string(),
        max_students: schedule.max_students,
        active_count: active_count(schedule, bookings),
        remaining: remaining(schedule, bookings),
        is_full: is_full(schedule, bookings),
        occupants,
        own_booking,
    }
}

/// One entry of a student's duty history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyHistoryView {
    /// The booking.
    pub booking_id: i64,
    /// The owning schedule.
    pub schedule_id: i64,
    /// The duty date.
    pub date: String,
    /// The site code.
    pub location: String,
    /// Shift start (`HH:MM`).
    pub shift_start: String,
    /// Shift end (`HH:MM`).
    pub shift_end: String,
    /// The schedule's approval status.
    pub schedule_status: String,
    /// The booking status.
    pub booking_status: String,
    /// When the booking was made (RFC 3339).
    pub booking_time: String,
    /// Cancellation timestamp, if cancelled.
    pub cancelled_at: Option<String>,
    /// Why the booking was cancelled, if cancelled.
    pub cancellation_reason: Option<String>,
    /// Completion timestamp, if completed.
    pub completed_at: Option<String>,
}

/// Projects a student's duty history, newest booking first.
///
/// Used both for the student's own history and for the read-only
/// parent view of the linked student.
#[must_use]
pub fn duty_history(roster: &Roster, student_id: i64) -> Vec<DutyHistoryView> {
    let mut entries: Vec<DutyHistoryView> = roster
        .bookings
        .iter()
        .filter(|b| b.student_id == student_id)
        .filter_map(|b| {
            let schedule = roster.schedule(b.schedule_id)?;
            let booking_id = b.booking_id?;
            Some(DutyHistoryView {
                booking_id,
                schedule_id: b.schedule_id,
                date: fmt_date(schedule.date),
                location: schedule.location.code().to_string(),
                shift_start: fmt_time(schedule.shift.start()),
                shift_end: fmt_time(schedule.shift.end()),
                schedule_status: schedule.status.as_str().to_string(),
                booking_status: b.status.as_str().to_string(),
                booking_time: fmt_datetime(b.booking_time),
                cancelled_at: b.cancelled_at.map(fmt_datetime),
                cancellation_reason: b.cancellation_reason.clone(),
                completed_at: b.completed_at.map(fmt_datetime),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.booking_time.cmp(&a.booking_time));
    entries
}
