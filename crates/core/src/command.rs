// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, Weekday};
use ward_duty_domain::{HospitalSite, RotationSite, ShiftWindow};

/// The party cancelling a booking.
///
/// Students may only cancel their own bookings; admins may cancel any
/// booking. The same-day prohibition applies to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelActor {
    /// A student cancelling their own booking.
    Student(i64),
    /// An admin cancelling on a student's behalf.
    Admin(i64),
}

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a single duty schedule.
    CreateSchedule {
        /// The duty date.
        date: Date,
        /// The hospital site.
        location: HospitalSite,
        /// The shift window.
        shift: ShiftWindow,
        /// Description shown to students.
        description: String,
        /// Seat capacity.
        max_students: u32,
        /// The admin creating the schedule.
        admin_id: i64,
    },
    /// Generate schedules over a date range using the monthly site rotation.
    ///
    /// Dates already scheduled at the rotation site are skipped rather
    /// than rejected, so a range can be re-run to fill gaps.
    BulkCreateSchedules {
        /// First day of the range (inclusive).
        start_date: Date,
        /// Last day of the range (inclusive).
        end_date: Date,
        /// Weekdays to generate duties for.
        weekdays: Vec<Weekday>,
        /// The monthly site rotation.
        rotation: Vec<RotationSite>,
        /// Shift window applied to every generated schedule.
        shift: ShiftWindow,
        /// Description applied to every generated schedule.
        description: String,
        /// The admin generating the schedules.
        admin_id: i64,
    },
    /// Book a seat on a schedule for a student.
    BookDuty {
        /// The schedule to book.
        schedule_id: i64,
        /// The student booking it.
        student_id: i64,
    },
    /// Cancel a booking before its duty day.
    CancelBooking {
        /// The booking to cancel.
        booking_id: i64,
        /// Who is cancelling.
        actor: CancelActor,
    },
    /// Mark a duty as performed. Requires an approved schedule.
    CompleteBooking {
        /// The booking to complete.
        booking_id: i64,
        /// The student completing their duty.
        student_id: i64,
    },
    /// Permanently remove a booked booking under a still-pending schedule.
    DeletePendingBooking {
        /// The booking to delete.
        booking_id: i64,
        /// The owning student.
        student_id: i64,
    },
    /// Approve a pending schedule.
    ApproveSchedule {
        /// The schedule to approve.
        schedule_id: i64,
        /// The approving admin.
        admin_id: i64,
    },
    /// Reject a pending schedule, cancelling every booked booking under it.
    RejectSchedule {
        /// The schedule to reject.
        schedule_id: i64,
        /// The rejecting admin.
        admin_id: i64,
    },
    /// Permanently remove a schedule and, by cascade, its bookings.
    DeleteSchedule {
        /// The schedule to delete.
        schedule_id: i64,
        /// The deleting admin.
        admin_id: i64,
    },
}
