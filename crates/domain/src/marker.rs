// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Same-day cancellation markers.
//!
//! When a student cancels a booking, the roster records which duty date
//! was cancelled on which calendar day. A new booking by the same
//! student for the same duty date is blocked for the rest of that
//! calendar day. Markers are durable server-side facts so the
//! restriction holds across sessions and restarts; a marker whose
//! `cancelled_on` day has passed is inert.

use time::Date;

/// A record of a student cancelling a booking for a duty date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationMarker {
    /// The student who cancelled.
    pub student_id: i64,
    /// The duty date of the cancelled booking.
    pub duty_date: Date,
    /// The calendar day (facility-local) the cancellation happened on.
    pub cancelled_on: Date,
}

impl CancellationMarker {
    /// Creates a new `CancellationMarker`.
    #[must_use]
    pub const fn new(student_id: i64, duty_date: Date, cancelled_on: Date) -> Self {
        Self {
            student_id,
            duty_date,
            cancelled_on,
        }
    }

    /// Returns whether this marker blocks `student_id` from booking
    /// `duty_date` on the calendar day `today`.
    ///
    /// The block applies only on the day of the cancellation itself.
    #[must_use]
    pub fn blocks(&self, student_id: i64, duty_date: Date, today: Date) -> bool {
        self.student_id == student_id && self.duty_date == duty_date && self.cancelled_on == today
    }

    /// Returns whether this marker can no longer block anything as of `today`.
    ///
    /// Expired markers may be pruned by the persistence layer.
    #[must_use]
    pub fn is_expired(&self, today: Date) -> bool {
        self.cancelled_on < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_marker_blocks_same_student_date_and_day() {
        let marker = CancellationMarker::new(7, date!(2026 - 03 - 10), date!(2026 - 03 - 05));

        assert!(marker.blocks(7, date!(2026 - 03 - 10), date!(2026 - 03 - 05)));
    }

    #[test]
    fn test_marker_does_not_block_other_student() {
        let marker = CancellationMarker::new(7, date!(2026 - 03 - 10), date!(2026 - 03 - 05));

        assert!(!marker.blocks(8, date!(2026 - 03 - 10), date!(2026 - 03 - 05)));
    }

    #[test]
    fn test_marker_does_not_block_other_duty_date() {
        let marker = CancellationMarker::new(7, date!(2026 - 03 - 10), date!(2026 - 03 - 05));

        assert!(!marker.blocks(7, date!(2026 - 03 - 11), date!(2026 - 03 - 05)));
    }

    #[test]
    fn test_marker_expires_next_calendar_day() {
        let marker = CancellationMarker::new(7, date!(2026 - 03 - 10), date!(2026 - 03 - 05));

        assert!(!marker.blocks(7, date!(2026 - 03 - 10), date!(2026 - 03 - 06)));
        assert!(marker.is_expired(date!(2026 - 03 - 06)));
        assert!(!marker.is_expired(date!(2026 - 03 - 05)));
    }
}
