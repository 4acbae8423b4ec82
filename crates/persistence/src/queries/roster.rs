// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster state loading.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::Date;
use ward_duty::Roster;

use crate::data_models::{BookingRow, MarkerRow, ScheduleRow, format_date};
use crate::diesel_schema::{bookings, cancellation_markers, schedules};
use crate::error::PersistenceError;

backend_fn! {

/// Loads the complete roster: all schedules, all bookings, and the
/// cancellation markers still in force as of `today`.
///
/// The roster is the working set for every policy decision; it is
/// reloaded per request so counts always reflect the current rows.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `today` - The current facility-local calendar day
///
/// # Errors
///
/// Returns an error if a query fails or a stored row cannot be parsed.
pub fn load_roster(conn: &mut _, today: Date) -> Result<Roster, PersistenceError> {
    let schedule_rows: Vec<ScheduleRow> = schedules::table
        .order(schedules::duty_date.asc())
        .load::<ScheduleRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_roster schedules: {e}")))?;

    let booking_rows: Vec<BookingRow> = bookings::table
        .order(bookings::booking_id.asc())
        .load::<BookingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_roster bookings: {e}")))?;

    let today_str = format_date(today)?;
    let marker_rows: Vec<MarkerRow> = cancellation_markers::table
        .filter(cancellation_markers::cancelled_on.ge(today_str))
        .load::<MarkerRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_roster markers: {e}")))?;

    let mut roster = Roster::new();
    for row in schedule_rows {
        roster.schedules.push(row.into_domain()?);
    }
    for row in booking_rows {
        roster.bookings.push(row.into_domain()?);
    }
    for row in marker_rows {
        roster.markers.push(row.into_domain()?);
    }
    Ok(roster)
}

}
