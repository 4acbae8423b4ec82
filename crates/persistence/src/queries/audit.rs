// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duty log query operations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use ward_duty_audit::AuditEvent;

use crate::data_models::DutyLogRow;
use crate::diesel_schema::duty_logs;
use crate::error::PersistenceError;

backend_fn! {

/// Returns the duty log timeline, newest first.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `limit` - Maximum number of events to return
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn get_duty_log(conn: &mut _, limit: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<DutyLogRow> = duty_logs::table
        .order(duty_logs::event_id.desc())
        .limit(limit)
        .load::<DutyLogRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_duty_log: {e}")))?;

    rows.into_iter().map(DutyLogRow::into_domain).collect()
}

}

backend_fn! {

/// Returns a single duty log event by its ID.
///
/// # Errors
///
/// Returns `NotFound` if the event does not exist.
pub fn get_duty_log_event(conn: &mut _, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    let row: Option<DutyLogRow> = duty_logs::table
        .filter(duty_logs::event_id.eq(event_id))
        .first::<DutyLogRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_duty_log_event: {e}")))?;

    row.map_or_else(
        || {
            Err(PersistenceError::NotFound(format!(
                "Duty log event {event_id} not found"
            )))
        },
        DutyLogRow::into_domain,
    )
}

}
