// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cancellation marker maintenance.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::Date;
use tracing::debug;

use crate::data_models::format_date;
use crate::diesel_schema::cancellation_markers;
use crate::error::PersistenceError;

backend_fn! {

/// Deletes markers whose calendar day has passed.
///
/// Expired markers can no longer block anything; pruning keeps the
/// table from accumulating one row per cancellation forever.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `today` - The current facility-local calendar day
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn prune_expired_markers(conn: &mut _, today: Date) -> Result<usize, PersistenceError> {
    let today_str = format_date(today)?;
    let removed = diesel::delete(
        cancellation_markers::table.filter(cancellation_markers::cancelled_on.lt(today_str)),
    )
    .execute(conn)?;
    if removed > 0 {
        debug!(removed, "Pruned expired cancellation markers");
    }
    Ok(removed)
}

}
