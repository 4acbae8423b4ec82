// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification query operations.
//!
//! Students see rows addressed to them; admins additionally see the
//! group rows addressed to all admins.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::NotificationData;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

backend_fn! {

/// Returns a student's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn notifications_for_student(
    conn: &mut _,
    student_id: i64,
    limit: i64,
) -> Result<Vec<NotificationData>, PersistenceError> {
    notifications::table
        .filter(notifications::recipient.eq("student"))
        .filter(notifications::user_id.eq(student_id))
        .order(notifications::notification_id.desc())
        .limit(limit)
        .load::<NotificationData>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("notifications_for_student: {e}")))
}

}

backend_fn! {

/// Returns the admin-group notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn notifications_for_admins(
    conn: &mut _,
    limit: i64,
) -> Result<Vec<NotificationData>, PersistenceError> {
    notifications::table
        .filter(notifications::recipient.eq("admins"))
        .order(notifications::notification_id.desc())
        .limit(limit)
        .load::<NotificationData>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("notifications_for_admins: {e}")))
}

}

backend_fn! {

/// Counts a student's unread notifications.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn unread_count_for_student(
    conn: &mut _,
    student_id: i64,
) -> Result<i64, PersistenceError> {
    notifications::table
        .filter(notifications::recipient.eq("student"))
        .filter(notifications::user_id.eq(student_id))
        .filter(notifications::is_read.eq(0))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("unread_count_for_student: {e}")))
}

}
