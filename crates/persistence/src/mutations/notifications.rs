// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification row mutations.
//!
//! Notification delivery is fire-and-forget: rows are written after
//! the primary transition has committed, and a failure here is logged
//! by the caller rather than propagated into the transition outcome.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use ward_duty::{Notification, NotificationRecipient};

use crate::data_models::{NewNotificationRow, format_datetime};
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Builds the insertable rows for a batch of notifications.
fn notification_rows(
    batch: &[Notification],
    created_at: OffsetDateTime,
) -> Result<Vec<NewNotificationRow>, PersistenceError> {
    let created_at = format_datetime(created_at)?;
    Ok(batch
        .iter()
        .map(|n| {
            let (recipient, user_id) = match n.recipient {
                NotificationRecipient::Student(id) => ("student", Some(id)),
                NotificationRecipient::AllAdmins => ("admins", None),
            };
            NewNotificationRow {
                recipient: recipient.to_string(),
                user_id,
                title: n.title.clone(),
                message: n.message.clone(),
                severity: n.severity.as_str().to_string(),
                is_read: 0,
                created_at: created_at.clone(),
            }
        })
        .collect())
}

backend_fn! {

/// Inserts a batch of notification rows.
///
/// # Errors
///
/// Returns an error if the insert fails. Callers treat this as
/// best-effort and must not roll back the transition that produced
/// the notifications.
pub fn insert_notifications(
    conn: &mut _,
    batch: &[Notification],
    created_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    if batch.is_empty() {
        return Ok(());
    }
    let rows = notification_rows(batch, created_at)?;
    diesel::insert_into(notifications::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

}

backend_fn! {

/// Marks a notification as read.
///
/// # Errors
///
/// Returns `NotFound` if no such notification exists.
pub fn mark_notification_read(
    conn: &mut _,
    notification_id: i64,
    read_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let read_at = format_datetime(read_at)?;
    let updated = diesel::update(
        notifications::table.filter(notifications::notification_id.eq(notification_id)),
    )
    .set((
        notifications::is_read.eq(1),
        notifications::read_at.eq(read_at),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Notification {notification_id} not found"
        )));
    }
    Ok(())
}

}
