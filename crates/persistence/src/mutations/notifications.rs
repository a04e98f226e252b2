// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gudang_domain::ActorId;
use gudang_notify::Notification;
use time::OffsetDateTime;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Stores a notification in its recipient's inbox and returns its id.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` for an unknown recipient.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    notification: &Notification,
    at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(at)?;
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(notifications::table)
            .values((
                notifications::user_id.eq(notification.user_id.as_str()),
                notifications::message.eq(&notification.message),
                notifications::link.eq(&notification.link),
                notifications::is_read.eq(false),
                notifications::created_at.eq(&created_at),
            ))
            .execute(conn)?;
        conn.get_last_insert_rowid()
    })
}

/// Marks one of a user's notifications read.
///
/// Returns false if the notification does not exist or belongs to someone
/// else.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_notification_read(
    conn: &mut SqliteConnection,
    user_id: &ActorId,
    notification_id: i64,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        notifications::table
            .filter(notifications::notification_id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id.as_str())),
    )
    .set(notifications::is_read.eq(true))
    .execute(conn)?;
    Ok(updated > 0)
}

/// Marks every unread notification of a user read, returning how many.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_all_notifications_read(
    conn: &mut SqliteConnection,
    user_id: &ActorId,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        notifications::table
            .filter(notifications::user_id.eq(user_id.as_str()))
            .filter(notifications::is_read.eq(false)),
    )
    .set(notifications::is_read.eq(true))
    .execute(conn)?)
}
