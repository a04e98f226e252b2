// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gudang_domain::ActorId;

use crate::data_models::{NotificationRow, StoredNotification};
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Lists a user's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_notifications(
    conn: &mut SqliteConnection,
    user_id: &ActorId,
    unread_only: bool,
) -> Result<Vec<StoredNotification>, PersistenceError> {
    let mut query = notifications::table
        .filter(notifications::user_id.eq(user_id.as_str()))
        .select(NotificationRow::as_select())
        .into_boxed();
    if unread_only {
        query = query.filter(notifications::is_read.eq(false));
    }
    query
        .order((
            notifications::created_at.desc(),
            notifications::notification_id.desc(),
        ))
        .load::<NotificationRow>(conn)?
        .into_iter()
        .map(StoredNotification::try_from)
        .collect()
}

/// Counts a user's unread notifications.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_unread(
    conn: &mut SqliteConnection,
    user_id: &ActorId,
) -> Result<u64, PersistenceError> {
    let count: i64 = notifications::table
        .filter(notifications::user_id.eq(user_id.as_str()))
        .filter(notifications::is_read.eq(false))
        .count()
        .get_result::<i64>(conn)?;
    crate::data_models::to_unsigned(count, "unread count")
}
