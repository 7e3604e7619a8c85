use diesel::dsl::array_append;
use diesel::prelude::*;
use uuid::Uuid;

use buren_shared::clients::db::DbPool;
use buren_shared::errors::{AppError, AppResult};

use crate::models::{NewNotification, Notification};
use crate::notifications::aggregator::NotificationIntent;
use crate::schema::notifications;

/// Look up the live notification for a (recipient, post) pair, if any.
/// The UNIQUE (user_id, post_id) index guarantees at most one row.
pub fn find_live(pool: &DbPool, user_id: Uuid, post_id: Uuid) -> AppResult<Option<Notification>> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    Ok(notifications::table
        .filter(notifications::user_id.eq(user_id))
        .filter(notifications::post_id.eq(post_id))
        .first::<Notification>(&mut conn)
        .optional()?)
}

/// Apply an aggregation intent. Returns the live notification after the
/// write, or `None` when nothing was written.
pub fn apply(pool: &DbPool, intent: &NotificationIntent) -> AppResult<Option<Notification>> {
    match intent {
        NotificationIntent::Skip => Ok(None),

        NotificationIntent::Create {
            recipient,
            post_id,
            comment_id,
        } => {
            let mut conn = pool.get().map_err(|e| {
                tracing::error!(error = %e, "failed to get db connection");
                AppError::internal("database connection error")
            })?;

            // Upsert on the (user_id, post_id) unique index: if a concurrent
            // comment created the row first, this append merges into it
            // instead of violating the one-live-notification invariant.
            let notification = diesel::insert_into(notifications::table)
                .values(&NewNotification {
                    user_id: *recipient,
                    post_id: *post_id,
                    comment_ids: vec![*comment_id],
                })
                .on_conflict((notifications::user_id, notifications::post_id))
                .do_update()
                .set(notifications::comment_ids.eq(array_append(notifications::comment_ids, *comment_id)))
                .get_result::<Notification>(&mut conn)?;

            tracing::debug!(
                notification_id = %notification.id,
                recipient = %recipient,
                post_id = %post_id,
                "notification created"
            );

            Ok(Some(notification))
        }

        NotificationIntent::Append {
            notification_id,
            comment_id,
        } => {
            let mut conn = pool.get().map_err(|e| {
                tracing::error!(error = %e, "failed to get db connection");
                AppError::internal("database connection error")
            })?;

            let notification = diesel::update(notifications::table.find(*notification_id))
                .set(notifications::comment_ids.eq(array_append(notifications::comment_ids, *comment_id)))
                .get_result::<Notification>(&mut conn)
                .optional()?;

            match &notification {
                Some(n) => {
                    tracing::debug!(
                        notification_id = %n.id,
                        comment_count = n.comment_ids.len(),
                        "notification merged"
                    );
                }
                None => {
                    // Consumed by a concurrent delivery between the lookup
                    // and this append; the comment arrives "after delivery".
                    tracing::warn!(
                        notification_id = %notification_id,
                        "live notification vanished before append"
                    );
                }
            }

            Ok(notification)
        }
    }
}

/// Deliver-and-consume: every notification returned is deleted by the same
/// statement (DELETE .. RETURNING), so a racing second delivery cannot see
/// the same row twice.
pub fn deliver(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<Notification>> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    let delivered = diesel::delete(notifications::table.filter(notifications::user_id.eq(user_id)))
        .get_results::<Notification>(&mut conn)?;

    if !delivered.is_empty() {
        tracing::debug!(
            user_id = %user_id,
            count = delivered.len(),
            "notifications delivered and consumed"
        );
    }

    Ok(delivered)
}
