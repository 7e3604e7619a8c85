use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use buren_shared::errors::AppResult;
use buren_shared::types::auth::AuthUser;
use buren_shared::types::ApiResponse;

use crate::models::Comment;
use crate::routes::comments::CommentView;
use crate::services::{comment_service, notification_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationQueryParams {
    #[serde(default)]
    pub inline_comments: bool,
    #[serde(default)]
    pub inline_author: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DeliveredComments {
    Ids(Vec<Uuid>),
    Inlined(Vec<CommentView>),
}

#[derive(Debug, Serialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub post: Uuid,
    pub comments: DeliveredComments,
}

/// DELETE /notifications
/// One-shot delivery: every notification returned is consumed by this same
/// call. 204 when there is nothing outstanding.
pub async fn deliver_notifications(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<NotificationQueryParams>,
) -> AppResult<Response> {
    let delivered = notification_service::deliver(&state.db, auth.id)?;

    if delivered.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let views: Vec<NotificationView> = if params.inline_comments {
        let all_ids: Vec<Uuid> = delivered
            .iter()
            .flat_map(|n| n.comment_ids.iter().copied())
            .collect();
        let fetched = comment_service::get_by_ids(&state.db, &all_ids)?;

        let authors = if params.inline_author {
            let mut author_ids: Vec<Uuid> = fetched.iter().map(|c| c.author_id).collect();
            author_ids.sort();
            author_ids.dedup();
            state.identity.batch_users(&author_ids).await
        } else {
            HashMap::new()
        };

        let by_id: HashMap<Uuid, Comment> = fetched.into_iter().map(|c| (c.id, c)).collect();

        delivered
            .into_iter()
            .map(|n| NotificationView {
                id: n.id,
                post: n.post_id,
                comments: DeliveredComments::Inlined(
                    n.comment_ids
                        .iter()
                        .filter_map(|id| by_id.get(id).cloned())
                        .map(|c| CommentView::new(c, &authors))
                        .collect(),
                ),
            })
            .collect()
    } else {
        delivered
            .into_iter()
            .map(|n| NotificationView {
                id: n.id,
                post: n.post_id,
                comments: DeliveredComments::Ids(n.comment_ids),
            })
            .collect()
    };

    tracing::info!(user_id = %auth.id, count = views.len(), "notifications delivered");

    Ok((StatusCode::OK, Json(ApiResponse::ok(views))).into_response())
}
