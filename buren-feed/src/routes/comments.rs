use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use buren_shared::errors::{AppError, AppResult, ErrorCode};
use buren_shared::types::auth::AuthUser;
use buren_shared::types::pagination::{Paginated, PaginationParams};
use buren_shared::types::ApiResponse;

use crate::clients::identity::UserProfile;
use crate::models::{Comment, NewComment, Post};
use crate::notifications::aggregator;
use crate::services::{comment_service, notification_service, post_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentQueryParams {
    #[serde(default)]
    pub inline_author: bool,
    #[serde(default)]
    pub inline_post: bool,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Post>,
}

impl CommentView {
    pub fn new(comment: Comment, authors: &HashMap<Uuid, UserProfile>) -> Self {
        let author = authors.get(&comment.author_id).cloned();
        Self { comment, author, post: None }
    }
}

/// GET /comments/:id
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<CommentQueryParams>,
) -> AppResult<Json<ApiResponse<CommentView>>> {
    let comment = comment_service::get_comment(&state.db, id)?;

    let author = if params.inline_author {
        state
            .identity
            .batch_users(&[comment.author_id])
            .await
            .remove(&comment.author_id)
    } else {
        None
    };

    let post = if params.inline_post {
        Some(post_service::get_post(&state.db, comment.post_id)?)
    } else {
        None
    };

    Ok(Json(ApiResponse::ok(CommentView { comment, author, post })))
}

/// GET /posts/:post_id/comments
/// A post's comments in arrival order, paginated.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(post_id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<CommentQueryParams>,
) -> AppResult<Json<ApiResponse<Paginated<CommentView>>>> {
    let limit = pagination.limit() as i64;
    let offset = pagination.offset() as i64;

    let (items, total) = comment_service::list_for_post(&state.db, post_id, limit, offset)?;

    let authors = if params.inline_author {
        let mut author_ids: Vec<Uuid> = items.iter().map(|c| c.author_id).collect();
        author_ids.sort();
        author_ids.dedup();
        state.identity.batch_users(&author_ids).await
    } else {
        HashMap::new()
    };

    let views: Vec<CommentView> = items
        .into_iter()
        .map(|comment| CommentView::new(comment, &authors))
        .collect();

    let paginated = Paginated::new(views, total as u64, &pagination);
    Ok(Json(ApiResponse::ok(paginated)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "body is required"))]
    pub body: String,
}

/// POST /posts/:post_id/comments
/// Stores the comment, appends it to the post's comment list, and runs
/// notification aggregation in the same request. Both writes must land for
/// the request to succeed.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(post_id): Path<Uuid>,
    Query(params): Query<CommentQueryParams>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<Json<ApiResponse<CommentView>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    let post = post_service::get_post(&state.db, post_id)?;

    let comment = comment_service::create_comment(
        &state.db,
        NewComment {
            body: req.body,
            author_id: auth.id,
            post_id: post.id,
        },
    )?;

    post_service::append_comment(&state.db, post.id, comment.id)?;

    let existing = notification_service::find_live(&state.db, post.author_id, post.id)?;
    let intent = aggregator::plan(
        post.author_id,
        post.id,
        comment.author_id,
        comment.id,
        existing.map(|n| n.id),
    );
    let notification = notification_service::apply(&state.db, &intent)?;

    crate::events::publisher::publish_comment_created(
        &state.rabbitmq,
        comment.id,
        post.id,
        comment.author_id,
    )
    .await;

    if let Some(notification) = &notification {
        crate::events::publisher::publish_notification_created(
            &state.rabbitmq,
            notification.id,
            notification.user_id,
            notification.post_id,
            notification.comment_ids.len() as i64,
        )
        .await;
    }

    tracing::info!(
        comment_id = %comment.id,
        post_id = %post.id,
        author_id = %comment.author_id,
        "comment published"
    );

    let author = if params.inline_author {
        state
            .identity
            .batch_users(&[comment.author_id])
            .await
            .remove(&comment.author_id)
    } else {
        None
    };

    Ok(Json(ApiResponse::ok(CommentView { comment, author, post: None })))
}
