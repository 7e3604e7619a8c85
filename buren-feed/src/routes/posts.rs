use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use buren_shared::errors::{AppError, AppResult, ErrorCode};
use buren_shared::types::auth::AuthUser;
use buren_shared::types::ApiResponse;

use crate::clients::identity::UserProfile;
use crate::feed::ranking;
use crate::models::{Comment, NewPost, Post};
use crate::routes::comments::CommentView;
use crate::services::{comment_service, post_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    /// Comma-separated category filter.
    pub categories: Option<String>,
    #[serde(default)]
    pub inline_comments: bool,
    #[serde(default)]
    pub inline_author: bool,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

/// GET /posts
/// The viewer's feed: posts in their location, ordered by hallway-aware
/// recency.
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<FeedQueryParams>,
) -> AppResult<Json<ApiResponse<Vec<PostView>>>> {
    let viewer = state.identity.get_user(auth.id).await?;

    let categories: Option<Vec<String>> = params
        .categories
        .as_ref()
        .map(|csv| csv.split(',').map(|s| s.trim().to_string()).collect());

    let posts = post_service::list_posts(&state.db, &viewer.location, categories.as_deref())?;
    let ranked = ranking::rank(Some(viewer.hallway.as_str()), Utc::now(), posts);

    let views = build_post_views(&state, ranked, params.inline_comments, params.inline_author).await?;
    Ok(Json(ApiResponse::ok(views)))
}

/// GET /posts/:id
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<FeedQueryParams>,
) -> AppResult<Json<ApiResponse<PostView>>> {
    let post = post_service::get_post(&state.db, id)?;

    let views = build_post_views(&state, vec![post], params.inline_comments, params.inline_author).await?;
    let view = views
        .into_iter()
        .next()
        .ok_or_else(|| AppError::internal("post view missing"))?;

    Ok(Json(ApiResponse::ok(view)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "body is required"))]
    pub body: String,
    #[validate(length(min = 1, max = 50, message = "category must be 1-50 characters"))]
    pub category: String,
}

/// POST /posts
/// The author's hallway and location are stamped from their profile, never
/// taken from the request body.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<FeedQueryParams>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<Json<ApiResponse<PostView>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    let author = state.identity.get_user(auth.id).await?;

    let post = post_service::create_post(
        &state.db,
        NewPost {
            title: req.title,
            body: req.body,
            category: req.category,
            author_id: author.id,
            hallway: author.hallway.clone(),
            location: author.location.clone(),
            comment_ids: vec![],
        },
    )?;

    crate::events::publisher::publish_post_created(
        &state.rabbitmq,
        post.id,
        post.author_id,
        &post.category,
        &post.hallway,
        &post.location,
    )
    .await;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "post published");

    let author = params.inline_author.then_some(author);
    Ok(Json(ApiResponse::ok(PostView { post, author, comments: None })))
}

/// Shape posts into response views, batch-loading whatever the inline flags
/// ask for.
async fn build_post_views(
    state: &AppState,
    posts: Vec<Post>,
    inline_comments: bool,
    inline_author: bool,
) -> AppResult<Vec<PostView>> {
    let comments_by_post: HashMap<Uuid, Vec<Comment>> = if inline_comments {
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in comment_service::list_for_posts(&state.db, &post_ids)? {
            grouped.entry(comment.post_id).or_default().push(comment);
        }
        grouped
    } else {
        HashMap::new()
    };

    let authors: HashMap<Uuid, UserProfile> = if inline_author {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        if inline_comments {
            ids.extend(comments_by_post.values().flatten().map(|c| c.author_id));
        }
        ids.sort();
        ids.dedup();
        state.identity.batch_users(&ids).await
    } else {
        HashMap::new()
    };

    let views = posts
        .into_iter()
        .map(|post| {
            let comments = inline_comments.then(|| {
                comments_by_post
                    .get(&post.id)
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|comment| CommentView::new(comment, &authors))
                    .collect::<Vec<CommentView>>()
            });
            let author = authors.get(&post.author_id).cloned();
            PostView { post, author, comments }
        })
        .collect();

    Ok(views)
}
