use diesel::prelude::*;
use uuid::Uuid;

use buren_shared::clients::db::DbPool;
use buren_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Comment, NewComment};
use crate::schema::comments;

pub fn get_comment(pool: &DbPool, comment_id: Uuid) -> AppResult<Comment> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    comments::table
        .find(comment_id)
        .filter(comments::deleted.eq(false))
        .first::<Comment>(&mut conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                AppError::new(ErrorCode::CommentNotFound, "comment not found")
            }
            other => AppError::Database(other),
        })
}

/// List a post's comments in arrival order, paginated.
pub fn list_for_post(
    pool: &DbPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<Comment>, i64)> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    let total: i64 = comments::table
        .filter(comments::post_id.eq(post_id))
        .filter(comments::deleted.eq(false))
        .count()
        .get_result(&mut conn)?;

    let items = comments::table
        .filter(comments::post_id.eq(post_id))
        .filter(comments::deleted.eq(false))
        .order(comments::created_at.asc())
        .limit(limit)
        .offset(offset)
        .load::<Comment>(&mut conn)?;

    Ok((items, total))
}

/// Comments for a set of posts, in arrival order. Used when inlining
/// comments into feed responses.
pub fn list_for_posts(pool: &DbPool, post_ids: &[Uuid]) -> AppResult<Vec<Comment>> {
    if post_ids.is_empty() {
        return Ok(vec![]);
    }

    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    Ok(comments::table
        .filter(comments::post_id.eq_any(post_ids))
        .filter(comments::deleted.eq(false))
        .order(comments::created_at.asc())
        .load::<Comment>(&mut conn)?)
}

/// Fetch comments by id, for inlining into post and notification responses.
pub fn get_by_ids(pool: &DbPool, comment_ids: &[Uuid]) -> AppResult<Vec<Comment>> {
    if comment_ids.is_empty() {
        return Ok(vec![]);
    }

    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    Ok(comments::table
        .filter(comments::id.eq_any(comment_ids))
        .filter(comments::deleted.eq(false))
        .load::<Comment>(&mut conn)?)
}

pub fn create_comment(pool: &DbPool, new_comment: NewComment) -> AppResult<Comment> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    let comment = diesel::insert_into(comments::table)
        .values(&new_comment)
        .get_result::<Comment>(&mut conn)?;

    tracing::debug!(
        comment_id = %comment.id,
        post_id = %comment.post_id,
        author_id = %comment.author_id,
        "comment created"
    );

    Ok(comment)
}
