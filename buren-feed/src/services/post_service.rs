use diesel::dsl::array_append;
use diesel::prelude::*;
use uuid::Uuid;

use buren_shared::clients::db::DbPool;
use buren_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewPost, Post};
use crate::schema::posts;

/// Load the feed candidate set for one location, newest first. The ranker
/// reorders this per viewer.
pub fn list_posts(
    pool: &DbPool,
    location: &str,
    categories: Option<&[String]>,
) -> AppResult<Vec<Post>> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    let mut query = posts::table
        .filter(posts::deleted.eq(false))
        .filter(posts::location.eq(location))
        .order(posts::created_at.desc())
        .into_boxed();

    if let Some(categories) = categories {
        query = query.filter(posts::category.eq_any(categories));
    }

    Ok(query.load::<Post>(&mut conn)?)
}

pub fn get_post(pool: &DbPool, post_id: Uuid) -> AppResult<Post> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    posts::table
        .find(post_id)
        .filter(posts::deleted.eq(false))
        .first::<Post>(&mut conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                AppError::new(ErrorCode::PostNotFound, "post not found")
            }
            other => AppError::Database(other),
        })
}

pub fn create_post(pool: &DbPool, new_post: NewPost) -> AppResult<Post> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    let post = diesel::insert_into(posts::table)
        .values(&new_post)
        .get_result::<Post>(&mut conn)?;

    tracing::debug!(
        post_id = %post.id,
        author_id = %post.author_id,
        location = %post.location,
        "post created"
    );

    Ok(post)
}

/// Append a comment id to the post's comment list. The list only ever grows,
/// and `array_append` keeps concurrent appends from clobbering each other.
pub fn append_comment(pool: &DbPool, post_id: Uuid, comment_id: Uuid) -> AppResult<Post> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!(error = %e, "failed to get db connection");
        AppError::internal("database connection error")
    })?;

    diesel::update(posts::table.find(post_id))
        .set(posts::comment_ids.eq(array_append(posts::comment_ids, comment_id)))
        .get_result::<Post>(&mut conn)
        .map_err(|e| match e {
            // The post was just read; losing it mid-request is a consistency
            // violation, not a client error.
            diesel::result::Error::NotFound => {
                AppError::internal("post disappeared during comment creation")
            }
            other => AppError::Database(other),
        })
}
