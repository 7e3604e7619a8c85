use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use buren_shared::errors::{AppError, AppResult, ErrorCode};
use buren_shared::types::auth::AuthUser;
use buren_shared::types::pagination::{Paginated, PaginationParams};
use buren_shared::types::ApiResponse;

use crate::models::User;
use crate::schema::users;
use crate::AppState;

/// GET /users
/// The resident directory, paginated.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<User>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let total: i64 = users::table
        .filter(users::deleted.eq(false))
        .count()
        .get_result(&mut conn)?;

    let items = users::table
        .filter(users::deleted.eq(false))
        .order(users::name.asc())
        .limit(params.limit() as i64)
        .offset(params.offset() as i64)
        .load::<User>(&mut conn)?;

    let paginated = Paginated::new(items, total as u64, &params);
    Ok(Json(ApiResponse::ok(paginated)))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user = users::table
        .find(id)
        .filter(users::deleted.eq(false))
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "resident not found"))?;

    Ok(Json(ApiResponse::ok(user)))
}
