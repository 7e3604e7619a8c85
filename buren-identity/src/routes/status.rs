use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use buren_shared::errors::{AppError, AppResult};
use buren_shared::middleware::OptionalAuthUser;
use buren_shared::types::ApiResponse;

use crate::models::User;
use crate::schema::users;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub logged_in: bool,
    pub user: Option<User>,
}

/// GET /status
/// Reports whether the caller presented a valid token, and for whom.
pub async fn status(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<StatusResponse>>> {
    let user = match auth {
        Some(auth_user) => {
            let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
            users::table
                .find(auth_user.id)
                .filter(users::deleted.eq(false))
                .first::<User>(&mut conn)
                .optional()?
        }
        None => None,
    };

    Ok(Json(ApiResponse::ok(StatusResponse {
        logged_in: user.is_some(),
        user,
    })))
}
