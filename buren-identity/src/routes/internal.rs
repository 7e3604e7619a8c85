use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use buren_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::User;
use crate::schema::users;
use crate::AppState;

/// GET /internal/users/:id — resident profile lookup (service-to-service, no auth)
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user = users::table
        .find(id)
        .filter(users::deleted.eq(false))
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "resident not found"))?;

    Ok(Json(user))
}

// --- Batch resident lookup ---

#[derive(Debug, Deserialize)]
pub struct BatchUsersRequest {
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BatchUserEntry {
    pub id: Uuid,
    pub name: String,
    pub house_number: String,
    pub hallway: String,
    pub location: String,
}

/// POST /internal/users/batch — resident profiles for a list of ids (service-to-service, no auth)
pub async fn batch_user_profiles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchUsersRequest>,
) -> Json<Vec<BatchUserEntry>> {
    let mut conn = match state.db.get() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection for batch users");
            return Json(vec![]);
        }
    };

    let found: Vec<User> = users::table
        .filter(users::id.eq_any(&req.user_ids))
        .filter(users::deleted.eq(false))
        .load::<User>(&mut conn)
        .unwrap_or_default();

    let entries = found
        .into_iter()
        .map(|u| BatchUserEntry {
            id: u.id,
            name: u.name,
            house_number: u.house_number,
            hallway: u.hallway,
            location: u.location,
        })
        .collect();

    Json(entries)
}
