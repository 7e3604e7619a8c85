use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use buren_shared::errors::{AppError, AppResult, ErrorCode};
use buren_shared::types::auth::{TokenPair, UserRole};
use buren_shared::types::ApiResponse;

use crate::models::{Credential, NewCredential, NewRefreshToken, NewUser, User};
use crate::schema::{credentials, refresh_tokens, users};
use crate::services::{auth_service, token_service};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "house number is required"))]
    pub house_number: String,
    #[validate(length(min = 1, message = "hallway is required"))]
    pub hallway: String,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub tokens: TokenPair,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<RegisterResponse>>> {
    req.validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

    auth_service::validate_password(&req.password)?;

    let password_hash = auth_service::hash_password(&req.password)?;
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    // Check if email already exists
    let exists: bool = credentials::table
        .filter(credentials::email.eq(&req.email.to_lowercase()))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);

    if exists {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists, "email already registered"));
    }

    // Registration always assigns the `user` role; admins are promoted out of band.
    let (user, credential) = conn.transaction::<(User, Credential), diesel::result::Error, _>(|conn| {
        let user: User = diesel::insert_into(users::table)
            .values(&NewUser {
                name: req.name.clone(),
                role: UserRole::User.to_string(),
                house_number: req.house_number.clone(),
                hallway: req.hallway.clone(),
                location: req.location.clone(),
            })
            .get_result(conn)?;

        let credential: Credential = diesel::insert_into(credentials::table)
            .values(&NewCredential {
                email: req.email.to_lowercase(),
                password_hash: password_hash.clone(),
                user_id: user.id,
            })
            .get_result(conn)?;

        Ok((user, credential))
    })?;

    let (token_pair, refresh_hash) = token_service::create_token_pair(
        user.id,
        UserRole::User,
        &state.config.jwt_secret,
        state.config.jwt_access_ttl,
    )?;

    let new_rt = NewRefreshToken {
        credential_id: credential.id,
        token_hash: refresh_hash,
        expires_at: chrono::Utc::now() + chrono::Duration::seconds(state.config.jwt_refresh_ttl),
    };
    diesel::insert_into(refresh_tokens::table)
        .values(&new_rt)
        .execute(&mut conn)?;

    // Publish registration event
    crate::events::publisher::publish_user_registered(
        &state.rabbitmq,
        user.id,
        &credential.email,
        &user.hallway,
        &user.location,
    )
    .await;

    tracing::info!(user_id = %user.id, email = %credential.email, "resident registered");

    Ok(Json(ApiResponse::ok(RegisterResponse { user, tokens: token_pair })))
}
