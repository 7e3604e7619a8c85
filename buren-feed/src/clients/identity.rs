use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use buren_shared::errors::{AppError, AppResult, ErrorCode};

/// Resident profile as served by buren-identity's internal endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub house_number: String,
    pub hallway: String,
    pub location: String,
}

/// HTTP client for buren-identity's service-to-service endpoints.
#[derive(Clone)]
pub struct IdentityClient {
    base_url: String,
    http: reqwest::Client,
}

impl IdentityClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch one resident profile. A missing resident is an error: the feed
    /// cannot scope or attribute anything without the viewer's profile.
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let url = format!("{}/internal/users/{}", self.base_url, user_id);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                AppError::new(
                    ErrorCode::ServiceUnavailable,
                    format!("identity service unreachable: {e}"),
                )
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::new(ErrorCode::UserNotFound, "resident not found"));
        }
        if !resp.status().is_success() {
            return Err(AppError::internal(format!(
                "identity service returned {}",
                resp.status()
            )));
        }

        resp.json::<UserProfile>()
            .await
            .map_err(|e| AppError::internal(format!("invalid identity response: {e}")))
    }

    /// Batch profile lookup for response inlining. Failures degrade to an
    /// empty map: inlining is display-only and must not fail the request.
    pub async fn batch_users(&self, user_ids: &[Uuid]) -> HashMap<Uuid, UserProfile> {
        if user_ids.is_empty() {
            return HashMap::new();
        }

        let url = format!("{}/internal/users/batch", self.base_url);
        match self
            .http
            .post(&url)
            .json(&serde_json::json!({ "user_ids": user_ids }))
            .send()
            .await
        {
            Ok(resp) => match resp.json::<Vec<UserProfile>>().await {
                Ok(profiles) => profiles.into_iter().map(|p| (p.id, p)).collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to decode batch profiles");
                    HashMap::new()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch profiles from buren-identity");
                HashMap::new()
            }
        }
    }
}
