/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Signup
/// - Login
/// - Profile fetch
///
/// # Endpoints
///
/// - `POST /auth/signup` - Register new user
/// - `POST /auth/login` - Login and get a session token
/// - `GET /auth/fetch` - Current user's profile (authenticated)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipsy_shared::{
    auth::service::{SignedToken, UserIdentity},
    models::user::Profile,
};
use uuid::Uuid;

/// Signup and login request
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation errors rather than body rejections.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Login name
    #[serde(default)]
    pub username: String,

    /// Plaintext password
    #[serde(default)]
    pub password: String,
}

/// Signup response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// User ID
    pub id: Uuid,

    /// Registered username
    pub username: String,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/signup
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "pw1"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": "uuid",
///   "username": "alice",
///   "createdAt": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Username already exists
/// - `422 Unprocessable Entity`: Empty username or password
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let Json(req) = payload?;
    let user = state.auth.signup(&req.username, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }),
    ))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "pw1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "expiresAt": "2025-01-02T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<SignedToken>> {
    let Json(req) = payload?;
    let session = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(session))
}

/// Returns the authenticated caller's profile
///
/// # Response
///
/// ```json
/// { "username": "alice" }
/// ```
pub async fn fetch_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Profile>> {
    let profile = state.auth.fetch_profile(&identity).await?;
    Ok(Json(profile))
}
