//! Registration, login, logout.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::accounts;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::events::{ChangeAction, Collection};
use crate::models::UserProfile;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub profile: UserProfile,
}

/// `POST /api/auth/register` — create an account + profile, sign in.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }

    let conn = ctx.core.open_db()?;
    let session = accounts::create_account(
        &conn,
        &req.name,
        &req.email,
        &req.password,
        ctx.core.admin_emails(),
    )?;

    ctx.core
        .hub
        .publish(Collection::Profiles, &session.profile.uid, ChangeAction::Created);

    Ok(Json(SessionResponse {
        token: session.token,
        profile: session.profile,
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — verify credentials, open a session.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let session = accounts::sign_in(&conn, &req.email, &req.password)?;

    Ok(Json(SessionResponse {
        token: session.token,
        profile: session.profile,
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub signed_out: bool,
}

/// `POST /api/auth/logout` — invalidate the presented token.
pub async fn logout(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let conn = ctx.core.open_db()?;
    accounts::sign_out(&conn, token)?;

    Ok(Json(LogoutResponse { signed_out: true }))
}
