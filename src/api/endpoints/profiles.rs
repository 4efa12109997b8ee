//! Profile endpoints: self-service details and the admin role table.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::authorization::check_admin;
use crate::db::repository::{
    delete_profile, get_profile, list_profiles, update_profile_details, update_profile_role,
};
use crate::events::{ChangeAction, Collection};
use crate::models::{UserProfile, UserRole};

/// `GET /api/profiles/me` — the caller's own profile.
pub async fn me(
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(user.profile))
}

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub specialty: Option<String>,
    /// Opaque encoded signature blob (data-URI string).
    pub signature: Option<String>,
}

/// `PATCH /api/profiles/me` — update specialty and/or signature.
pub async fn update_me(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<UpdateMeRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let conn = ctx.core.open_db()?;

    let specialty = req.specialty.unwrap_or(user.profile.specialty);
    let signature = req.signature.or(user.profile.signature);
    update_profile_details(&conn, &user.profile.uid, &specialty, signature.as_deref())?;

    let updated = get_profile(&conn, &user.profile.uid)?
        .ok_or_else(|| ApiError::NotFound("profile not found".into()))?;

    ctx.core
        .hub
        .publish(Collection::Profiles, &updated.uid, ChangeAction::Updated);

    Ok(Json(updated))
}

#[derive(Serialize)]
pub struct ProfilesResponse {
    pub profiles: Vec<UserProfile>,
}

/// `GET /api/profiles` — the admin user-role table.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<ProfilesResponse>, ApiError> {
    require_admin(&user)?;

    let conn = ctx.core.open_db()?;
    let profiles = list_profiles(&conn)?;
    Ok(Json(ProfilesResponse { profiles }))
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

/// `PATCH /api/profiles/:uid/role` — admin-only role change.
pub async fn set_role(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Path(uid): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    require_admin(&user)?;

    let conn = ctx.core.open_db()?;
    update_profile_role(&conn, &uid, req.role)?;
    let updated = get_profile(&conn, &uid)?
        .ok_or_else(|| ApiError::NotFound("profile not found".into()))?;

    ctx.core
        .hub
        .publish(Collection::Profiles, &uid, ChangeAction::Updated);

    Ok(Json(updated))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// `DELETE /api/profiles/:uid` — admin-only account removal.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Path(uid): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    require_admin(&user)?;

    let conn = ctx.core.open_db()?;
    delete_profile(&conn, &uid)?;

    ctx.core
        .hub
        .publish(Collection::Profiles, &uid, ChangeAction::Deleted);

    Ok(Json(DeleteResponse { deleted: true }))
}

fn require_admin(user: &AuthedUser) -> Result<(), ApiError> {
    if check_admin(&user.profile).allowed {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied)
    }
}
