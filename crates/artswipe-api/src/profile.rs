use axum::{Extension, Json, extract::State, response::IntoResponse};

use artswipe_types::api::{Claims, MessageResponse, ProfileResponse, UpdateProfileRequest};

use crate::error::{ApiError, blocking};
use crate::extract::ApiJson;
use crate::state::{AppState, row_id};

/// GET /me
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let uid = claims.sub.to_string();
    let user = blocking(move || db.get_user_by_id(&uid))
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(ProfileResponse {
        id: row_id(&user.id)?,
        icon_url: user.icon_path.as_deref().map(|p| state.public_url(p)),
        username: user.username,
        email: user.email,
        bio: user.bio,
    }))
}

/// PUT /me: updates the bio and/or icon path. Blank values count as unset.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let bio = non_blank(req.bio);
    let icon_path = non_blank(req.icon_path);
    if bio.is_none() && icon_path.is_none() {
        return Err(ApiError::bad_request("nothing to update"));
    }

    let db = state.db.clone();
    let uid = claims.sub.to_string();
    let affected =
        blocking(move || db.update_profile(&uid, bio.as_deref(), icon_path.as_deref())).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("user not found".into()));
    }

    Ok(Json(MessageResponse::new("profile updated")))
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
