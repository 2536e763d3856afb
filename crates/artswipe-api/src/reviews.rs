use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use artswipe_types::ReviewId;
use artswipe_types::api::{
    Claims, CreateReviewRequest, MessageResponse, ReceivedReviewResponse,
};

use crate::error::{ApiError, blocking};
use crate::extract::ApiJson;
use crate::matches::match_from_row;
use crate::state::{AppState, row_id, row_timestamp};

/// POST /reviews: one review per participant per match.
///
/// The review is addressed to the partner and refers to the reviewer's work
/// that the partner liked.
pub async fn create_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = req.comment.trim().to_string();
    if comment.is_empty() {
        return Err(ApiError::bad_request("comment is required"));
    }

    let db = state.db.clone();
    let mid = req.match_id.to_string();
    let row = blocking(move || db.get_match(&mid))
        .await?
        .ok_or_else(|| ApiError::bad_request("invalid match_id"))?;
    let matched = match_from_row(&row)?;

    let (to_user, work) = matched
        .partner_of(claims.sub)
        .ok_or_else(|| ApiError::Forbidden("user not in this match".into()))?;

    let db = state.db.clone();
    let (rid, mid, from, to, wid) = (
        ReviewId::new().to_string(),
        matched.id.to_string(),
        claims.sub.to_string(),
        to_user.to_string(),
        work.to_string(),
    );
    let inserted =
        blocking(move || db.insert_review(&rid, &mid, &from, &to, &wid, &comment)).await?;

    if !inserted {
        return Err(ApiError::Conflict("already reviewed".into()));
    }

    Ok((StatusCode::CREATED, Json(MessageResponse::new("review created"))))
}

/// GET /reviews/received
pub async fn received_reviews(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let uid = claims.sub.to_string();
    let rows = blocking(move || db.get_received_reviews(&uid)).await?;

    let reviews = rows
        .into_iter()
        .map(|row| {
            Ok(ReceivedReviewResponse {
                review_id: row_id(&row.id)?,
                match_id: row_id(&row.match_id)?,
                user_id: row_id(&row.from_user_id)?,
                work_id: row_id(&row.work_id)?,
                icon_url: state.icon_url(row.from_icon_path.as_deref()),
                work_image_url: state.public_url(&row.work_image_path),
                created_at: row_timestamp(&row.created_at),
                username: row.from_username,
                comment: row.comment,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Json(reviews))
}
