use axum::{Extension, Json, extract::State, response::IntoResponse};

use artswipe_types::api::{Claims, MessageResponse, SwipeRequest};

use crate::error::{ApiError, blocking};
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /swipes: records the caller's like/dislike on a work.
///
/// The match check for a like runs on the match queue after the response is
/// sent; its outcome is never reported here.
pub async fn swipe(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<SwipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let from = claims.sub;
    let to_work = req.to_work_id;
    let is_like = req.is_like;

    let recorder = state.recorder.clone();
    let outcome = blocking(move || recorder.record_swipe(from, to_work, is_like)).await?;

    if outcome.is_rejected() {
        return Err(ApiError::bad_request(
            "swipe failed: work does not exist or is your own",
        ));
    }

    if outcome.should_check_match() {
        state.match_queue.enqueue(from, to_work);
    }

    Ok(Json(MessageResponse::new("swipe saved")))
}
