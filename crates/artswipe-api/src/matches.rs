use axum::{Extension, Json, extract::State, response::IntoResponse};

use artswipe_db::models::MatchRow;
use artswipe_types::api::{Claims, MatchResponse};
use artswipe_types::models::Match;

use crate::error::{ApiError, blocking};
use crate::state::{AppState, row_id, row_timestamp};

/// GET /matches: the caller's matches, newest first.
pub async fn list_matches(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let uid = claims.sub.to_string();
    let rows = blocking(move || db.get_matches_for_user(&uid)).await?;

    let matches = rows
        .into_iter()
        .map(|row| {
            Ok(MatchResponse {
                match_id: row_id(&row.match_id)?,
                user_id: row_id(&row.partner_id)?,
                icon_url: state.icon_url(row.partner_icon_path.as_deref()),
                work_image_url: state.public_url(&row.work_image_path),
                username: row.partner_username,
                work_title: row.work_title,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Json(matches))
}

pub(crate) fn match_from_row(row: &MatchRow) -> Result<Match, ApiError> {
    Ok(Match {
        id: row_id(&row.id)?,
        user1_id: row_id(&row.user1_id)?,
        work1_id: row_id(&row.work1_id)?,
        user2_id: row_id(&row.user2_id)?,
        work2_id: row_id(&row.work2_id)?,
        created_at: row_timestamp(&row.created_at),
    })
}
