use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::warn;

use artswipe_types::WorkId;
use artswipe_types::api::{
    Claims, CreateWorkRequest, CreateWorkResponse, FeedWorkResponse, MyWorkResponse,
};

use crate::error::{ApiError, blocking};
use crate::extract::ApiJson;
use crate::profile::non_blank;
use crate::state::{AppState, row_id, row_timestamp};

/// Works served per feed request.
const FEED_PAGE_SIZE: u32 = 10;

/// POST /works: registers a work whose image is already in object storage.
pub async fn create_work(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<CreateWorkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = req.title.trim().to_string();
    let image_path = req.image_path.trim().to_string();
    if title.is_empty() || image_path.is_empty() {
        return Err(ApiError::bad_request("title and image_path are required"));
    }
    let description = non_blank(req.description);

    let work_id = WorkId::new();
    let db = state.db.clone();
    let (wid, uid) = (work_id.to_string(), claims.sub.to_string());
    let inserted = blocking(move || {
        db.create_work(&wid, &uid, &image_path, &title, description.as_deref())
    })
    .await?;

    if !inserted {
        return Err(ApiError::Conflict("a work with this image already exists".into()));
    }

    Ok((StatusCode::CREATED, Json(CreateWorkResponse { id: work_id })))
}

/// GET /works: next page of the caller's swipe feed.
///
/// Serving a page moves the caller's progress marker to the newest work in
/// it; failing to store the marker is logged and the page is still served.
pub async fn feed(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let uid = claims.sub.to_string();

    let rows = blocking(move || {
        let rows = db.get_feed(&uid, FEED_PAGE_SIZE)?;

        if let Some(newest) = rows.iter().map(|r| r.work.created_at.as_str()).max() {
            if let Err(e) = db.set_last_viewed(&uid, newest) {
                warn!("Failed to update feed progress for {}: {:#}", uid, e);
            }
        }

        Ok(rows)
    })
    .await?;

    let works = rows
        .into_iter()
        .map(|row| {
            Ok(FeedWorkResponse {
                id: row_id(&row.work.id)?,
                user_id: row_id(&row.work.user_id)?,
                icon_url: state.icon_url(row.icon_path.as_deref()),
                image_url: state.public_url(&row.work.image_path),
                created_at: row_timestamp(&row.work.created_at),
                username: row.username,
                title: row.work.title,
                description: row.work.description.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Json(works))
}

/// GET /me/works
pub async fn my_works(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let uid = claims.sub.to_string();
    let rows = blocking(move || db.get_works_by_user(&uid)).await?;

    let works = rows
        .into_iter()
        .map(|row| {
            Ok(MyWorkResponse {
                id: row_id(&row.id)?,
                image_url: state.public_url(&row.image_path),
                created_at: row_timestamp(&row.created_at),
                title: row.title,
                description: row.description.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Json(works))
}
