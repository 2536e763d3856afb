use serde::{Deserialize, Serialize};

use crate::ids::{MatchId, ReviewId, UserId, WorkId};

// -- JWT Claims --

/// JWT claims issued at signup/login and checked by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub user_id: UserId,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub username: String,
    pub icon_url: String,
    pub token: String,
}

// -- Profile --

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    /// Object-storage path of an already uploaded icon.
    pub icon_path: Option<String>,
}

// -- Works --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWorkRequest {
    pub title: String,
    /// Object-storage path of an already uploaded image.
    pub image_path: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWorkResponse {
    pub id: WorkId,
}

/// A work in the swipe feed, with its author.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedWorkResponse {
    pub id: WorkId,
    pub user_id: UserId,
    pub username: String,
    pub icon_url: String,
    pub image_url: String,
    pub title: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyWorkResponse {
    pub id: WorkId,
    pub image_url: String,
    pub title: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// -- Swipes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwipeRequest {
    pub to_work_id: WorkId,
    pub is_like: bool,
}

// -- Matches --

/// One match as seen by the requesting user. The work is the requester's own
/// work that the partner liked.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub match_id: MatchId,
    pub user_id: UserId,
    pub username: String,
    pub icon_url: String,
    pub work_image_url: String,
    pub work_title: String,
}

// -- Reviews --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReviewRequest {
    pub match_id: MatchId,
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceivedReviewResponse {
    pub review_id: ReviewId,
    pub match_id: MatchId,
    pub user_id: UserId,
    pub username: String,
    pub icon_url: String,
    pub work_id: WorkId,
    pub work_image_url: String,
    pub comment: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
