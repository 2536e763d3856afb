//! Database row types. These map directly to SQLite rows.
//! Distinct from artswipe-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub icon_path: Option<String>,
    pub created_at: String,
}

pub struct WorkRow {
    pub id: String,
    pub user_id: String,
    pub image_path: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Feed entry: a work joined with its author.
pub struct FeedWorkRow {
    pub work: WorkRow,
    pub username: String,
    pub icon_path: Option<String>,
}

pub struct SwipeRow {
    pub id: String,
    pub from_user_id: String,
    pub to_work_id: String,
    pub to_work_user_id: String,
    pub is_like: bool,
    pub created_at: String,
}

pub struct MatchRow {
    pub id: String,
    pub user1_id: String,
    pub user2_id: String,
    pub work1_id: String,
    pub work2_id: String,
    pub created_at: String,
}

/// A match from one participant's point of view: the partner and the
/// viewer's work that the partner liked.
pub struct MatchListRow {
    pub match_id: String,
    pub partner_id: String,
    pub partner_username: String,
    pub partner_icon_path: Option<String>,
    pub work_image_path: String,
    pub work_title: String,
}

pub struct ReceivedReviewRow {
    pub id: String,
    pub match_id: String,
    pub from_user_id: String,
    pub from_username: String,
    pub from_icon_path: Option<String>,
    pub work_id: String,
    pub work_image_path: String,
    pub comment: String,
    pub created_at: String,
}
