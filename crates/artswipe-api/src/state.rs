use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use artswipe_db::Database;
use artswipe_matching::{MatchQueue, SwipeRecorder};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::ApiError;

/// Object-storage path served when a user has no icon.
pub const DEFAULT_ICON_PATH: &str = "icons/default.png";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub recorder: SwipeRecorder,
    pub match_queue: MatchQueue,
    pub jwt_secret: String,
    /// Base URL of the object storage, without trailing slash.
    pub storage_public_url: String,
}

impl AppStateInner {
    pub fn new(
        db: Arc<Database>,
        match_queue: MatchQueue,
        jwt_secret: String,
        storage_public_url: String,
    ) -> AppState {
        Arc::new(Self {
            recorder: SwipeRecorder::new(db.clone()),
            db,
            match_queue,
            jwt_secret,
            storage_public_url: storage_public_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}",
            self.storage_public_url,
            path.trim_start_matches('/')
        )
    }

    pub fn icon_url(&self, icon_path: Option<&str>) -> String {
        self.public_url(icon_path.unwrap_or(DEFAULT_ICON_PATH))
    }
}

/// Parses an id column; a malformed id is a server-side fault.
pub(crate) fn row_id<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Corrupt id '{}' in database", value))
        .map_err(ApiError::from)
}

pub(crate) fn row_timestamp(value: &str) -> DateTime<Utc> {
    artswipe_db::parse_timestamp(value).unwrap_or_else(|| {
        warn!("Corrupt timestamp '{}' in database", value);
        DateTime::default()
    })
}
