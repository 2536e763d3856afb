pub mod api;
pub mod ids;
pub mod models;

pub use ids::{MatchId, ReviewId, SwipeId, UserId, WorkId};
