use std::str::FromStr;

use anyhow::{Context, Result};
use artswipe_db::Database;
use artswipe_types::ids::IdError;
use artswipe_types::{MatchId, SwipeId, UserId, WorkId};

use crate::pair::MatchPair;

/// The relational operations swipe recording and match detection need.
///
/// Every mutation is a single statement whose conflict handling lives in the
/// store, so implementations must give `upsert_swipe` last-write-wins
/// semantics on `(from, to_work)` and `insert_match_if_absent`
/// create-if-absent semantics on `(user1, user2)`.
pub trait SwipeStore: Send + Sync {
    /// Upserts the swipe unless the work is missing or owned by `from`.
    /// Returns rows affected.
    fn upsert_swipe(&self, from: UserId, to_work: WorkId, is_like: bool) -> Result<usize>;

    fn work_owner(&self, work: WorkId) -> Result<Option<UserId>>;

    /// Current preference of `from` toward `to_work`, if any.
    fn swipe_preference(&self, from: UserId, to_work: WorkId) -> Result<Option<bool>>;

    /// A work owned by `owner` that `from` currently likes.
    fn find_like_toward(&self, from: UserId, owner: UserId) -> Result<Option<WorkId>>;

    /// Returns the new match id, or `None` when the pair already matched.
    fn insert_match_if_absent(&self, pair: &MatchPair) -> Result<Option<MatchId>>;
}

impl SwipeStore for Database {
    fn upsert_swipe(&self, from: UserId, to_work: WorkId, is_like: bool) -> Result<usize> {
        Database::upsert_swipe(
            self,
            &SwipeId::new().to_string(),
            &from.to_string(),
            &to_work.to_string(),
            is_like,
        )
    }

    fn work_owner(&self, work: WorkId) -> Result<Option<UserId>> {
        self.get_work_owner(&work.to_string())?
            .map(|owner| parse_id(&owner, "works.user_id"))
            .transpose()
    }

    fn swipe_preference(&self, from: UserId, to_work: WorkId) -> Result<Option<bool>> {
        Ok(self
            .get_swipe(&from.to_string(), &to_work.to_string())?
            .map(|swipe| swipe.is_like))
    }

    fn find_like_toward(&self, from: UserId, owner: UserId) -> Result<Option<WorkId>> {
        Database::find_like_toward(self, &from.to_string(), &owner.to_string())?
            .map(|work| parse_id(&work, "swipes.to_work_id"))
            .transpose()
    }

    fn insert_match_if_absent(&self, pair: &MatchPair) -> Result<Option<MatchId>> {
        let id = MatchId::new();
        let inserted = Database::insert_match_if_absent(
            self,
            &id.to_string(),
            &pair.user1.to_string(),
            &pair.work1.to_string(),
            &pair.user2.to_string(),
            &pair.work2.to_string(),
        )?;
        Ok(inserted.then_some(id))
    }
}

fn parse_id<T>(value: &str, column: &str) -> Result<T>
where
    T: FromStr<Err = IdError>,
{
    value
        .parse()
        .with_context(|| format!("Corrupt id '{}' in {}", value, column))
}
