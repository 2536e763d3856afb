use std::sync::Arc;

use anyhow::Result;
use artswipe_types::{MatchId, UserId, WorkId};
use tracing::{debug, error, info};

use crate::pair::MatchPair;
use crate::store::SwipeStore;

/// What a single match check concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The liked work no longer resolves to an owner.
    WorkNotFound,
    /// The swiper's current preference toward the work is not a like.
    NotLiked,
    /// The owner has not liked any of the swiper's works.
    NoReciprocal,
    Created(MatchId),
    /// The pair was already matched; nothing was written.
    AlreadyMatched,
}

/// Turns mutual likes into matches.
///
/// Safe to call any number of times, from either side, concurrently or long
/// after the swipe that prompted it: the pair is normalised before the
/// create-if-absent insert, so at most one match exists per user pair.
#[derive(Clone)]
pub struct MatchDetector {
    store: Arc<dyn SwipeStore>,
}

impl MatchDetector {
    pub fn new(store: Arc<dyn SwipeStore>) -> Self {
        Self { store }
    }

    /// Best-effort check after `from` liked `to_work`. Never fails the
    /// caller: store errors are logged and dropped.
    pub fn check_and_create_match(&self, from: UserId, to_work: WorkId) {
        match self.try_match(from, to_work) {
            Ok(MatchOutcome::Created(id)) => {
                info!("Match {} created after {} liked {}", id, from, to_work);
            }
            Ok(outcome) => {
                debug!("No new match for {} -> {}: {:?}", from, to_work, outcome);
            }
            Err(e) => {
                error!("Match check failed for {} -> {}: {:#}", from, to_work, e);
            }
        }
    }

    pub fn try_match(&self, from: UserId, to_work: WorkId) -> Result<MatchOutcome> {
        let Some(owner) = self.store.work_owner(to_work)? else {
            return Ok(MatchOutcome::WorkNotFound);
        };

        // A stale or duplicated trigger must not match on a like that was
        // since replaced by a dislike.
        if self.store.swipe_preference(from, to_work)? != Some(true) {
            return Ok(MatchOutcome::NotLiked);
        }

        let Some(other_work) = self.store.find_like_toward(owner, from)? else {
            return Ok(MatchOutcome::NoReciprocal);
        };

        let pair = MatchPair::canonical(from, to_work, owner, other_work);
        Ok(match self.store.insert_match_if_absent(&pair)? {
            Some(id) => MatchOutcome::Created(id),
            None => MatchOutcome::AlreadyMatched,
        })
    }
}
