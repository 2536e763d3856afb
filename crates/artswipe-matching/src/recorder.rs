use std::sync::Arc;

use anyhow::Result;
use artswipe_types::{UserId, WorkId};
use tracing::debug;

use crate::store::SwipeStore;

/// Result of recording one swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeOutcome {
    /// Rows written. Zero means the target was missing or owned by the swiper.
    pub affected: usize,
    pub is_like: bool,
}

impl SwipeOutcome {
    pub fn is_rejected(&self) -> bool {
        self.affected == 0
    }

    /// A match check is only meaningful after a like was actually persisted.
    pub fn should_check_match(&self) -> bool {
        self.affected > 0 && self.is_like
    }
}

/// Persists a user's latest preference toward a work.
#[derive(Clone)]
pub struct SwipeRecorder {
    store: Arc<dyn SwipeStore>,
}

impl SwipeRecorder {
    pub fn new(store: Arc<dyn SwipeStore>) -> Self {
        Self { store }
    }

    /// Upserts the swipe keyed by `(from, to_work)`.
    ///
    /// Swiping your own work or a work that does not exist writes nothing and
    /// reports `affected == 0`; store failures are returned as errors.
    pub fn record_swipe(
        &self,
        from: UserId,
        to_work: WorkId,
        is_like: bool,
    ) -> Result<SwipeOutcome> {
        let affected = self.store.upsert_swipe(from, to_work, is_like)?;
        let outcome = SwipeOutcome { affected, is_like };

        if outcome.is_rejected() {
            debug!("Swipe rejected: {} -> {} (invalid or self-owned work)", from, to_work);
        } else {
            debug!("Swipe recorded: {} -> {} like={}", from, to_work, is_like);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{db, user, work};

    #[test]
    fn own_work_is_rejected() {
        let db = db();
        let recorder = SwipeRecorder::new(db.clone());
        let alice = user(&db, "alice");
        let wa = work(&db, alice, "works/a.png");

        for is_like in [true, false] {
            let outcome = recorder.record_swipe(alice, wa, is_like).unwrap();
            assert!(outcome.is_rejected());
            assert!(!outcome.should_check_match());
        }
        assert!(
            db.get_swipe(&alice.to_string(), &wa.to_string())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn missing_work_is_rejected() {
        let db = db();
        let recorder = SwipeRecorder::new(db.clone());
        let alice = user(&db, "alice");

        let outcome = recorder.record_swipe(alice, WorkId::new(), true).unwrap();
        assert_eq!(outcome.affected, 0);
    }

    #[test]
    fn latest_swipe_wins() {
        let db = db();
        let recorder = SwipeRecorder::new(db.clone());
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        let wb = work(&db, bob, "works/b.png");

        assert!(recorder.record_swipe(alice, wb, true).unwrap().should_check_match());

        let outcome = recorder.record_swipe(alice, wb, false).unwrap();
        assert_eq!(outcome.affected, 1);
        assert!(!outcome.should_check_match());

        let swipe = db
            .get_swipe(&alice.to_string(), &wb.to_string())
            .unwrap()
            .unwrap();
        assert!(!swipe.is_like);
        assert_eq!(swipe.to_work_user_id, bob.to_string());
    }

    #[test]
    fn repeated_like_keeps_one_row() {
        let db = db();
        let recorder = SwipeRecorder::new(db.clone());
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        let wb = work(&db, bob, "works/b.png");

        recorder.record_swipe(alice, wb, true).unwrap();
        recorder.record_swipe(alice, wb, true).unwrap();

        let rows: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM swipes WHERE from_user_id = ?1 AND to_work_id = ?2",
                    [alice.to_string(), wb.to_string()],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }
}
