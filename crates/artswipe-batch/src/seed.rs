//! Dummy data for local development.
//!
//! Every seeder can be re-run: users, works, matches and reviews are all
//! conflict-ignoring inserts.

use std::sync::Arc;

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use artswipe_db::Database;
use artswipe_matching::{MatchDetector, MatchOutcome, SwipeRecorder};
use artswipe_types::{ReviewId, UserId, WorkId};

const TITLES: &[(&str, &str)] = &[
    ("Sunset Landscape", "A beautiful sunset over the mountains."),
    ("Cute Cat", "A sketch of a cute cat playing."),
    ("City Night", "Night view of a bustling city."),
    ("Mountain Hike", "Photo from my last hiking trip."),
    ("Quiet Harbour", "Boats resting in the morning fog."),
];

const COMMENTS: &[&str] = &[
    "I really liked this illustration.",
    "The overall mood is lovely.",
    "You can tell how carefully this was drawn.",
    "Very pleasant to look at.",
    "Feels really polished.",
    "A memorable piece.",
    "The composition is well balanced.",
    "Great attention to detail.",
    "Consistent and easy on the eyes.",
    "Beautifully finished overall.",
];

pub struct Seeder {
    db: Arc<Database>,
    recorder: SwipeRecorder,
    detector: MatchDetector,
    count: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub created: usize,
    pub existing: usize,
    pub skipped: usize,
}

impl Seeder {
    pub fn new(db: Arc<Database>, count: usize) -> Self {
        Self {
            recorder: SwipeRecorder::new(db.clone()),
            detector: MatchDetector::new(db.clone()),
            db,
            count,
        }
    }

    fn email(n: usize) -> String {
        format!("user_{n:03}@example.com")
    }

    /// Creates `user_001 ..` with a password of `password{n}` and an icon path.
    pub fn seed_users(&self) -> Result<usize> {
        let mut created = 0;

        for n in 1..=self.count {
            let email = Self::email(n);
            let id = match self.db.get_user_by_email(&email)? {
                Some(existing) => existing.id,
                None => {
                    let id = UserId::new().to_string();
                    let hash = artswipe_api::auth::hash_password(&format!("password{n}"))?;
                    let name = format!("user_{n:03}");
                    if self.db.create_user(&id, &name, &email, &hash)? {
                        created += 1;
                    }
                    id
                }
            };

            let icon_path = format!("icons/{id}/user_{n:03}.png");
            let bio = format!("Hello, I'm user {n}!");
            self.db.update_profile(&id, Some(&bio), Some(&icon_path))?;
            debug!("Seeded user {} ({})", email, id);
        }

        info!("Users: {} created, {} total", created, self.count);
        Ok(created)
    }

    /// One work per seeded user.
    pub fn seed_works(&self) -> Result<usize> {
        let mut created = 0;

        for n in 1..=self.count {
            let email = Self::email(n);
            let Some(user) = self.db.get_user_by_email(&email)? else {
                warn!("No user {}, skipping work", email);
                continue;
            };

            let (title, description) = TITLES[(n - 1) % TITLES.len()];
            let image_path = format!("works/{}/user_{n:03}.png", user.id);
            let inserted = self.db.create_work(
                &WorkId::new().to_string(),
                &user.id,
                &image_path,
                title,
                Some(description),
            )?;
            if inserted {
                created += 1;
            }
        }

        info!("Works: {} created", created);
        Ok(created)
    }

    /// Pairs every user with the next two (wrapping) through mutual likes.
    pub fn seed_matches(&self) -> Result<MatchReport> {
        let mut report = MatchReport::default();
        if self.count < 2 {
            return Ok(report);
        }

        for i in 1..=self.count {
            for offset in [1, 2] {
                let j = (i - 1 + offset) % self.count + 1;
                if j == i {
                    continue;
                }

                let (Some(a), Some(b)) = (self.user_and_work(i)?, self.user_and_work(j)?) else {
                    report.skipped += 1;
                    continue;
                };

                match self.mutual_like(a, b)? {
                    MatchOutcome::Created(_) => report.created += 1,
                    MatchOutcome::AlreadyMatched => report.existing += 1,
                    outcome => {
                        warn!("Seeding {} <-> {} did not match: {:?}", i, j, outcome);
                        report.skipped += 1;
                    }
                }
            }
        }

        info!(
            "Matches: {} created, {} already present, {} skipped",
            report.created, report.existing, report.skipped
        );
        Ok(report)
    }

    fn user_and_work(&self, n: usize) -> Result<Option<(UserId, WorkId)>> {
        let Some(user) = self.db.get_user_by_email(&Self::email(n))? else {
            return Ok(None);
        };
        let Some(work) = self.db.get_works_by_user(&user.id)?.into_iter().next() else {
            return Ok(None);
        };

        let user_id = user.id.parse().context("invalid user id in store")?;
        let work_id = work.id.parse().context("invalid work id in store")?;
        Ok(Some((user_id, work_id)))
    }

    /// Same order as two real clients: like, check, reverse like, check.
    fn mutual_like(
        &self,
        (a, wa): (UserId, WorkId),
        (b, wb): (UserId, WorkId),
    ) -> Result<MatchOutcome> {
        self.recorder.record_swipe(a, wb, true)?;
        let first = self.detector.try_match(a, wb)?;
        self.recorder.record_swipe(b, wa, true)?;
        let second = self.detector.try_match(b, wa)?;

        Ok(match (first, second) {
            (MatchOutcome::Created(id), _) | (_, MatchOutcome::Created(id)) => {
                MatchOutcome::Created(id)
            }
            (_, outcome) => outcome,
        })
    }

    /// user1 reviews user2 on every match; user2 answers on every other one.
    pub fn seed_reviews(&self) -> Result<usize> {
        let mut rng = rand::rng();
        let mut created = 0;

        for (i, m) in self.db.get_all_matches()?.into_iter().enumerate() {
            let comment = COMMENTS.choose(&mut rng).copied().unwrap_or_default();
            if self.db.insert_review(
                &ReviewId::new().to_string(),
                &m.id,
                &m.user1_id,
                &m.user2_id,
                &m.work2_id,
                comment,
            )? {
                created += 1;
            }

            if i % 2 == 1 {
                let comment = COMMENTS.choose(&mut rng).copied().unwrap_or_default();
                if self.db.insert_review(
                    &ReviewId::new().to_string(),
                    &m.id,
                    &m.user2_id,
                    &m.user1_id,
                    &m.work1_id,
                    comment,
                )? {
                    created += 1;
                }
            }
        }

        info!("Reviews: {} created", created);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeder(count: usize) -> Seeder {
        Seeder::new(Arc::new(Database::open_in_memory().unwrap()), count)
    }

    #[test]
    fn users_and_works_are_idempotent() {
        let s = seeder(3);
        assert_eq!(s.seed_users().unwrap(), 3);
        assert_eq!(s.seed_users().unwrap(), 0);
        assert_eq!(s.seed_works().unwrap(), 3);
        assert_eq!(s.seed_works().unwrap(), 0);

        let user = s.db.get_user_by_email("user_002@example.com").unwrap().unwrap();
        assert_eq!(user.username, "user_002");
        assert_eq!(
            user.icon_path.as_deref(),
            Some(format!("icons/{}/user_002.png", user.id).as_str())
        );
        assert_eq!(s.db.get_works_by_user(&user.id).unwrap().len(), 1);
    }

    #[test]
    fn matches_pair_neighbours() {
        let s = seeder(4);
        s.seed_users().unwrap();
        s.seed_works().unwrap();

        // 1-2 1-3 2-3 2-4 3-4 3-1(dup) 4-1 4-2(dup)
        let report = s.seed_matches().unwrap();
        assert_eq!(report.created, 6);
        assert_eq!(report.existing, 2);
        assert_eq!(s.db.get_all_matches().unwrap().len(), 6);

        let again = s.seed_matches().unwrap();
        assert_eq!(again.created, 0);
        assert_eq!(s.db.get_all_matches().unwrap().len(), 6);
    }

    #[test]
    fn matches_without_works_are_skipped() {
        let s = seeder(3);
        s.seed_users().unwrap();

        let report = s.seed_matches().unwrap();
        assert_eq!(report.created, 0);
        assert!(report.skipped > 0);
    }

    #[test]
    fn reviews_skip_every_other_reply() {
        let s = seeder(4);
        s.seed_users().unwrap();
        s.seed_works().unwrap();
        s.seed_matches().unwrap();

        // 6 matches: 6 first reviews + 3 replies
        assert_eq!(s.seed_reviews().unwrap(), 9);
        assert_eq!(s.seed_reviews().unwrap(), 0);
    }
}
