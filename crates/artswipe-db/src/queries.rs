use crate::Database;
use crate::models::{
    FeedWorkRow, MatchListRow, MatchRow, ReceivedReviewRow, SwipeRow, UserRow, WorkRow,
};
use anyhow::Result;
use rusqlite::{Connection, Row};

impl Database {
    // -- Users --

    /// Returns `false` when the email is already registered.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (email) DO NOTHING",
                (id, username, email, password_hash),
            )?;
            Ok(inserted > 0)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    /// Updates whichever profile fields are `Some`. Returns rows affected.
    pub fn update_profile(
        &self,
        id: &str,
        bio: Option<&str>,
        icon_path: Option<&str>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute(
                "UPDATE users
                 SET bio = COALESCE(?2, bio), icon_path = COALESCE(?3, icon_path)
                 WHERE id = ?1",
                (id, bio, icon_path),
            )?;
            Ok(affected)
        })
    }

    // -- Works --

    /// Inserts a work. Returns false if the owner already has a work with the
    /// same image path.
    pub fn create_work(
        &self,
        id: &str,
        user_id: &str,
        image_path: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO works (id, user_id, image_path, title, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (user_id, image_path) DO NOTHING",
                (id, user_id, image_path, title, description),
            )?;
            Ok(inserted > 0)
        })
    }

    pub fn get_works_by_user(&self, user_id: &str) -> Result<Vec<WorkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, image_path, title, description, created_at
                 FROM works
                 WHERE user_id = ?1
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], work_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_work_owner(&self, work_id: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT user_id FROM works WHERE id = ?1", [work_id], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    /// Works by other users that `user_id` has not swiped yet and that are
    /// newer than the last feed page served to them, newest first.
    pub fn get_feed(&self, user_id: &str, limit: u32) -> Result<Vec<FeedWorkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT w.id, w.user_id, w.image_path, w.title, w.description, w.created_at,
                        u.username, u.icon_path
                 FROM works w
                 JOIN users u ON u.id = w.user_id
                 LEFT JOIN swipes s ON s.from_user_id = ?1 AND s.to_work_id = w.id
                 LEFT JOIN user_progress up ON up.user_id = ?1
                 WHERE w.user_id <> ?1
                   AND s.id IS NULL
                   AND (up.last_viewed IS NULL OR w.created_at > up.last_viewed)
                 ORDER BY w.created_at DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], |row| {
                    Ok(FeedWorkRow {
                        work: work_from_row(row)?,
                        username: row.get(6)?,
                        icon_path: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn set_last_viewed(&self, user_id: &str, last_viewed: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO user_progress (user_id, last_viewed) VALUES (?1, ?2)
                 ON CONFLICT (user_id) DO UPDATE SET last_viewed = excluded.last_viewed",
                (user_id, last_viewed),
            )?;
            Ok(())
        })
    }

    // -- Swipes --

    /// Records `from_user_id`'s preference toward a work in one statement.
    ///
    /// The owner is resolved and captured from `works` by the same statement;
    /// nothing is written when the work is missing, belongs to the swiper, or
    /// the swiper does not exist. An existing row for the pair has its flag
    /// and timestamp overwritten. Returns rows affected (0 or 1).
    pub fn upsert_swipe(
        &self,
        id: &str,
        from_user_id: &str,
        to_work_id: &str,
        is_like: bool,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute(
                "INSERT INTO swipes (id, from_user_id, to_work_id, to_work_user_id, is_like)
                 SELECT ?1, ?2, w.id, w.user_id, ?3
                 FROM works w
                 WHERE w.id = ?4
                   AND w.user_id <> ?2
                   AND EXISTS (SELECT 1 FROM users WHERE id = ?2)
                 ON CONFLICT (from_user_id, to_work_id) DO UPDATE
                 SET is_like = excluded.is_like,
                     created_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                rusqlite::params![id, from_user_id, is_like, to_work_id],
            )?;
            Ok(affected)
        })
    }

    pub fn get_swipe(&self, from_user_id: &str, to_work_id: &str) -> Result<Option<SwipeRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, from_user_id, to_work_id, to_work_user_id, is_like, created_at
                 FROM swipes
                 WHERE from_user_id = ?1 AND to_work_id = ?2",
                [from_user_id, to_work_id],
                |row| {
                    Ok(SwipeRow {
                        id: row.get(0)?,
                        from_user_id: row.get(1)?,
                        to_work_id: row.get(2)?,
                        to_work_user_id: row.get(3)?,
                        is_like: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()
        })
    }

    /// Most recent work owned by `to_work_user_id` that `from_user_id` likes.
    pub fn find_like_toward(
        &self,
        from_user_id: &str,
        to_work_user_id: &str,
    ) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT to_work_id
                 FROM swipes
                 WHERE from_user_id = ?1
                   AND to_work_user_id = ?2
                   AND is_like = 1
                 ORDER BY created_at DESC
                 LIMIT 1",
                [from_user_id, to_work_user_id],
                |row| row.get(0),
            )
            .optional()
        })
    }

    // -- Matches --

    /// Create-if-absent on the (user1_id, user2_id) pair. Callers must pass the
    /// pair already in canonical order. Returns false if the pair was matched
    /// before; the existing row is left untouched.
    pub fn insert_match_if_absent(
        &self,
        id: &str,
        user1_id: &str,
        work1_id: &str,
        user2_id: &str,
        work2_id: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO matches (id, user1_id, user2_id, work1_id, work2_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (user1_id, user2_id) DO NOTHING",
                (id, user1_id, user2_id, work1_id, work2_id),
            )?;
            Ok(inserted > 0)
        })
    }

    pub fn get_match(&self, id: &str) -> Result<Option<MatchRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user1_id, user2_id, work1_id, work2_id, created_at
                 FROM matches WHERE id = ?1",
                [id],
                match_from_row,
            )
            .optional()
        })
    }

    /// Matches between two users, in either stored order.
    pub fn get_matches_between(&self, a: &str, b: &str) -> Result<Vec<MatchRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user1_id, user2_id, work1_id, work2_id, created_at
                 FROM matches
                 WHERE (user1_id = ?1 AND user2_id = ?2)
                    OR (user1_id = ?2 AND user2_id = ?1)",
            )?;
            let rows = stmt
                .query_map([a, b], match_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_all_matches(&self) -> Result<Vec<MatchRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user1_id, user2_id, work1_id, work2_id, created_at
                 FROM matches
                 ORDER BY created_at, id",
            )?;
            let rows = stmt
                .query_map([], match_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_matches_for_user(&self, user_id: &str) -> Result<Vec<MatchListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, u.id, u.username, u.icon_path, w.image_path, w.title
                 FROM matches m
                 JOIN users u
                   ON u.id = CASE WHEN m.user1_id = ?1 THEN m.user2_id ELSE m.user1_id END
                 JOIN works w
                   ON w.id = CASE WHEN m.user1_id = ?1 THEN m.work2_id ELSE m.work1_id END
                 WHERE ?1 IN (m.user1_id, m.user2_id)
                 ORDER BY m.created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(MatchListRow {
                        match_id: row.get(0)?,
                        partner_id: row.get(1)?,
                        partner_username: row.get(2)?,
                        partner_icon_path: row.get(3)?,
                        work_image_path: row.get(4)?,
                        work_title: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Reviews --

    /// Returns false if `from_user_id` already reviewed this match.
    pub fn insert_review(
        &self,
        id: &str,
        match_id: &str,
        from_user_id: &str,
        to_user_id: &str,
        work_id: &str,
        comment: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO reviews (id, match_id, from_user_id, to_user_id, work_id, comment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (match_id, from_user_id) DO NOTHING",
                (id, match_id, from_user_id, to_user_id, work_id, comment),
            )?;
            Ok(inserted > 0)
        })
    }

    pub fn get_received_reviews(&self, user_id: &str) -> Result<Vec<ReceivedReviewRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.id, r.match_id, u.id, u.username, u.icon_path,
                        w.id, w.image_path, r.comment, r.created_at
                 FROM reviews r
                 JOIN users u ON u.id = r.from_user_id
                 JOIN works w ON w.id = r.work_id
                 WHERE r.to_user_id = ?1
                 ORDER BY r.created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ReceivedReviewRow {
                        id: row.get(0)?,
                        match_id: row.get(1)?,
                        from_user_id: row.get(2)?,
                        from_username: row.get(3)?,
                        from_icon_path: row.get(4)?,
                        work_id: row.get(5)?,
                        work_image_path: row.get(6)?,
                        comment: row.get(7)?,
                        created_at: row.get(8)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is always a literal from this module, never user input.
    let mut stmt = conn.prepare(&format!(
        "SELECT id, username, email, password, bio, icon_path, created_at
         FROM users WHERE {column} = ?1"
    ))?;

    stmt.query_row([value], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            bio: row.get(4)?,
            icon_path: row.get(5)?,
            created_at: row.get(6)?,
        })
    })
    .optional()
}

fn work_from_row(row: &Row<'_>) -> rusqlite::Result<WorkRow> {
    Ok(WorkRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        image_path: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn match_from_row(row: &Row<'_>) -> rusqlite::Result<MatchRow> {
    Ok(MatchRow {
        id: row.get(0)?,
        user1_id: row.get(1)?,
        user2_id: row.get(2)?,
        work1_id: row.get(3)?,
        work2_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn user(db: &Database, name: &str) -> String {
        let id = new_id();
        db.create_user(&id, name, &format!("{name}@example.com"), "hash")
            .unwrap();
        id
    }

    fn work(db: &Database, owner: &str, image: &str) -> String {
        let id = new_id();
        assert!(db.create_work(&id, owner, image, "title", None).unwrap());
        id
    }

    #[test]
    fn user_lookup_by_email_and_id() {
        let db = Database::open_in_memory().unwrap();
        let id = user(&db, "alice");

        let by_email = db.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, id);
        assert!(by_email.bio.is_none());

        assert!(db.get_user_by_id(&id).unwrap().is_some());
        assert!(db.get_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_not_inserted() {
        let db = Database::open_in_memory().unwrap();
        let id = user(&db, "alice");
        let inserted = db
            .create_user(&new_id(), "other", "alice@example.com", "hash")
            .unwrap();
        assert!(!inserted);

        let existing = db.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(existing.id, id);
        assert_eq!(existing.username, "alice");
    }

    #[test]
    fn profile_update_keeps_unset_fields() {
        let db = Database::open_in_memory().unwrap();
        let id = user(&db, "alice");

        db.update_profile(&id, Some("hello"), Some("icons/a.png")).unwrap();
        db.update_profile(&id, None, Some("icons/b.png")).unwrap();

        let row = db.get_user_by_id(&id).unwrap().unwrap();
        assert_eq!(row.bio.as_deref(), Some("hello"));
        assert_eq!(row.icon_path.as_deref(), Some("icons/b.png"));
    }

    #[test]
    fn same_image_path_twice_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        let alice = user(&db, "alice");
        work(&db, &alice, "works/a.png");

        let again = db
            .create_work(&new_id(), &alice, "works/a.png", "dup", None)
            .unwrap();
        assert!(!again);
        assert_eq!(db.get_works_by_user(&alice).unwrap().len(), 1);
    }

    #[test]
    fn upsert_swipe_overwrites_flag() {
        let db = Database::open_in_memory().unwrap();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        let wb = work(&db, &bob, "works/b.png");

        assert_eq!(db.upsert_swipe(&new_id(), &alice, &wb, true).unwrap(), 1);
        assert_eq!(db.upsert_swipe(&new_id(), &alice, &wb, false).unwrap(), 1);

        let swipe = db.get_swipe(&alice, &wb).unwrap().unwrap();
        assert!(!swipe.is_like);
        assert_eq!(swipe.to_work_user_id, bob);

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM swipes", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn upsert_swipe_skips_own_and_missing_works() {
        let db = Database::open_in_memory().unwrap();
        let alice = user(&db, "alice");
        let wa = work(&db, &alice, "works/a.png");

        assert_eq!(db.upsert_swipe(&new_id(), &alice, &wa, true).unwrap(), 0);
        assert_eq!(db.upsert_swipe(&new_id(), &alice, &new_id(), true).unwrap(), 0);
        assert!(db.get_swipe(&alice, &wa).unwrap().is_none());
    }

    #[test]
    fn find_like_toward_ignores_dislikes() {
        let db = Database::open_in_memory().unwrap();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        let wb1 = work(&db, &bob, "works/b1.png");
        let wb2 = work(&db, &bob, "works/b2.png");

        db.upsert_swipe(&new_id(), &alice, &wb1, false).unwrap();
        assert!(db.find_like_toward(&alice, &bob).unwrap().is_none());

        db.upsert_swipe(&new_id(), &alice, &wb2, true).unwrap();
        assert_eq!(db.find_like_toward(&alice, &bob).unwrap(), Some(wb2));
    }

    #[test]
    fn feed_hides_own_and_swiped_works_and_advances() {
        let db = Database::open_in_memory().unwrap();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        work(&db, &alice, "works/a.png");
        let wb1 = work(&db, &bob, "works/b1.png");
        let wb2 = work(&db, &bob, "works/b2.png");

        db.upsert_swipe(&new_id(), &alice, &wb1, true).unwrap();

        let feed = db.get_feed(&alice, 10).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].work.id, wb2);
        assert_eq!(feed[0].username, "bob");

        db.set_last_viewed(&alice, &feed[0].work.created_at).unwrap();
        assert!(db.get_feed(&alice, 10).unwrap().is_empty());
    }

    #[test]
    fn match_insert_is_create_once() {
        let db = Database::open_in_memory().unwrap();
        let a = user(&db, "alice");
        let b = user(&db, "bob");
        let wa = work(&db, &a, "works/a.png");
        let wb = work(&db, &b, "works/b.png");
        let (u1, w1, u2, w2) = if a < b { (&a, &wb, &b, &wa) } else { (&b, &wa, &a, &wb) };

        assert!(db.insert_match_if_absent(&new_id(), u1, w1, u2, w2).unwrap());
        assert!(!db.insert_match_if_absent(&new_id(), u1, w1, u2, w2).unwrap());

        let matches = db.get_matches_between(&b, &a).unwrap();
        assert_eq!(matches.len(), 1);

        let for_a = db.get_matches_for_user(&a).unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].partner_id, b);
        assert_eq!(for_a[0].work_image_path, "works/a.png");
    }

    #[test]
    fn one_review_per_side() {
        let db = Database::open_in_memory().unwrap();
        let a = user(&db, "alice");
        let b = user(&db, "bob");
        let wa = work(&db, &a, "works/a.png");
        let wb = work(&db, &b, "works/b.png");
        let (u1, w1, u2, w2) = if a < b { (&a, &wb, &b, &wa) } else { (&b, &wa, &a, &wb) };
        let match_id = new_id();
        db.insert_match_if_absent(&match_id, u1, w1, u2, w2).unwrap();

        assert!(db.insert_review(&new_id(), &match_id, u1, u2, w2, "nice").unwrap());
        assert!(!db.insert_review(&new_id(), &match_id, u1, u2, w2, "again").unwrap());

        let received = db.get_received_reviews(u2).unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].comment, "nice");
        assert_eq!(&received[0].from_user_id, u1);
        assert!(db.get_received_reviews(u1).unwrap().is_empty());
    }
}
