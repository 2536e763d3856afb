use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Timestamp default used by every table: RFC 3339 UTC with milliseconds, so
/// text ordering is chronological ordering.
pub const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(&format!(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                bio         TEXT,
                icon_path   TEXT,
                created_at  TEXT NOT NULL DEFAULT ({NOW})
            );

            CREATE TABLE works (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                image_path  TEXT NOT NULL,
                title       TEXT NOT NULL,
                description TEXT,
                created_at  TEXT NOT NULL DEFAULT ({NOW}),
                UNIQUE(user_id, image_path)
            );

            CREATE INDEX idx_works_user ON works(user_id, created_at);

            CREATE TABLE swipes (
                id              TEXT PRIMARY KEY,
                from_user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                to_work_id      TEXT NOT NULL REFERENCES works(id) ON DELETE CASCADE,
                to_work_user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                is_like         INTEGER NOT NULL,
                created_at      TEXT NOT NULL DEFAULT ({NOW}),
                UNIQUE(from_user_id, to_work_id),
                CHECK(from_user_id <> to_work_user_id)
            );

            CREATE INDEX idx_swipes_reciprocal
                ON swipes(from_user_id, to_work_user_id, is_like);

            CREATE TABLE matches (
                id          TEXT PRIMARY KEY,
                user1_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                user2_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                work1_id    TEXT NOT NULL REFERENCES works(id) ON DELETE CASCADE,
                work2_id    TEXT NOT NULL REFERENCES works(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT ({NOW}),
                UNIQUE(user1_id, user2_id),
                CHECK(user1_id < user2_id)
            );

            CREATE TABLE reviews (
                id           TEXT PRIMARY KEY,
                match_id     TEXT NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
                from_user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                to_user_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                work_id      TEXT NOT NULL REFERENCES works(id) ON DELETE CASCADE,
                comment      TEXT NOT NULL,
                created_at   TEXT NOT NULL DEFAULT ({NOW}),
                UNIQUE(match_id, from_user_id)
            );

            CREATE INDEX idx_reviews_to_user ON reviews(to_user_id, created_at);

            CREATE TABLE user_progress (
                user_id     TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                last_viewed TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            "
        ))?;
    }

    info!("Database migrations complete");
    Ok(())
}
