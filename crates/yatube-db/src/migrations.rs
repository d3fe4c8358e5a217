use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("DB: running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                first_name  TEXT NOT NULL DEFAULT '',
                last_name   TEXT NOT NULL DEFAULT '',
                email       TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL
            );

            CREATE TABLE profiles (
                user_id         TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                bio             TEXT,
                profile_photo   TEXT,
                instagram       TEXT,
                date_of_birth   TEXT
            );

            CREATE TABLE post_groups (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                slug        TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL
            );

            CREATE TABLE posts (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                text        TEXT NOT NULL,
                pub_date    TEXT NOT NULL,
                image       TEXT,
                group_id    INTEGER REFERENCES post_groups(id) ON DELETE SET NULL,
                author_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );

            CREATE INDEX idx_posts_pub_date ON posts(pub_date);
            CREATE INDEX idx_posts_author ON posts(author_id, pub_date);
            CREATE INDEX idx_posts_group ON posts(group_id, pub_date);

            CREATE TABLE post_likes (
                post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY (post_id, user_id)
            );

            CREATE TABLE post_dislikes (
                post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY (post_id, user_id)
            );

            CREATE TABLE comments (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                author_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                text        TEXT NOT NULL,
                created     TEXT NOT NULL,
                updated     TEXT NOT NULL,
                active      INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX idx_comments_post ON comments(post_id, created);

            CREATE TABLE follows (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                UNIQUE (user_id, author_id)
            );

            -- Two rows per send: the sender's copy and the recipient's copy.
            -- recipient_id is always the counterpart from user_id's side.
            CREATE TABLE messages (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                sender_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipient_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                body            TEXT NOT NULL DEFAULT '',
                created_at      TEXT NOT NULL,
                is_read         INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX idx_messages_thread
                ON messages(user_id, recipient_id, is_read);
            CREATE INDEX idx_messages_owner
                ON messages(user_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
