use anyhow::Result;

use crate::Database;

impl Database {
    /// Get-or-create the edge `user_id -> author_id`. Returns whether it was new.
    pub fn follow(&self, user_id: &str, author_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO follows (user_id, author_id) VALUES (?1, ?2)",
                (user_id, author_id),
            )?;
            Ok(inserted > 0)
        })
    }

    pub fn unfollow(&self, user_id: &str, author_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute(
                "DELETE FROM follows WHERE user_id = ?1 AND author_id = ?2",
                (user_id, author_id),
            )?;
            Ok(deleted > 0)
        })
    }

    pub fn is_following(&self, user_id: &str, author_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = ?1 AND author_id = ?2)",
                (user_id, author_id),
                |row| row.get(0),
            )?;
            Ok(found)
        })
    }
}
