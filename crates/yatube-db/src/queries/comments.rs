use anyhow::Result;
use rusqlite::{OptionalExtension, Row};

use crate::models::CommentRow;
use crate::{Database, now_timestamp};

const COMMENT_SELECT: &str = "
    SELECT c.id, c.post_id, c.author_id, u.username, c.text, c.created, c.updated, c.active
    FROM comments c
    JOIN users u ON u.id = c.author_id";

impl Database {
    pub fn create_comment(&self, post_id: i64, author_id: &str, text: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let now = now_timestamp();
            conn.execute(
                "INSERT INTO comments (post_id, author_id, text, created, updated)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                rusqlite::params![post_id, author_id, text, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_comment(&self, id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(&format!("{COMMENT_SELECT} WHERE c.id = ?1"), [id], map_comment)
                .optional()?;
            Ok(row)
        })
    }

    /// All comments on a post, oldest first. `active` is reported, not filtered on.
    pub fn list_comments(&self, post_id: i64) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{COMMENT_SELECT} WHERE c.post_id = ?1 ORDER BY c.created, c.id"
            ))?;
            let rows = stmt
                .query_map([post_id], map_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_comment(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        author_id: row.get(2)?,
        author_username: row.get(3)?,
        text: row.get(4)?,
        created: row.get(5)?,
        updated: row.get(6)?,
        active: row.get(7)?,
    })
}
