//! Direct messages.
//!
//! Every send writes two rows: the sender's copy (`user_id = sender`,
//! `recipient_id = recipient`, already read) and the recipient's copy
//! (`user_id = recipient`, `recipient_id = sender`, unread). `recipient_id`
//! therefore always names the counterpart as seen by the row's owner, and a
//! conversation is just "my rows grouped by recipient_id".

use anyhow::Result;
use rusqlite::{OptionalExtension, Row};
use tracing::debug;

use crate::models::{ConversationRow, MessageRow};
use crate::{Database, now_timestamp};

const MESSAGE_SELECT: &str = "
    SELECT m.id, m.user_id, m.sender_id, s.username, m.recipient_id, r.username,
           m.body, m.created_at, m.is_read
    FROM messages m
    JOIN users s ON s.id = m.sender_id
    JOIN users r ON r.id = m.recipient_id";

impl Database {
    /// Insert the sender/recipient row pair for one send and return the id
    /// of the sender's copy. Does not reject `sender_id == recipient_id`;
    /// callers decide that.
    pub fn send_message(&self, sender_id: &str, recipient_id: &str, body: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let now = now_timestamp();
            let tx = conn.unchecked_transaction()?;

            tx.execute(
                "INSERT INTO messages (user_id, sender_id, recipient_id, body, created_at, is_read)
                 VALUES (?1, ?1, ?2, ?3, ?4, 1)",
                rusqlite::params![sender_id, recipient_id, body, now],
            )?;
            let sender_copy = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO messages (user_id, sender_id, recipient_id, body, created_at, is_read)
                 VALUES (?2, ?1, ?1, ?3, ?4, 0)",
                rusqlite::params![sender_id, recipient_id, body, now],
            )?;

            tx.commit()?;
            debug!("Message pair stored: {} -> {}", sender_id, recipient_id);
            Ok(sender_copy)
        })
    }

    /// Conversations of `user_id`, most recent activity first, with the
    /// number of unread rows per counterpart.
    pub fn conversations(&self, user_id: &str) -> Result<Vec<ConversationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.recipient_id, u.username,
                        MAX(m.created_at) AS last,
                        SUM(CASE WHEN m.is_read = 0 THEN 1 ELSE 0 END) AS unread
                 FROM messages m
                 JOIN users u ON u.id = m.recipient_id
                 WHERE m.user_id = ?1
                 GROUP BY m.recipient_id, u.username
                 ORDER BY last DESC, MAX(m.id) DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ConversationRow {
                        counterpart_id: row.get(0)?,
                        counterpart_username: row.get(1)?,
                        last: row.get(2)?,
                        unread: row.get::<_, i64>(3)? as u64,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(&format!("{MESSAGE_SELECT} WHERE m.id = ?1"), [id], map_message)
                .optional()?;
            Ok(row)
        })
    }

    /// `user_id`'s rows with `counterpart_id`, oldest first.
    pub fn thread(&self, user_id: &str, counterpart_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_SELECT}
                 WHERE m.user_id = ?1 AND m.recipient_id = ?2
                 ORDER BY m.created_at, m.id"
            ))?;
            let rows = stmt
                .query_map((user_id, counterpart_id), map_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Flip every one of `user_id`'s rows with `counterpart_id` to read.
    /// Returns how many rows changed.
    pub fn mark_thread_read(&self, user_id: &str, counterpart_id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET is_read = 1
                 WHERE user_id = ?1 AND recipient_id = ?2 AND is_read = 0",
                (user_id, counterpart_id),
            )?;
            Ok(changed)
        })
    }

    pub fn unread_count(&self, user_id: &str, counterpart_id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM messages
                 WHERE user_id = ?1 AND recipient_id = ?2 AND is_read = 0",
                (user_id, counterpart_id),
                |row| row.get(0),
            )?;
            Ok(n as u64)
        })
    }

    /// Unread rows across all of `user_id`'s conversations.
    pub fn unread_total(&self, user_id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE user_id = ?1 AND is_read = 0",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        })
    }
}

fn map_message(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        sender_id: row.get(2)?,
        sender_username: row.get(3)?,
        recipient_id: row.get(4)?,
        recipient_username: row.get(5)?,
        body: row.get(6)?,
        created_at: row.get(7)?,
        is_read: row.get(8)?,
    })
}
