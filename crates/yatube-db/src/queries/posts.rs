use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::models::{PostRow, VoteState};
use crate::{Database, now_timestamp};

const POST_SELECT: &str = "
    SELECT p.id, p.text, p.pub_date, p.image, p.author_id, u.username,
           g.id, g.title, g.slug,
           (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id),
           (SELECT COUNT(*) FROM post_dislikes d WHERE d.post_id = p.id)
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_groups g ON g.id = p.group_id";

/// Which posts a listing covers. Every listing is ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(String),
    /// Posts by authors that this user follows.
    FollowedBy(String),
}

impl PostFilter {
    fn clause(&self) -> (&'static str, Vec<Value>) {
        match self {
            Self::All => ("", vec![]),
            Self::Group(id) => ("WHERE p.group_id = ?1", vec![Value::Integer(*id)]),
            Self::Author(id) => ("WHERE p.author_id = ?1", vec![Value::Text(id.clone())]),
            Self::FollowedBy(id) => (
                "WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = ?1)",
                vec![Value::Text(id.clone())],
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Like,
    Dislike,
}

impl Vote {
    fn table(self) -> &'static str {
        match self {
            Self::Like => "post_likes",
            Self::Dislike => "post_dislikes",
        }
    }

    fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }
}

impl Database {
    pub fn create_post(
        &self,
        author_id: &str,
        text: &str,
        group_id: Option<i64>,
        image: Option<&str>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (text, pub_date, image, group_id, author_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![text, now_timestamp(), image, group_id, author_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Rewrites text and group. A `None` image keeps the stored one.
    pub fn update_post(
        &self,
        id: i64,
        text: &str,
        group_id: Option<i64>,
        image: Option<&str>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE posts SET text = ?2, group_id = ?3, image = COALESCE(?4, image)
                 WHERE id = ?1",
                rusqlite::params![id, text, group_id, image],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_post(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(&format!("{POST_SELECT} WHERE p.id = ?1"), [id], map_post)
                .optional()?;
            Ok(row)
        })
    }

    pub fn count_posts(&self, filter: &PostFilter) -> Result<u64> {
        let (clause, params) = filter.clause();
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM posts p {clause}"),
                rusqlite::params_from_iter(params.iter()),
                |row| row.get(0),
            )?;
            Ok(n as u64)
        })
    }

    pub fn list_posts(&self, filter: &PostFilter, limit: u32, offset: u64) -> Result<Vec<PostRow>> {
        let (clause, mut params) = filter.clause();
        let limit_idx = params.len() + 1;
        params.push(Value::Integer(i64::from(limit)));
        params.push(Value::Integer(offset as i64));

        self.with_conn(|conn| {
            let sql = format!(
                "{POST_SELECT} {clause}
                 ORDER BY p.pub_date DESC, p.id DESC
                 LIMIT ?{limit_idx} OFFSET ?{}",
                limit_idx + 1
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(params.iter()), map_post)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Toggle `vote` for `user_id` on a post, clearing the opposite vote.
    /// Returns `None` when the post does not exist.
    pub fn toggle_vote(&self, post_id: i64, user_id: &str, vote: Vote) -> Result<Option<VoteState>> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            if !post_exists(&tx, post_id)? {
                return Ok(None);
            }

            tx.execute(
                &format!(
                    "DELETE FROM {} WHERE post_id = ?1 AND user_id = ?2",
                    vote.opposite().table()
                ),
                rusqlite::params![post_id, user_id],
            )?;
            let removed = tx.execute(
                &format!("DELETE FROM {} WHERE post_id = ?1 AND user_id = ?2", vote.table()),
                rusqlite::params![post_id, user_id],
            )?;
            if removed == 0 {
                tx.execute(
                    &format!("INSERT INTO {} (post_id, user_id) VALUES (?1, ?2)", vote.table()),
                    rusqlite::params![post_id, user_id],
                )?;
            }

            let state = query_vote_state(&tx, post_id, user_id)?;
            tx.commit()?;
            Ok(Some(state))
        })
    }
}

fn post_exists(conn: &Connection, post_id: i64) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM posts WHERE id = ?1", [post_id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn query_vote_state(conn: &Connection, post_id: i64, user_id: &str) -> Result<VoteState> {
    let state = conn.query_row(
        "SELECT
            EXISTS(SELECT 1 FROM post_likes WHERE post_id = ?1 AND user_id = ?2),
            EXISTS(SELECT 1 FROM post_dislikes WHERE post_id = ?1 AND user_id = ?2),
            (SELECT COUNT(*) FROM post_likes WHERE post_id = ?1),
            (SELECT COUNT(*) FROM post_dislikes WHERE post_id = ?1)",
        rusqlite::params![post_id, user_id],
        |row| {
            Ok(VoteState {
                liked: row.get(0)?,
                disliked: row.get(1)?,
                likes: row.get::<_, i64>(2)? as u64,
                dislikes: row.get::<_, i64>(3)? as u64,
            })
        },
    )?;
    Ok(state)
}

fn map_post(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        text: row.get(1)?,
        pub_date: row.get(2)?,
        image: row.get(3)?,
        author_id: row.get(4)?,
        author_username: row.get(5)?,
        group_id: row.get(6)?,
        group_title: row.get(7)?,
        group_slug: row.get(8)?,
        likes: row.get::<_, i64>(9)? as u64,
        dislikes: row.get::<_, i64>(10)? as u64,
    })
}
