use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::models::UserRow;
use crate::{Database, now_timestamp};

const USER_COLUMNS: &str = "id, username, password, first_name, last_name, email, created_at";

impl Database {
    /// Create an identity together with its (empty) profile. Returns `false`
    /// when the username is already taken.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO users (id, username, password, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, now_timestamp()),
            )?;
            if inserted == 0 {
                return Ok(false);
            }
            tx.execute("INSERT INTO profiles (user_id) VALUES (?1)", [id])?;
            tx.commit()?;
            Ok(true)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn update_user_names(
        &self,
        id: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET first_name = ?2, last_name = ?3, email = ?4 WHERE id = ?1",
                (id, first_name, last_name, email),
            )?;
            Ok(())
        })
    }

    /// Number of users whose username contains `needle`, ignoring ASCII case.
    pub fn count_users_matching(&self, needle: &str) -> Result<u64> {
        let pattern = like_pattern(needle);
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE username LIKE ?1 ESCAPE '\\'",
                [&pattern],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        })
    }

    pub fn search_users(&self, needle: &str, limit: u32, offset: u64) -> Result<Vec<UserRow>> {
        let pattern = like_pattern(needle);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE username LIKE ?1 ESCAPE '\\'
                 ORDER BY username
                 LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt
                .query_map(rusqlite::params![pattern, limit, offset as i64], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"
    ))?;
    let row = stmt.query_row([value], map_user).optional()?;
    Ok(row)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        email: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// `%needle%` with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
