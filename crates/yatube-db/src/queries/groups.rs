use anyhow::Result;
use rusqlite::{OptionalExtension, Row};

use crate::Database;
use crate::models::GroupRow;

impl Database {
    /// Returns the new group's id, or `None` when the slug is taken.
    pub fn create_group(&self, title: &str, slug: &str, description: &str) -> Result<Option<i64>> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO post_groups (title, slug, description) VALUES (?1, ?2, ?3)",
                (title, slug, description),
            )?;
            if inserted == 0 {
                return Ok(None);
            }
            Ok(Some(conn.last_insert_rowid()))
        })
    }

    pub fn get_group_by_slug(&self, slug: &str) -> Result<Option<GroupRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, title, slug, description FROM post_groups WHERE slug = ?1",
                    [slug],
                    map_group,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_group_by_id(&self, id: i64) -> Result<Option<GroupRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, title, slug, description FROM post_groups WHERE id = ?1",
                    [id],
                    map_group,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_groups(&self) -> Result<Vec<GroupRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, title, slug, description FROM post_groups ORDER BY title")?;
            let rows = stmt
                .query_map([], map_group)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn map_group(row: &Row<'_>) -> rusqlite::Result<GroupRow> {
    Ok(GroupRow {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_unique() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_group("Cats", "cats", "all about cats").unwrap();
        assert!(id.is_some());
        assert_eq!(db.create_group("Cats again", "cats", "dup").unwrap(), None);

        let group = db.get_group_by_slug("cats").unwrap().unwrap();
        assert_eq!(group.title, "Cats");
        assert_eq!(Some(group.id), id);
    }

    #[test]
    fn groups_listed_by_title() {
        let db = Database::open_in_memory().unwrap();
        db.create_group("Zebras", "zebras", "").unwrap();
        db.create_group("Ants", "ants", "").unwrap();

        let titles: Vec<_> = db.list_groups().unwrap().into_iter().map(|g| g.title).collect();
        assert_eq!(titles, vec!["Ants", "Zebras"]);
        assert!(db.get_group_by_id(999).unwrap().is_none());
    }
}
