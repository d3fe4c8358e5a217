use anyhow::Result;
use rusqlite::OptionalExtension;

use crate::Database;
use crate::models::ProfileRow;

impl Database {
    pub fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT user_id, bio, profile_photo, instagram, date_of_birth
                     FROM profiles WHERE user_id = ?1",
                    [user_id],
                    |row| {
                        Ok(ProfileRow {
                            user_id: row.get(0)?,
                            bio: row.get(1)?,
                            profile_photo: row.get(2)?,
                            instagram: row.get(3)?,
                            date_of_birth: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Insert or replace the profile for `profile.user_id`.
    pub fn upsert_profile(&self, profile: &ProfileRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO profiles (user_id, bio, profile_photo, instagram, date_of_birth)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    bio = excluded.bio,
                    profile_photo = excluded.profile_photo,
                    instagram = excluded.instagram,
                    date_of_birth = excluded.date_of_birth",
                rusqlite::params![
                    profile.user_id,
                    profile.bio,
                    profile.profile_photo,
                    profile.instagram,
                    profile.date_of_birth,
                ],
            )?;
            Ok(())
        })
    }
}
