pub mod comments;
pub mod follows;
pub mod groups;
pub mod messages;
pub mod posts;
pub mod profiles;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::Database;

    /// Insert a user with a throwaway password hash and return its id.
    pub fn seed_user(db: &Database, username: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        assert!(db.create_user(&id, username, "not-a-real-hash").unwrap());
        id
    }
}
