use crate::{Database, DatabaseResult, InsertionResult};
use rusqlite::{params, Row};
use std::convert::TryFrom;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_s: i64,
}

impl User {
    pub fn new(id: String, username: String, created_s: i64) -> Self {
        Self {
            id,
            username,
            created_s,
        }
    }
}

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;
    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        let id: String = row.get(0)?;
        let username: String = row.get(1)?;
        let created_s = row.get(2)?;

        Ok(User::new(id, username, created_s))
    }
}

impl Database<User> {
    pub async fn create_table(&self) -> DatabaseResult<()> {
        let db = self.get_connection()?;

        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS user (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                created_s INTEGER NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS user_username ON user (username);",
        )?;

        Ok(())
    }

    /// Insert a user unless the username is already taken.
    ///
    /// The unique index on `username` makes this a single atomic statement:
    /// two concurrent calls with the same new username converge on one row,
    /// and the loser sees `AlreadyExists`.
    pub async fn insert_user(
        &self,
        id: &str,
        username: &str,
        created_s: i64,
    ) -> DatabaseResult<InsertionResult> {
        let db = self.get_connection()?;

        let changed_rows = db.execute(
            "INSERT OR IGNORE INTO user (id, username, created_s) VALUES (?1, ?2, ?3)",
            params![id, username, created_s],
        )?;

        Ok(InsertionResult::from_changed_rows(changed_rows))
    }

    pub async fn get_user_by_id(&self, id: &str) -> DatabaseResult<Option<User>> {
        let db = self.get_connection()?;

        let mut stmt = db.prepare("SELECT id, username, created_s FROM user WHERE id = ?1")?;

        let mut user_rows: Vec<_> = stmt
            .query_map(params![id], |row| crate::parse_from_row(row))?
            .collect::<Result<_, _>>()?;

        if user_rows.is_empty() {
            Ok(None)
        } else if user_rows.len() > 1 {
            error!(r#"more than 1 user with id: "{}""#, id);
            Ok(None)
        } else {
            Ok(Some(user_rows.swap_remove(0)))
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let db = self.get_connection()?;

        let mut stmt =
            db.prepare("SELECT id, username, created_s FROM user WHERE username = ?1")?;

        let mut user_rows: Vec<_> = stmt
            .query_map(params![username], |row| crate::parse_from_row(row))?
            .collect::<Result<_, _>>()?;

        if user_rows.is_empty() {
            Ok(None)
        } else if user_rows.len() > 1 {
            error!(r#"more than 1 user with username: "{}""#, username);
            Ok(None)
        } else {
            Ok(Some(user_rows.swap_remove(0)))
        }
    }

    pub async fn get_all_users(&self) -> DatabaseResult<Vec<User>> {
        let db = self.get_connection()?;

        let mut stmt = db.prepare("SELECT id, username, created_s FROM user")?;

        let user_rows: Vec<_> = stmt
            .query_map(params![], |row| crate::parse_from_row(row))?
            .collect::<Result<_, _>>()?;

        Ok(user_rows)
    }
}
