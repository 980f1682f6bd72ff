use crate::{Database, DatabaseResult, InsertionResult};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Row};
use std::convert::TryFrom;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Exercise {
    pub id: String,
    /// Owning user's id. Checked against the user table at creation time
    /// only; never re-validated afterwards.
    pub user_id: String,
    /// Copy of the owner's username at creation time.
    pub username: String,
    pub description: String,
    pub duration: i64,
    /// Midnight (UTC) of the exercise's calendar date, in unix seconds.
    pub date_s: i64,
}

impl Exercise {
    pub fn new(
        id: String,
        user_id: String,
        username: String,
        description: String,
        duration: i64,
        date_s: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            username,
            description,
            duration,
            date_s,
        }
    }

    pub fn date_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.date_s, 0).single()
    }
}

impl<'a> TryFrom<&Row<'a>> for Exercise {
    type Error = rusqlite::Error;
    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        let id: String = row.get(0)?;
        let user_id: String = row.get(1)?;
        let username: String = row.get(2)?;
        let description: String = row.get(3)?;
        let duration = row.get(4)?;
        let date_s = row.get(5)?;

        Ok(Exercise::new(
            id,
            user_id,
            username,
            description,
            duration,
            date_s,
        ))
    }
}

impl Database<Exercise> {
    pub async fn create_table(&self) -> DatabaseResult<()> {
        let db = self.get_connection()?;

        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS exercise (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                username TEXT NOT NULL,
                description TEXT NOT NULL,
                duration INTEGER NOT NULL,
                date_s INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS exercise_user_id ON exercise (user_id);",
        )?;

        Ok(())
    }

    pub async fn insert_exercise(&self, exercise: &Exercise) -> DatabaseResult<InsertionResult> {
        let db = self.get_connection()?;

        let changed_rows = db.execute(
            "INSERT INTO exercise (id, user_id, username, description, duration, date_s)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                exercise.id,
                exercise.user_id,
                exercise.username,
                exercise.description,
                exercise.duration,
                exercise.date_s
            ],
        )?;

        Ok(InsertionResult::from_changed_rows(changed_rows))
    }

    /// All exercises belonging to `user_id` whose date falls inside the given
    /// bounds (inclusive, each optional), oldest first, capped at `limit`.
    pub async fn get_exercises_by_user(
        &self,
        user_id: &str,
        from_s: Option<i64>,
        to_s: Option<i64>,
        limit: u32,
    ) -> DatabaseResult<Vec<Exercise>> {
        let db = self.get_connection()?;

        let mut stmt = db.prepare(
            "SELECT id, user_id, username, description, duration, date_s FROM exercise
             WHERE user_id = ?1 AND date_s >= ?2 AND date_s <= ?3
             ORDER BY date_s ASC
             LIMIT ?4",
        )?;

        let exercise_rows: Vec<_> = stmt
            .query_map(
                params![
                    user_id,
                    from_s.unwrap_or(i64::MIN),
                    to_s.unwrap_or(i64::MAX),
                    limit
                ],
                |row| crate::parse_from_row(row),
            )?
            .collect::<Result<_, _>>()?;

        Ok(exercise_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::temp_database;

    const DAY_S: i64 = 86_400;

    async fn exercise_database() -> Database<Exercise> {
        let db: Database<Exercise> = temp_database();
        db.create_table().await.unwrap();
        db
    }

    fn exercise(id: &str, user_id: &str, date_s: i64) -> Exercise {
        Exercise::new(
            id.to_owned(),
            user_id.to_owned(),
            "alice".to_owned(),
            "test run".to_owned(),
            30,
            date_s,
        )
    }

    #[tokio::test]
    async fn insert_and_query_roundtrip() {
        let db = exercise_database().await;

        let inserted = exercise("e-1", "u-1", 0);
        db.insert_exercise(&inserted).await.unwrap();

        let found = db
            .get_exercises_by_user("u-1", None, None, 100)
            .await
            .unwrap();

        assert_eq!(found, vec![inserted]);
    }

    #[tokio::test]
    async fn query_is_scoped_to_the_user() {
        let db = exercise_database().await;

        db.insert_exercise(&exercise("e-1", "u-1", 0)).await.unwrap();
        db.insert_exercise(&exercise("e-2", "u-2", 0)).await.unwrap();

        let found = db
            .get_exercises_by_user("u-1", None, None, 100)
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "e-1");
    }

    #[tokio::test]
    async fn bounds_are_inclusive_and_independent() {
        let db = exercise_database().await;

        for (id, date_s) in &[("e-1", 0), ("e-2", DAY_S), ("e-3", 2 * DAY_S)] {
            db.insert_exercise(&exercise(id, "u-1", *date_s))
                .await
                .unwrap();
        }

        let from_only = db
            .get_exercises_by_user("u-1", Some(DAY_S), None, 100)
            .await
            .unwrap();
        assert_eq!(
            from_only.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["e-2", "e-3"]
        );

        let to_only = db
            .get_exercises_by_user("u-1", None, Some(DAY_S), 100)
            .await
            .unwrap();
        assert_eq!(
            to_only.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["e-1", "e-2"]
        );

        let both = db
            .get_exercises_by_user("u-1", Some(DAY_S), Some(DAY_S), 100)
            .await
            .unwrap();
        assert_eq!(
            both.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["e-2"]
        );
    }

    #[tokio::test]
    async fn limit_caps_the_result_and_order_is_chronological() {
        let db = exercise_database().await;

        // Inserted newest first to make sure ordering comes from the query.
        for (id, date_s) in &[("e-5", 4 * DAY_S), ("e-4", 3 * DAY_S), ("e-3", 2 * DAY_S), ("e-2", DAY_S), ("e-1", 0)] {
            db.insert_exercise(&exercise(id, "u-1", *date_s))
                .await
                .unwrap();
        }

        let found = db
            .get_exercises_by_user("u-1", None, None, 2)
            .await
            .unwrap();

        assert_eq!(
            found.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["e-1", "e-2"]
        );
    }

    #[test]
    fn date_utc_is_midnight_of_the_stored_date() {
        let exercise = exercise("e-1", "u-1", 1613952000);

        assert_eq!(
            exercise.date_utc().unwrap(),
            DateTime::parse_from_rfc3339("2021-02-22T00:00:00-00:00").unwrap()
        );
    }
}
