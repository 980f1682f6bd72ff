use crate::app::{AppError, AppResult, ParamsError};
use database::{Database, Exercise as DbExercise, User as DbUser};
use model::{
    exercise::{add_exercise, get_logs},
    FormParams,
};
use std::{convert::TryFrom, sync::Arc};
use uuid::Uuid;

pub struct ExerciseController {
    user_db: Arc<Database<DbUser>>,
    exercise_db: Arc<Database<DbExercise>>,
}

impl ExerciseController {
    pub fn new(user_db: Arc<Database<DbUser>>, exercise_db: Arc<Database<DbExercise>>) -> Self {
        Self {
            user_db,
            exercise_db,
        }
    }

    pub async fn add_exercise(
        &self,
        user_id: &str,
        form: FormParams,
    ) -> AppResult<add_exercise::MethodResult> {
        use add_exercise::{MethodResult, Params};
        let params = Params::try_from((user_id, &form))?;

        let user = match self.user_db.get_user_by_id(&params.user_id).await? {
            Some(user) => user,
            None => return Err(AppError::unknown_user_id()),
        };

        let date = params.date.unwrap_or_else(model::current_date);

        let exercise = DbExercise::new(
            Uuid::new_v4().to_string(),
            user.id.clone(),
            user.username.clone(),
            params.description.clone(),
            params.duration,
            model::date_to_timestamp_s(date),
        );

        self.exercise_db.insert_exercise(&exercise).await?;

        info!(
            "logged exercise '{}' for user '{}'",
            exercise.id, user.username
        );

        Ok(MethodResult::new(
            user.id,
            user.username,
            model::display_date(date),
            params.duration,
            params.description,
        ))
    }

    pub async fn get_logs(
        &self,
        user_id: &str,
        query: FormParams,
    ) -> AppResult<get_logs::MethodResult> {
        use get_logs::{MethodResult, Params};
        let params = Params::from((user_id, &query));

        // Resolve the owner first; an unknown id short-circuits into the
        // domain error instead of an empty log.
        let user = match self.user_db.get_user_by_id(&params.user_id).await? {
            Some(user) => user,
            None => return Err(AppError::unknown_user()),
        };

        let from_s = params.from.map(model::date_to_timestamp_s);
        let to_s = params.to.map(model::date_to_timestamp_s);

        let exercises = self
            .exercise_db
            .get_exercises_by_user(&user.id, from_s, to_s, params.limit)
            .await?;

        let log = exercises
            .into_iter()
            .map(|exercise| LogEntryWrapper::from(exercise).0)
            .collect();

        Ok(MethodResult::new(user.username, user.id, log))
    }
}

impl ParamsError for add_exercise::InvalidParams {}

/// Used in order to convert from `database::Exercise` to a log entry (orphan rule).
struct LogEntryWrapper(get_logs::LogEntry);

impl From<DbExercise> for LogEntryWrapper {
    fn from(value: DbExercise) -> Self {
        let date = model::date_from_timestamp_s(value.date_s)
            .map(model::display_date)
            .unwrap_or_default();

        LogEntryWrapper(get_logs::LogEntry::new(
            value.description,
            value.duration,
            date,
        ))
    }
}
