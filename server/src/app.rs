use crate::{
    controller::{ExerciseController, UserController},
    Opts,
};
use database::{Database, DatabaseError, Exercise as DbExercise, User as DbUser};
use model::{
    exercise::{add_exercise, get_logs},
    user::{create_user, list_users},
    ApiError, FormParams,
};
use std::{
    error::Error,
    fmt::{Debug, Display},
    future::Future,
    sync::Arc,
    time,
};

pub type AppResult<T> = Result<T, AppError>;

pub struct App {
    user_controller: UserController,
    exercise_controller: ExerciseController,
}

impl App {
    pub async fn new(opts: Opts) -> Self {
        let user_db: Arc<Database<DbUser>> =
            Arc::new(Database::new(opts.database_addr.clone()));
        let exercise_db: Arc<Database<DbExercise>> =
            Arc::new(Database::new(opts.database_addr.clone()));

        user_db.create_table().await.unwrap();
        exercise_db.create_table().await.unwrap();

        let user_controller = UserController::new(user_db.clone());
        let exercise_controller = ExerciseController::new(user_db, exercise_db);

        Self {
            user_controller,
            exercise_controller,
        }
    }

    pub async fn create_user(&self, form: FormParams) -> AppResult<create_user::MethodResult> {
        timed("create_user", self.user_controller.create_user(form)).await
    }

    pub async fn list_users(&self) -> AppResult<list_users::MethodResult> {
        timed("list_users", self.user_controller.list_users()).await
    }

    pub async fn add_exercise(
        &self,
        user_id: &str,
        form: FormParams,
    ) -> AppResult<add_exercise::MethodResult> {
        timed(
            "add_exercise",
            self.exercise_controller.add_exercise(user_id, form),
        )
        .await
    }

    pub async fn get_logs(
        &self,
        user_id: &str,
        query: FormParams,
    ) -> AppResult<get_logs::MethodResult> {
        timed("get_logs", self.exercise_controller.get_logs(user_id, query)).await
    }
}

/// Run a single operation, logging how long it took to handle.
async fn timed<T, F>(method: &str, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let timer = time::Instant::now();
    info!("handling '{}' request", method);

    let result = operation.await;

    info!("handled '{}' request in {:?}", method, timer.elapsed());
    result
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub context: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    /// Expected failure, reported to the caller as an `{"error": ...}` body.
    Domain(ApiError),
    /// Store or transport failure, reported as the raw message text.
    Internal(String),
}

impl AppError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn with_context<T>(mut self, value: &T) -> Self
    where
        T: Debug,
    {
        self.context = Some(format!("{:?}", value));
        self
    }

    pub fn domain(error: ApiError) -> Self {
        Self::new(ErrorKind::Domain(error))
    }

    pub fn unknown_user_id() -> Self {
        Self::domain(ApiError::unknown_user_id())
    }

    pub fn unknown_user() -> Self {
        Self::domain(ApiError::unknown_user())
    }

    pub fn invalid_params(message: &str) -> Self {
        Self::domain(ApiError::new(message))
    }

    pub fn internal_error() -> Self {
        Self::new(ErrorKind::Internal("internal error".to_owned()))
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Domain(api_error) => write!(f, "{}", api_error.error),
            ErrorKind::Internal(message) => write!(f, "{}", message),
        }
    }
}

impl Error for AppError {}

impl From<DatabaseError> for AppError {
    fn from(db_error: DatabaseError) -> Self {
        AppError::new(ErrorKind::Internal(db_error.to_string())).with_context(&db_error)
    }
}

pub trait ParamsError: Error {}

impl<T> From<T> for AppError
where
    T: ParamsError,
{
    fn from(err: T) -> Self {
        AppError::invalid_params(&err.to_string()).with_context(&err)
    }
}
