use crate::app::{AppError, AppResult, ParamsError};
use database::{Database, InsertionResult, User as DbUser};
use model::{
    user::{create_user, list_users, User},
    FormParams,
};
use std::{convert::TryFrom, sync::Arc};
use uuid::Uuid;

pub struct UserController {
    user_db: Arc<Database<DbUser>>,
}

impl UserController {
    pub fn new(user_db: Arc<Database<DbUser>>) -> Self {
        Self { user_db }
    }

    pub async fn create_user(&self, form: FormParams) -> AppResult<create_user::MethodResult> {
        use create_user::{MethodResult, Params};
        let params = Params::try_from(&form)?;

        let id = Uuid::new_v4().to_string();
        let created_s = crate::current_timestamp_s();

        let result = self
            .user_db
            .insert_user(&id, &params.username, created_s)
            .await?;

        match result {
            InsertionResult::Inserted => info!("created user '{}'", params.username),
            InsertionResult::AlreadyExists => {
                debug!("user '{}' already exists", params.username)
            }
        }

        // Select again: when the insert lost a race or the user already
        // existed, this returns the row that actually won.
        let user = self
            .user_db
            .get_user_by_username(&params.username)
            .await?
            .ok_or_else(|| {
                AppError::internal_error()
                    .with_context(&format!("user '{}' missing after insert", params.username))
            })?;

        Ok(MethodResult::new(user.id, user.username))
    }

    pub async fn list_users(&self) -> AppResult<list_users::MethodResult> {
        use list_users::MethodResult;

        let users = self.user_db.get_all_users().await?;

        let users = users
            .into_iter()
            .map(|user| UserWrapper::from(user).0)
            .collect();

        Ok(MethodResult::new(users))
    }
}

impl ParamsError for create_user::InvalidParams {}

/// Used in order to convert from `database::User` to `model::User` (orphan rule).
struct UserWrapper(User);

impl From<DbUser> for UserWrapper {
    fn from(value: DbUser) -> Self {
        UserWrapper(User::new(value.id, value.username))
    }
}
