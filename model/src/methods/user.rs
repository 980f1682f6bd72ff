pub mod create_user;
pub mod list_users;

/// A registered user.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[non_exhaustive]
pub struct User {
    pub id: String,
    pub username: String,
}

impl User {
    pub fn new(id: String, username: String) -> Self {
        Self { id, username }
    }
}
