use crate::FormParams;
use std::{convert::TryFrom, error::Error, fmt::Display};

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Params {
    pub username: String,
}

impl Params {
    pub fn new(username: String) -> Result<Self, InvalidParams> {
        if username.trim().is_empty() {
            return Err(InvalidParams::EmptyUsername);
        }

        Ok(Self { username })
    }
}

impl TryFrom<&FormParams> for Params {
    type Error = InvalidParams;

    fn try_from(form: &FormParams) -> Result<Self, Self::Error> {
        let username = form
            .get("username")
            .ok_or(InvalidParams::MissingUsername)?
            .to_owned();
        Params::new(username)
    }
}

#[derive(Debug)]
pub enum InvalidParams {
    MissingUsername,
    EmptyUsername,
}

impl Error for InvalidParams {}

impl Display for InvalidParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            InvalidParams::MissingUsername => crate::missing_param_message("username"),
            InvalidParams::EmptyUsername => {
                crate::invalid_value_because_message("username", "must not be empty".to_string())
            }
        };
        write!(f, "{}", output)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[non_exhaustive]
pub struct MethodResult {
    pub id: String,
    pub username: String,
}

impl MethodResult {
    pub fn new(id: String, username: String) -> Self {
        Self { id, username }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_plain_username() {
        let form = FormParams::parse("username=fcc_test");

        let params = Params::try_from(&form).unwrap();

        assert_eq!(params.username, "fcc_test");
    }

    #[test]
    fn rejects_missing_username() {
        let form = FormParams::parse("");

        assert!(matches!(
            Params::try_from(&form),
            Err(InvalidParams::MissingUsername)
        ));
    }

    #[test]
    fn rejects_empty_username() {
        let form = FormParams::parse("username=+++");

        assert!(matches!(
            Params::try_from(&form),
            Err(InvalidParams::EmptyUsername)
        ));
    }
}
