use crate::FormParams;
use chrono::NaiveDate;
use std::{convert::TryFrom, error::Error, fmt::Display};

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Params {
    pub user_id: String,
    pub description: String,
    /// Duration in minutes. The caller decides the magnitude; only
    /// non-numeric input is rejected.
    pub duration: i64,
    /// Calendar date of the exercise. `None` means "today at call time".
    pub date: Option<NaiveDate>,
}

impl Params {
    pub fn new(
        user_id: String,
        description: String,
        duration: i64,
        date: Option<NaiveDate>,
    ) -> Result<Self, InvalidParams> {
        if description.trim().is_empty() {
            return Err(InvalidParams::EmptyDescription);
        }

        Ok(Self {
            user_id,
            description,
            duration,
            date,
        })
    }
}

impl TryFrom<(&str, &FormParams)> for Params {
    type Error = InvalidParams;

    fn try_from((user_id, form): (&str, &FormParams)) -> Result<Self, Self::Error> {
        let description = form
            .get("description")
            .ok_or(InvalidParams::MissingDescription)?
            .to_owned();

        let duration_raw = form.get("duration").ok_or(InvalidParams::MissingDuration)?;
        let duration = duration_raw
            .trim()
            .parse()
            .map_err(|_| InvalidParams::InvalidDuration(duration_raw.to_owned()))?;

        // An unparsable date falls back to "today", same as an absent one.
        let date = form.get("date").and_then(crate::parse_input_date);

        Params::new(user_id.to_owned(), description, duration, date)
    }
}

#[derive(Debug)]
pub enum InvalidParams {
    MissingDescription,
    EmptyDescription,
    MissingDuration,
    InvalidDuration(String),
}

impl Error for InvalidParams {}

impl Display for InvalidParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            InvalidParams::MissingDescription => crate::missing_param_message("description"),
            InvalidParams::EmptyDescription => {
                crate::invalid_value_because_message("description", "must not be empty".to_string())
            }
            InvalidParams::MissingDuration => crate::missing_param_message("duration"),
            InvalidParams::InvalidDuration(raw) => crate::invalid_value_because_message(
                "duration",
                format!("'{}' is not an integer", raw),
            ),
        };
        write!(f, "{}", output)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[non_exhaustive]
pub struct MethodResult {
    /// The owning user's id, not the exercise's own.
    pub id: String,
    pub username: String,
    pub date: String,
    pub duration: i64,
    pub description: String,
}

impl MethodResult {
    pub fn new(
        id: String,
        username: String,
        date: String,
        duration: i64,
        description: String,
    ) -> Self {
        Self {
            id,
            username,
            date,
            duration,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(form: &str) -> Result<Params, InvalidParams> {
        Params::try_from(("some-user-id", &FormParams::parse(form)))
    }

    #[test]
    fn accepts_a_full_set_of_fields() {
        let params = params("description=test+run&duration=30&date=1990-01-01").unwrap();

        assert_eq!(params.user_id, "some-user-id");
        assert_eq!(params.description, "test run");
        assert_eq!(params.duration, 30);
        assert_eq!(params.date, crate::parse_input_date("1990-01-01"));
    }

    #[test]
    fn date_is_optional() {
        let params = params("description=test+run&duration=30").unwrap();

        assert_eq!(params.date, None);
    }

    #[test]
    fn unparsable_date_is_treated_as_absent() {
        let params = params("description=test+run&duration=30&date=2020-13-40").unwrap();

        assert_eq!(params.date, None);
    }

    #[test]
    fn negative_duration_is_accepted() {
        let params = params("description=test+run&duration=-5").unwrap();

        assert_eq!(params.duration, -5);
    }

    #[test]
    fn rejects_non_numeric_duration() {
        assert!(matches!(
            params("description=test+run&duration=half+an+hour"),
            Err(InvalidParams::InvalidDuration(_))
        ));
    }

    #[test]
    fn rejects_missing_description() {
        assert!(matches!(
            params("duration=30"),
            Err(InvalidParams::MissingDescription)
        ));
    }

    #[test]
    fn rejects_empty_description() {
        assert!(matches!(
            params("description=++&duration=30"),
            Err(InvalidParams::EmptyDescription)
        ));
    }
}
