use crate::FormParams;
use chrono::NaiveDate;

/// Cap applied when the caller doesn't supply a usable `limit`.
pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Params {
    pub user_id: String,
    /// Inclusive lower bound on the exercise date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the exercise date.
    pub to: Option<NaiveDate>,
    pub limit: u32,
}

impl Params {
    pub fn new(user_id: String, from: Option<NaiveDate>, to: Option<NaiveDate>, limit: u32) -> Self {
        Self {
            user_id,
            from,
            to,
            limit,
        }
    }
}

impl From<(&str, &FormParams)> for Params {
    fn from((user_id, query): (&str, &FormParams)) -> Self {
        let from = query.get("from").and_then(crate::parse_input_date);
        let to = query.get("to").and_then(crate::parse_input_date);

        // Absent, non-numeric and zero all fall back to the default cap.
        let limit = query
            .get("limit")
            .and_then(|raw| raw.trim().parse().ok())
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_LIMIT);

        Params::new(user_id.to_owned(), from, to, limit)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[non_exhaustive]
pub struct MethodResult {
    pub username: String,
    /// Number of entries actually returned, after the limit is applied.
    pub count: usize,
    pub id: String,
    pub log: Vec<LogEntry>,
}

impl MethodResult {
    pub fn new(username: String, id: String, log: Vec<LogEntry>) -> Self {
        Self {
            username,
            count: log.len(),
            id,
            log,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[non_exhaustive]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl LogEntry {
    pub fn new(description: String, duration: i64, date: String) -> Self {
        Self {
            description,
            duration,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> Params {
        Params::from(("some-user-id", &FormParams::parse(query)))
    }

    #[test]
    fn bounds_are_independent() {
        let from_only = params("from=1990-01-01");
        assert!(from_only.from.is_some());
        assert!(from_only.to.is_none());

        let to_only = params("to=1990-12-31");
        assert!(to_only.from.is_none());
        assert!(to_only.to.is_some());
    }

    #[test]
    fn limit_defaults_to_100() {
        assert_eq!(params("").limit, DEFAULT_LIMIT);
        assert_eq!(params("limit=abc").limit, DEFAULT_LIMIT);
        assert_eq!(params("limit=0").limit, DEFAULT_LIMIT);
        assert_eq!(params("limit=-3").limit, DEFAULT_LIMIT);
    }

    #[test]
    fn explicit_limit_is_kept() {
        assert_eq!(params("limit=2").limit, 2);
    }

    #[test]
    fn unparsable_bounds_are_ignored() {
        let params = params("from=whenever&to=2020-13-40");

        assert!(params.from.is_none());
        assert!(params.to.is_none());
    }

    #[test]
    fn count_tracks_returned_entries() {
        let result = MethodResult::new(
            "fcc_test".to_string(),
            "some-user-id".to_string(),
            vec![LogEntry::new(
                "test run".to_string(),
                30,
                "Mon Jan 01 1990".to_string(),
            )],
        );

        assert_eq!(result.count, 1);
    }
}
