use super::User;

/// The full set of registered users, in store return order.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct MethodResult(pub Vec<User>);

impl MethodResult {
    pub fn new(users: Vec<User>) -> Self {
        Self(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_a_bare_array() {
        let result = MethodResult::new(vec![
            User::new("a".to_string(), "alice".to_string()),
            User::new("b".to_string(), "bob".to_string()),
        ]);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!([
                { "id": "a", "username": "alice" },
                { "id": "b", "username": "bob" },
            ])
        );
    }
}
