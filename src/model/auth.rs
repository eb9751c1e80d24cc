use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Credentials posted to the login endpoint.
#[derive(Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Passwords must never reach the logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The authenticated user, when the login response includes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of a successful login.
#[derive(Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
}

impl LoginResponse {
    /// Accepts `{ "token": ... }` objects as well as a bare JSON string token.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::String(token) => Ok(Self {
                token: Some(token),
                ..Self::default()
            }),
            other => serde_json::from_value(other),
        }
    }

    /// The token, if present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_accepts_bare_string() {
        let response = LoginResponse::from_value(json!("abc.def")).unwrap();
        assert_eq!(response.token(), Some("abc.def"));
    }

    #[test]
    fn test_login_response_reads_object() {
        let response = LoginResponse::from_value(json!({
            "token": "t-1",
            "expiresIn": 3600,
            "user": { "id": "u1", "email": "admin@example.com" }
        }))
        .unwrap();
        assert_eq!(response.token(), Some("t-1"));
        assert_eq!(response.user.unwrap().email, "admin@example.com");
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let response = LoginResponse::from_value(json!({ "token": "" })).unwrap();
        assert_eq!(response.token(), None);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("admin@example.com", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }
}
