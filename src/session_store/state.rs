use crate::model::User;
use std::fmt;

/// What the dashboard knows about the current session.
///
/// `is_authenticated` is derived from `token`, so the two can never disagree.
#[derive(Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// A session restored from a persisted token.
    pub fn restored(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("is_authenticated", &self.is_authenticated())
            .field("user", &self.user)
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish()
    }
}
