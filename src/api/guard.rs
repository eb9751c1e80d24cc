//! Session-expiry policy for authenticated calls.
//!
//! Any call through [`AuthGuard`] that comes back 401 clears the persisted token and sends the
//! user to [`Route::Login`]. The error is still returned to the caller; nothing is retried.

use super::{ActionsApi, ApiError};
use crate::model::{ActionForm, PageQuery};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Screens the dashboard can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated entry point.
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Moves the presentation layer to another screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// An [`ActionsApi`] that enforces the session-expiry policy on the wrapped one.
pub struct AuthGuard<A> {
    inner: A,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl<A: ActionsApi> AuthGuard<A> {
    pub fn new(inner: A, storage: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            inner,
            storage,
            navigator,
        }
    }

    fn inspect<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                warn!(error = %e, "Authorization rejected, ending session");
                if let Err(storage_err) = self.storage.remove(TOKEN_KEY) {
                    warn!(error = %storage_err, "Could not clear persisted token");
                }
                self.navigator.navigate(Route::Login);
            }
        }
        result
    }
}

#[async_trait]
impl<A: ActionsApi> ActionsApi for AuthGuard<A> {
    async fn list(&self, query: PageQuery) -> Result<Value, ApiError> {
        let result = self.inner.list(query).await;
        self.inspect(result)
    }

    async fn create(&self, form: &ActionForm) -> Result<Value, ApiError> {
        let result = self.inner.create(form).await;
        self.inspect(result)
    }
}
