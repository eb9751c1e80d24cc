//! Backend collaborators.
//!
//! The stores never talk HTTP directly. They hold an [`AuthApi`] and an [`ActionsApi`],
//! which are implemented by [`HttpApi`] in production and by the doubles in [`mock`] in tests.
//! [`AuthGuard`] wraps an `ActionsApi` to enforce the session-expiry policy.

pub mod error;
pub mod guard;
pub mod http;
pub mod mock;

pub use error::*;
pub use guard::*;
pub use http::*;

use crate::model::{ActionForm, Credentials, LoginResponse, PageQuery};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Path of the login endpoint on the auth host.
pub const LOGIN_PATH: &str = "/api/Authentication/Login";
/// Path of the listing endpoint on the API host.
pub const LIST_ACTIONS_PATH: &str = "/api/v1/actions/admin-list";
/// Path of the create endpoint on the API host.
pub const CREATE_ACTION_PATH: &str = "/api/v1/actions/admin-add";

/// Token acquisition.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
}

/// The actions resource.
///
/// `list` returns the raw payload: its shape varies and is resolved by the
/// [`normalizer`](crate::normalizer).
#[async_trait]
pub trait ActionsApi: Send + Sync {
    async fn list(&self, query: PageQuery) -> Result<Value, ApiError>;
    async fn create(&self, form: &ActionForm) -> Result<Value, ApiError>;
}

#[async_trait]
impl<T: AuthApi + ?Sized> AuthApi for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        (**self).login(credentials).await
    }
}

#[async_trait]
impl<T: ActionsApi + ?Sized> ActionsApi for Arc<T> {
    async fn list(&self, query: PageQuery) -> Result<Value, ApiError> {
        (**self).list(query).await
    }

    async fn create(&self, form: &ActionForm) -> Result<Value, ApiError> {
        (**self).create(form).await
    }
}
