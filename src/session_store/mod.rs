//! Session store: the single source of truth for authentication status.

pub mod error;
pub mod state;

pub use error::*;
pub use state::*;

use crate::api::{ApiError, AuthApi};
use crate::clients::SessionClient;
use crate::framework::{Response, Store, StoreActor, WeakMailbox};
use crate::model::{Credentials, LoginResponse};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use std::sync::Arc;
use tracing::{info, warn};

/// Message used when a login succeeds without a token.
pub const NO_TOKEN_MESSAGE: &str = "No token received from server";

/// Collaborators of the session store.
pub struct SessionContext {
    pub auth: Arc<dyn AuthApi>,
    pub storage: Arc<dyn KeyValueStore>,
}

#[derive(Debug)]
pub enum SessionMessage {
    Login {
        credentials: Credentials,
        respond_to: Response<Result<(), SessionError>>,
    },
    LoginSettled {
        attempt: u64,
        result: Result<LoginResponse, ApiError>,
        respond_to: Response<Result<(), SessionError>>,
    },
    Logout(Response<()>),
    /// Re-read the persisted token. The responder is absent when the nudge comes from a redirect.
    CheckAuth(Option<Response<bool>>),
    ClearError(Response<()>),
    Get(Response<SessionState>),
}

/// Owns the [`SessionState`].
///
/// Every login attempt gets a number. A logout or a newer login bumps it, so an attempt that
/// settles afterwards cannot resurrect a session that was already ended.
pub struct SessionStore {
    state: SessionState,
    attempt: u64,
}

impl SessionStore {
    pub fn new(state: SessionState) -> Self {
        Self { state, attempt: 0 }
    }

    fn end_session(&mut self, storage: &dyn KeyValueStore) {
        if let Err(e) = storage.remove(TOKEN_KEY) {
            warn!(error = %e, "Could not clear persisted token");
        }
        self.state.token = None;
        self.state.user = None;
    }

    fn settle_login(
        &mut self,
        result: Result<LoginResponse, ApiError>,
        storage: &dyn KeyValueStore,
    ) -> Result<(), SessionError> {
        self.state.is_loading = false;

        let outcome = result.map_err(|e| e.to_string()).and_then(|response| {
            let token = response.token().ok_or(NO_TOKEN_MESSAGE)?.to_string();
            storage.set(TOKEN_KEY, &token).map_err(|e| e.to_string())?;
            Ok((token, response.user))
        });

        match outcome {
            Ok((token, user)) => {
                info!(user = ?user.as_ref().map(|u| &u.email), "Logged in");
                self.state.token = Some(token);
                self.state.user = user;
                self.state.error = None;
                Ok(())
            }
            Err(message) => {
                warn!(error = %message, "Login failed");
                self.end_session(storage);
                self.state.error = Some(message.clone());
                Err(SessionError::LoginFailed(message))
            }
        }
    }
}

impl Store for SessionStore {
    type Message = SessionMessage;
    type Context = SessionContext;
    type Snapshot = SessionState;

    fn handle(&mut self, msg: SessionMessage, ctx: &SessionContext, mailbox: &WeakMailbox<SessionMessage>) {
        match msg {
            SessionMessage::Login {
                credentials,
                respond_to,
            } => {
                self.attempt += 1;
                self.state.is_loading = true;
                self.state.error = None;

                let attempt = self.attempt;
                let auth = ctx.auth.clone();
                mailbox.spawn(async move {
                    let result = auth.login(&credentials).await;
                    SessionMessage::LoginSettled {
                        attempt,
                        result,
                        respond_to,
                    }
                });
            }
            SessionMessage::LoginSettled {
                attempt,
                result,
                respond_to,
            } => {
                let outcome = if attempt == self.attempt {
                    self.settle_login(result, ctx.storage.as_ref())
                } else {
                    info!(attempt, current = self.attempt, "Discarding superseded login");
                    Err(SessionError::Superseded)
                };
                let _ = respond_to.send(outcome);
            }
            SessionMessage::Logout(respond_to) => {
                self.attempt += 1;
                self.end_session(ctx.storage.as_ref());
                self.state.is_loading = false;
                self.state.error = None;
                info!("Logged out");
                let _ = respond_to.send(());
            }
            SessionMessage::CheckAuth(respond_to) => {
                let token = ctx.storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
                if token.is_none() {
                    self.state.user = None;
                }
                self.state.token = token;
                if let Some(respond_to) = respond_to {
                    let _ = respond_to.send(self.state.is_authenticated());
                }
            }
            SessionMessage::ClearError(respond_to) => {
                self.state.error = None;
                let _ = respond_to.send(());
            }
            SessionMessage::Get(respond_to) => {
                let _ = respond_to.send(self.state.clone());
            }
        }
    }

    fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    fn snapshot_message(respond_to: Response<SessionState>) -> SessionMessage {
        SessionMessage::Get(respond_to)
    }
}

/// Creates a new Session store, restored from the persisted token, and its client.
pub fn new(storage: &dyn KeyValueStore) -> (StoreActor<SessionStore>, SessionClient) {
    let state = SessionState::restored(storage.get(TOKEN_KEY));
    let (actor, mailbox, snapshots) = StoreActor::new(32, SessionStore::new(state));
    (actor, SessionClient::new(mailbox, snapshots))
}
