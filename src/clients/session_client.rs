use crate::clients::StoreClient;
use crate::framework::Mailbox;
use crate::model::Credentials;
use crate::session_store::{SessionError, SessionMessage, SessionState, SessionStore};
use crate::validation::validate_credentials;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Client for interacting with the Session store.
#[derive(Clone)]
pub struct SessionClient {
    mailbox: Mailbox<SessionMessage>,
    snapshots: watch::Receiver<SessionState>,
}

impl SessionClient {
    pub fn new(mailbox: Mailbox<SessionMessage>, snapshots: watch::Receiver<SessionState>) -> Self {
        Self { mailbox, snapshots }
    }

    /// Log in and persist the returned token.
    ///
    /// Credentials failing the form rules are rejected here and never reach the store.
    #[instrument(skip(self))]
    pub async fn login(&self, credentials: Credentials) -> Result<(), SessionError> {
        validate_credentials(&credentials)?;
        debug!("Sending request");
        self.mailbox
            .request(|respond_to| SessionMessage::Login {
                credentials,
                respond_to,
            })
            .await?
    }

    /// End the session. Calling it again changes nothing.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), SessionError> {
        debug!("Sending request");
        Ok(self.mailbox.request(SessionMessage::Logout).await?)
    }

    /// Re-read the persisted token. Returns whether a session is active.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> Result<bool, SessionError> {
        debug!("Sending request");
        Ok(self
            .mailbox
            .request(|respond_to| SessionMessage::CheckAuth(Some(respond_to)))
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn clear_error(&self) -> Result<(), SessionError> {
        Ok(self.mailbox.request(SessionMessage::ClearError).await?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshots.borrow().is_authenticated()
    }
}

impl StoreClient<SessionStore> for SessionClient {
    type Error = SessionError;

    fn mailbox(&self) -> &Mailbox<SessionMessage> {
        &self.mailbox
    }

    fn snapshots(&self) -> &watch::Receiver<SessionState> {
        &self.snapshots
    }
}
