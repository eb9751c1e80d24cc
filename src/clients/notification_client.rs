use crate::clients::StoreClient;
use crate::framework::Mailbox;
use crate::notification_store::{
    Notification, NotificationError, NotificationKind, NotificationMessage, NotificationStore,
};
use std::time::Duration;
use tokio::sync::watch;
use tracing::instrument;

/// Client for interacting with the Notification store.
#[derive(Clone)]
pub struct NotificationClient {
    mailbox: Mailbox<NotificationMessage>,
    snapshots: watch::Receiver<Vec<Notification>>,
}

impl NotificationClient {
    pub fn new(
        mailbox: Mailbox<NotificationMessage>,
        snapshots: watch::Receiver<Vec<Notification>>,
    ) -> Self {
        Self { mailbox, snapshots }
    }

    /// Show a notification and return its id. A zero duration never expires.
    #[instrument(skip(self, message))]
    pub async fn push(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        expires_after: Duration,
    ) -> Result<String, NotificationError> {
        let message = message.into();
        Ok(self
            .mailbox
            .request(|respond_to| NotificationMessage::Push {
                message,
                kind,
                expires_after,
                respond_to,
            })
            .await?)
    }

    pub async fn success(&self, message: impl Into<String>) -> Result<String, NotificationError> {
        self.of_kind(message.into(), NotificationKind::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<String, NotificationError> {
        self.of_kind(message.into(), NotificationKind::Error).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> Result<String, NotificationError> {
        self.of_kind(message.into(), NotificationKind::Warning).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Result<String, NotificationError> {
        self.of_kind(message.into(), NotificationKind::Info).await
    }

    async fn of_kind(&self, message: String, kind: NotificationKind) -> Result<String, NotificationError> {
        self.push(message, kind, kind.default_duration()).await
    }

    /// Remove a notification now. Returns whether it was still shown.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<bool, NotificationError> {
        let id = id.to_string();
        Ok(self
            .mailbox
            .request(|respond_to| NotificationMessage::Remove { id, respond_to })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), NotificationError> {
        Ok(self.mailbox.request(NotificationMessage::Clear).await?)
    }

    /// The notifications shown right now, oldest first.
    pub async fn list(&self) -> Result<Vec<Notification>, NotificationError> {
        self.get().await
    }
}

impl StoreClient<NotificationStore> for NotificationClient {
    type Error = NotificationError;

    fn mailbox(&self) -> &Mailbox<NotificationMessage> {
        &self.mailbox
    }

    fn snapshots(&self) -> &watch::Receiver<Vec<Notification>> {
        &self.snapshots
    }
}
