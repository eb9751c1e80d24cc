use crate::framework::{FrameworkError, Mailbox, Store};
use async_trait::async_trait;
use tokio::sync::watch;

/// Trait for store-specific clients to inherit the common read operations.
///
/// This trait reduces boilerplate by providing default implementations for reading the
/// latest snapshot and for waiting on the next one.
#[async_trait]
pub trait StoreClient<S: Store>: Send + Sync {
    /// The store-specific error type.
    type Error: From<FrameworkError> + Send + Sync;

    /// Access the mailbox of the store.
    fn mailbox(&self) -> &Mailbox<S::Message>;

    /// Access the snapshot receiver of the store.
    fn snapshots(&self) -> &watch::Receiver<S::Snapshot>;

    /// Map framework errors to the specific store error type.
    fn map_error(e: FrameworkError) -> Self::Error {
        Self::Error::from(e)
    }

    /// Fetch the state once every message sent before this call has been handled.
    #[tracing::instrument(skip(self))]
    async fn get(&self) -> Result<S::Snapshot, Self::Error> {
        tracing::debug!("Sending request");
        self.mailbox()
            .request(S::snapshot_message)
            .await
            .map_err(Self::map_error)
    }

    /// The state as of the last published message. Never waits, but may lag [`Self::get`].
    fn state(&self) -> S::Snapshot {
        self.snapshots().borrow().clone()
    }

    /// A receiver that is notified after every handled message.
    fn subscribe(&self) -> watch::Receiver<S::Snapshot> {
        self.snapshots().clone()
    }

    /// Wait until the store handles its next message and return the resulting state.
    #[tracing::instrument(skip(self))]
    async fn changed(&self) -> Result<S::Snapshot, Self::Error> {
        let mut receiver = self.subscribe();
        receiver.mark_unchanged();
        receiver
            .changed()
            .await
            .map_err(|_| Self::map_error(FrameworkError::ActorClosed))?;
        let snapshot = receiver.borrow_and_update().clone();
        Ok(snapshot)
    }
}
