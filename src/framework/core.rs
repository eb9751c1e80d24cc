//! # Core Store Framework
//!
//! This module defines the generic building blocks every store is made of.
//!
//! ## Key Types
//!
//! - [`Store`]: The trait that all store states must implement.
//! - [`StoreActor`]: The generic task that owns a store and runs its message loop.
//! - [`Mailbox`]: The cloneable sending half used by clients and by in-flight work.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, ActorDropped).

use std::fmt::Debug;
use std::future::Future;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any store state must implement to be driven by a [`StoreActor`].
///
/// # Architecture Note
/// Session, actions and notifications all share one contract: a piece of state that is
/// mutated only by its own messages, one message at a time. Writing the loop once here means
/// each store only describes *what* a message does, never *how* it is delivered.
///
/// # Cooperative Handlers
/// [`Store::handle`] is synchronous on purpose. A handler that needs the network spawns the
/// call through [`WeakMailbox::spawn`] and receives the outcome later as another message. Other
/// messages (a page click, a toast) are processed while the call is in flight, exactly like
/// callbacks interleaving on a single event loop.
pub trait Store: Send + 'static {
    /// The message enum this store understands.
    type Message: Send + Debug + 'static;

    /// The collaborators injected into every handler (API clients, storage, scheduler).
    type Context: Send + Sync + 'static;

    /// The immutable view published to subscribers after every message.
    type Snapshot: Clone + Send + Sync + 'static;

    /// Apply one message to the state.
    fn handle(&mut self, msg: Self::Message, ctx: &Self::Context, mailbox: &WeakMailbox<Self::Message>);

    /// Produce the view of the current state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Build the message asking for [`Store::snapshot`].
    ///
    /// Unlike reading the `watch` channel, the answer is ordered after every message sent
    /// before it.
    fn snapshot_message(respond_to: Response<Self::Snapshot>) -> Self::Message;
}

// =============================================================================
// 2. ERRORS & RESPONSES
// =============================================================================

/// Errors that can occur within the store framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
    #[error("No Tokio runtime to finish delivery on")]
    NoRuntime,
}

/// Type alias for the one-shot response channel carried inside messages.
pub type Response<T> = oneshot::Sender<T>;

// =============================================================================
// 3. THE MAILBOX
// =============================================================================

/// The sending half of a store's message channel.
///
/// Clients hold one to issue requests; spawned work holds one to post its result back.
/// A store keeps running as long as at least one `Mailbox` is alive.
#[derive(Debug)]
pub struct Mailbox<M> {
    sender: mpsc::Sender<M>,
}

impl<M> Clone for Mailbox<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M: Send + 'static> Mailbox<M> {
    pub fn new(sender: mpsc::Sender<M>) -> Self {
        Self { sender }
    }

    /// Deliver a message, waiting for buffer space.
    pub async fn post(&self, msg: M) -> Result<(), FrameworkError> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Deliver a message without waiting. Fails if the buffer is full or the store is gone.
    pub fn try_post(&self, msg: M) -> Result<(), FrameworkError> {
        self.sender
            .try_send(msg)
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Send a message carrying a responder and wait for the store's answer.
    pub async fn request<T>(
        &self,
        make: impl FnOnce(Response<T>) -> M,
    ) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.post(make(respond_to)).await?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    /// A handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakMailbox<M> {
        WeakMailbox {
            sender: self.sender.downgrade(),
        }
    }
}

/// A [`Mailbox`] that does not keep its store alive.
///
/// Handlers receive one of these, and so do timers: a pending toast expiry must not delay
/// shutdown.
#[derive(Debug)]
pub struct WeakMailbox<M> {
    sender: mpsc::WeakSender<M>,
}

impl<M> Clone for WeakMailbox<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M: Send + 'static> WeakMailbox<M> {
    /// Deliver a message if the store is still running.
    pub fn try_post(&self, msg: M) -> Result<(), FrameworkError> {
        match self.sender.upgrade() {
            Some(sender) => Mailbox::new(sender).try_post(msg),
            None => Err(FrameworkError::ActorClosed),
        }
    }

    /// Deliver a message from synchronous code without ever dropping it.
    ///
    /// The message is queued at once when there is room. When the mailbox is full, a task
    /// holding a strong sender waits for space, so the store stays alive until it lands.
    pub fn deliver(&self, msg: M) -> Result<(), FrameworkError> {
        let Some(sender) = self.sender.upgrade() else {
            return Err(FrameworkError::ActorClosed);
        };
        match sender.try_send(msg) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(FrameworkError::ActorClosed),
            Err(mpsc::error::TrySendError::Full(msg)) => {
                let runtime =
                    tokio::runtime::Handle::try_current().map_err(|_| FrameworkError::NoRuntime)?;
                debug!("Mailbox full, delivering in the background");
                runtime.spawn(async move {
                    if sender.send(msg).await.is_err() {
                        debug!("Store gone before delivery");
                    }
                });
                Ok(())
            }
        }
    }

    /// Run `work` off the store task and post the message it yields back to the store.
    ///
    /// The spawned task holds a strong sender, so the store keeps running until `work` settles.
    /// Nothing is started once every strong sender is gone.
    pub fn spawn<F>(&self, work: F)
    where
        F: Future<Output = M> + Send + 'static,
    {
        let Some(sender) = self.sender.upgrade() else {
            debug!("Store shutting down, work not started");
            return;
        };
        tokio::spawn(async move {
            let msg = work.await;
            if sender.send(msg).await.is_err() {
                debug!("Store gone before work settled");
            }
        });
    }
}

// =============================================================================
// 4. THE GENERIC STORE ACTOR
// =============================================================================

/// The task that owns a store and processes its messages.
///
/// **Concurrency Model**:
/// The state is owned by exactly one task and only touched inside [`Store::handle`], so no
/// `Mutex` is needed. Readers never lock either: they get snapshots from a `watch` channel.
pub struct StoreActor<S: Store> {
    receiver: mpsc::Receiver<S::Message>,
    self_sender: mpsc::WeakSender<S::Message>,
    state: S,
    publisher: watch::Sender<S::Snapshot>,
}

impl<S: Store> StoreActor<S> {
    /// Create the actor together with its mailbox and snapshot receiver.
    pub fn new(
        buffer_size: usize,
        state: S,
    ) -> (Self, Mailbox<S::Message>, watch::Receiver<S::Snapshot>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (publisher, snapshots) = watch::channel(state.snapshot());
        let actor = Self {
            receiver,
            self_sender: sender.downgrade(),
            state,
            publisher,
        };
        (actor, Mailbox::new(sender), snapshots)
    }

    /// Runs the message loop until every [`Mailbox`] has been dropped.
    ///
    /// # Context Injection
    /// The `context` is handed to every handler. Collaborators can therefore be wired after
    /// the actor (and its mailbox) exist, which is how the auth guard gets a route back into
    /// the session store.
    pub async fn run(mut self, context: S::Context) {
        // Extract just the type name (e.g., "ActionsStore" instead of the full path)
        let store = std::any::type_name::<S>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(store, "Store started");

        let mailbox = WeakMailbox {
            sender: self.self_sender.clone(),
        };
        while let Some(msg) = self.receiver.recv().await {
            debug!(store, ?msg, "Handle");
            self.state.handle(msg, &context, &mailbox);
            self.publisher.send_replace(self.state.snapshot());
        }

        info!(store, "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
    }

    #[derive(Debug)]
    enum CounterMessage {
        Add(u32),
        AddLater(u32),
        Get(Response<u32>),
    }

    impl Store for Counter {
        type Message = CounterMessage;
        type Context = ();
        type Snapshot = u32;

        fn handle(&mut self, msg: CounterMessage, _ctx: &(), mailbox: &WeakMailbox<CounterMessage>) {
            match msg {
                CounterMessage::Add(n) => self.value += n,
                CounterMessage::AddLater(n) => {
                    mailbox.spawn(async move { CounterMessage::Add(n) });
                }
                CounterMessage::Get(respond_to) => {
                    let _ = respond_to.send(self.value);
                }
            }
        }

        fn snapshot(&self) -> u32 {
            self.value
        }

        fn snapshot_message(respond_to: Response<u32>) -> CounterMessage {
            CounterMessage::Get(respond_to)
        }
    }

    #[tokio::test]
    async fn test_messages_are_applied_in_order_and_published() {
        let (actor, mailbox, mut snapshots) = StoreActor::new(8, Counter::default());
        let handle = tokio::spawn(actor.run(()));

        mailbox.post(CounterMessage::Add(2)).await.unwrap();
        mailbox.post(CounterMessage::Add(3)).await.unwrap();
        let value = mailbox.request(CounterMessage::Get).await.unwrap();
        assert_eq!(value, 5);

        snapshots.changed().await.unwrap();
        assert_eq!(*snapshots.borrow(), 5);

        drop(mailbox);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_spawned_work_posts_back_before_shutdown() {
        let (actor, mailbox, snapshots) = StoreActor::new(8, Counter::default());
        let handle = tokio::spawn(actor.run(()));

        mailbox.post(CounterMessage::AddLater(7)).await.unwrap();
        // Round trip so the handler has spawned the work before the last client goes away.
        mailbox.request(CounterMessage::Get).await.unwrap();
        drop(mailbox);

        // The spawned work holds its own mailbox, so the loop drains it before exiting.
        handle.await.unwrap();
        assert_eq!(*snapshots.borrow(), 7);
    }

    #[tokio::test]
    async fn test_deliver_waits_for_room_in_a_full_mailbox() {
        let (actor, mailbox, _snapshots) = StoreActor::new(1, Counter::default());
        let weak = mailbox.downgrade();

        // Not running yet: the single slot fills up.
        mailbox.try_post(CounterMessage::Add(1)).unwrap();
        assert!(weak.try_post(CounterMessage::Add(10)).is_err());
        weak.deliver(CounterMessage::Add(2)).unwrap();

        // The background delivery queues up for the slot before the request below.
        let handle = tokio::spawn(actor.run(()));
        tokio::task::yield_now().await;
        assert_eq!(mailbox.request(CounterMessage::Get).await.unwrap(), 3);

        drop(mailbox);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_weak_mailbox_does_not_keep_store_alive() {
        let (actor, mailbox, _snapshots) = StoreActor::new(8, Counter::default());
        let handle = tokio::spawn(actor.run(()));
        let weak = mailbox.downgrade();

        drop(mailbox);
        handle.await.unwrap();
        assert_eq!(weak.try_post(CounterMessage::Add(1)), Err(FrameworkError::ActorClosed));
    }
}
