//! Notification store: transient toasts, each with its own expiry timer.

pub mod error;
pub mod state;

pub use error::*;
pub use state::*;

use crate::clients::NotificationClient;
use crate::framework::{Response, Scheduler, Store, StoreActor, TimerHandle, WeakMailbox};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Collaborators of the notification store.
pub struct NotificationContext {
    pub scheduler: Arc<dyn Scheduler>,
}

#[derive(Debug)]
pub enum NotificationMessage {
    Push {
        message: String,
        kind: NotificationKind,
        expires_after: Duration,
        respond_to: Response<String>,
    },
    /// Answers whether a notification was removed.
    Remove {
        id: String,
        respond_to: Response<bool>,
    },
    Clear(Response<()>),
    List(Response<Vec<Notification>>),
    /// Posted by the timer of `id`.
    Expire(String),
}

/// Owns the visible notifications, in insertion order.
#[derive(Default)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
    timers: HashMap<String, TimerHandle>,
    next_id: u64,
}

impl NotificationStore {
    fn take(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        before != self.notifications.len()
    }
}

impl Store for NotificationStore {
    type Message = NotificationMessage;
    type Context = NotificationContext;
    type Snapshot = Vec<Notification>;

    fn handle(
        &mut self,
        msg: NotificationMessage,
        ctx: &NotificationContext,
        mailbox: &WeakMailbox<NotificationMessage>,
    ) {
        match msg {
            NotificationMessage::Push {
                message,
                kind,
                expires_after,
                respond_to,
            } => {
                self.next_id += 1;
                let id = format!("toast-{}", self.next_id);

                if !expires_after.is_zero() {
                    let mailbox = mailbox.clone();
                    let expired = id.clone();
                    let handle = ctx.scheduler.schedule(
                        expires_after,
                        Box::new(move || {
                            if let Err(e) = mailbox.deliver(NotificationMessage::Expire(expired)) {
                                debug!(error = %e, "Expiry not delivered");
                            }
                        }),
                    );
                    self.timers.insert(id.clone(), handle);
                }

                debug!(%id, %kind, "Push");
                self.notifications.push(Notification {
                    id: id.clone(),
                    message,
                    kind,
                    expires_after,
                });
                let _ = respond_to.send(id);
            }
            NotificationMessage::Remove { id, respond_to } => {
                if let Some(timer) = self.timers.remove(&id) {
                    timer.cancel();
                }
                let _ = respond_to.send(self.take(&id));
            }
            NotificationMessage::Clear(respond_to) => {
                // Pending timers stay armed and fire against absent ids.
                self.notifications.clear();
                let _ = respond_to.send(());
            }
            NotificationMessage::List(respond_to) => {
                let _ = respond_to.send(self.notifications.clone());
            }
            NotificationMessage::Expire(id) => {
                self.timers.remove(&id);
                if self.take(&id) {
                    debug!(%id, "Expired");
                } else {
                    debug!(%id, "Expired notification already gone");
                }
            }
        }
    }

    fn snapshot(&self) -> Vec<Notification> {
        self.notifications.clone()
    }

    fn snapshot_message(respond_to: Response<Vec<Notification>>) -> NotificationMessage {
        NotificationMessage::List(respond_to)
    }
}

/// Creates a new Notification store and its client.
pub fn new() -> (StoreActor<NotificationStore>, NotificationClient) {
    let (actor, mailbox, snapshots) = StoreActor::new(64, NotificationStore::default());
    (actor, NotificationClient::new(mailbox, snapshots))
}

