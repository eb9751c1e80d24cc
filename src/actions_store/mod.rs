//! Actions store: listing, pagination and creation of the one administrable resource.

pub mod error;
pub mod state;

pub use error::*;
pub use state::*;

use crate::api::{ActionsApi, ApiError};
use crate::clients::ActionsClient;
use crate::framework::{Response, Store, StoreActor, WeakMailbox};
use crate::model::{Action, ActionForm, PageQuery};
use crate::normalizer::normalize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collaborators of the actions store.
pub struct ActionsContext {
    pub api: Arc<dyn ActionsApi>,
}

/// How a listing request settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was normalized and is now the store state.
    Applied,
    /// The request or the normalization failed; the message is now `error` in the state.
    Failed(String),
    /// A later fetch was issued before this one settled; its result was discarded.
    Superseded,
}

#[derive(Debug)]
pub enum ActionsMessage {
    /// Fetch a page. `None` (or 0) means "the stored value".
    Fetch {
        page: Option<u32>,
        page_size: Option<u32>,
        respond_to: Response<FetchOutcome>,
    },
    SetPage {
        page: u32,
        respond_to: Response<FetchOutcome>,
    },
    /// Store the new size and go back to page 1.
    SetPageSize {
        page_size: u32,
        respond_to: Response<FetchOutcome>,
    },
    FetchSettled {
        seq: u64,
        query: PageQuery,
        result: Result<Value, ApiError>,
        respond_to: Option<Response<FetchOutcome>>,
    },
    Create {
        form: ActionForm,
        respond_to: Response<Result<(), ActionsError>>,
    },
    CreateSettled {
        result: Result<Value, ApiError>,
        respond_to: Response<Result<(), ActionsError>>,
    },
    OpenModal(Response<()>),
    CloseModal(Response<()>),
    ClearCreateStatus(Response<()>),
    Get(Response<ActionsState>),
}

/// Owns the [`ActionsState`].
///
/// Each fetch is tagged with a sequence number; only the result of the latest one is applied.
pub struct ActionsStore {
    state: ActionsState,
    latest_fetch: u64,
}

impl ActionsStore {
    pub fn new(state: ActionsState) -> Self {
        Self {
            state,
            latest_fetch: 0,
        }
    }

    fn begin_fetch(
        &mut self,
        page: Option<u32>,
        page_size: Option<u32>,
        respond_to: Option<Response<FetchOutcome>>,
        ctx: &ActionsContext,
        mailbox: &WeakMailbox<ActionsMessage>,
    ) {
        self.latest_fetch += 1;
        self.state.is_loading = true;
        self.state.error = None;

        let seq = self.latest_fetch;
        let query = PageQuery {
            page_number: page.filter(|p| *p > 0).unwrap_or(self.state.current_page),
            page_size: page_size.filter(|s| *s > 0).unwrap_or(self.state.page_size),
        };
        debug!(seq, page = query.page_number, size = query.page_size, "Fetch");

        let api = ctx.api.clone();
        mailbox.spawn(async move {
            let result = api.list(query).await;
            ActionsMessage::FetchSettled {
                seq,
                query,
                result,
                respond_to,
            }
        });
    }

    fn settle_fetch(&mut self, query: PageQuery, result: Result<Value, ApiError>) -> FetchOutcome {
        self.state.is_loading = false;

        let page = result
            .map_err(|e| e.to_string())
            .and_then(|payload| {
                normalize::<Action>(&payload, query.page_number).map_err(|e| e.to_string())
            });

        match page {
            Ok(page) => {
                info!(
                    page = page.current_page,
                    items = page.items.len(),
                    total = page.total_count,
                    "Page loaded"
                );
                self.state.items = page.items;
                self.state.total_count = page.total_count;
                self.state.total_pages = page.total_pages;
                self.state.current_page = page.current_page;
                self.state.page_size = query.page_size;
                FetchOutcome::Applied
            }
            Err(message) => {
                warn!(error = %message, page = query.page_number, "Fetch failed");
                self.state.items.clear();
                self.state.error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }
}

impl Store for ActionsStore {
    type Message = ActionsMessage;
    type Context = ActionsContext;
    type Snapshot = ActionsState;

    fn handle(&mut self, msg: ActionsMessage, ctx: &ActionsContext, mailbox: &WeakMailbox<ActionsMessage>) {
        match msg {
            ActionsMessage::Fetch {
                page,
                page_size,
                respond_to,
            } => self.begin_fetch(page, page_size, Some(respond_to), ctx, mailbox),
            ActionsMessage::SetPage { page, respond_to } => {
                self.state.current_page = page;
                let size = self.state.page_size;
                self.begin_fetch(Some(page), Some(size), Some(respond_to), ctx, mailbox);
            }
            ActionsMessage::SetPageSize {
                page_size,
                respond_to,
            } => {
                self.state.page_size = page_size;
                self.state.current_page = 1;
                self.begin_fetch(Some(1), Some(page_size), Some(respond_to), ctx, mailbox);
            }
            ActionsMessage::FetchSettled {
                seq,
                query,
                result,
                respond_to,
            } => {
                let outcome = if seq == self.latest_fetch {
                    self.settle_fetch(query, result)
                } else {
                    debug!(seq, latest = self.latest_fetch, "Discarding superseded fetch");
                    FetchOutcome::Superseded
                };
                if let Some(respond_to) = respond_to {
                    let _ = respond_to.send(outcome);
                }
            }
            ActionsMessage::Create { form, respond_to } => {
                if self.state.is_creating {
                    let _ = respond_to.send(Err(ActionsError::CreateInProgress));
                    return;
                }
                self.state.is_creating = true;
                self.state.create_error = None;
                self.state.create_success = false;

                let api = ctx.api.clone();
                mailbox.spawn(async move {
                    let result = api.create(&form).await;
                    ActionsMessage::CreateSettled { result, respond_to }
                });
            }
            ActionsMessage::CreateSettled { result, respond_to } => {
                self.state.is_creating = false;
                match result {
                    Ok(_) => {
                        info!("Action created");
                        self.state.create_success = true;
                        self.state.is_modal_open = false;
                        // The list only changes by asking the server again.
                        self.begin_fetch(None, None, None, ctx, mailbox);
                        let _ = respond_to.send(Ok(()));
                    }
                    Err(e) => {
                        let message = e.to_string();
                        warn!(error = %message, "Create failed");
                        self.state.create_error = Some(message.clone());
                        let _ = respond_to.send(Err(ActionsError::CreateFailed(message)));
                    }
                }
            }
            ActionsMessage::OpenModal(respond_to) => {
                self.state.is_modal_open = true;
                self.state.create_error = None;
                self.state.create_success = false;
                let _ = respond_to.send(());
            }
            ActionsMessage::CloseModal(respond_to) => {
                self.state.is_modal_open = false;
                self.state.create_error = None;
                let _ = respond_to.send(());
            }
            ActionsMessage::ClearCreateStatus(respond_to) => {
                self.state.create_error = None;
                self.state.create_success = false;
                let _ = respond_to.send(());
            }
            ActionsMessage::Get(respond_to) => {
                let _ = respond_to.send(self.state.clone());
            }
        }
    }

    fn snapshot(&self) -> ActionsState {
        self.state.clone()
    }

    fn snapshot_message(respond_to: Response<ActionsState>) -> ActionsMessage {
        ActionsMessage::Get(respond_to)
    }
}

/// Creates a new Actions store and its client.
pub fn new(page_size: u32) -> (StoreActor<ActionsStore>, ActionsClient) {
    let (actor, mailbox, snapshots) =
        StoreActor::new(32, ActionsStore::new(ActionsState::new(page_size)));
    (actor, ActionsClient::new(mailbox, snapshots))
}
