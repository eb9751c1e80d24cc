use crate::actions_store::{ActionsError, ActionsMessage, ActionsState, ActionsStore, FetchOutcome};
use crate::clients::StoreClient;
use crate::framework::Mailbox;
use crate::model::{Action, ActionForm, PaginationView};
use crate::validation::validate_action_form;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Client for interacting with the Actions store.
///
/// The fetch methods resolve once their request has settled. A fetch overtaken by a later
/// one resolves with [`FetchOutcome::Superseded`] and leaves the state alone.
#[derive(Clone)]
pub struct ActionsClient {
    mailbox: Mailbox<ActionsMessage>,
    snapshots: watch::Receiver<ActionsState>,
}

impl ActionsClient {
    pub fn new(mailbox: Mailbox<ActionsMessage>, snapshots: watch::Receiver<ActionsState>) -> Self {
        Self { mailbox, snapshots }
    }

    /// Fetch a page. Omitted values default to the stored page and page size.
    #[instrument(skip(self))]
    pub async fn fetch_page(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<FetchOutcome, ActionsError> {
        debug!("Sending request");
        Ok(self
            .mailbox
            .request(|respond_to| ActionsMessage::Fetch {
                page,
                page_size,
                respond_to,
            })
            .await?)
    }

    /// Go to page `page` (one-based) with the stored page size.
    #[instrument(skip(self))]
    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome, ActionsError> {
        if page == 0 {
            return Err(ActionsError::InvalidPagination("pages start at 1".into()));
        }
        Ok(self
            .mailbox
            .request(|respond_to| ActionsMessage::SetPage { page, respond_to })
            .await?)
    }

    /// Change the page size and go back to the first page.
    #[instrument(skip(self))]
    pub async fn set_page_size(&self, page_size: u32) -> Result<FetchOutcome, ActionsError> {
        if page_size == 0 {
            return Err(ActionsError::InvalidPagination("page size must be positive".into()));
        }
        Ok(self
            .mailbox
            .request(|respond_to| ActionsMessage::SetPageSize {
                page_size,
                respond_to,
            })
            .await?)
    }

    /// Create an action. On success the modal closes and the current page is fetched again.
    ///
    /// Forms failing the form rules are rejected here and never reach the store.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_item(&self, form: ActionForm) -> Result<(), ActionsError> {
        validate_action_form(&form)?;
        debug!(?form, "create_item called");
        self.mailbox
            .request(|respond_to| ActionsMessage::Create { form, respond_to })
            .await?
    }

    pub async fn open_modal(&self) -> Result<(), ActionsError> {
        Ok(self.mailbox.request(ActionsMessage::OpenModal).await?)
    }

    pub async fn close_modal(&self) -> Result<(), ActionsError> {
        Ok(self.mailbox.request(ActionsMessage::CloseModal).await?)
    }

    pub async fn clear_create_status(&self) -> Result<(), ActionsError> {
        Ok(self.mailbox.request(ActionsMessage::ClearCreateStatus).await?)
    }

    /// Pagination controls derived from the latest state.
    pub fn pagination(&self) -> PaginationView {
        self.snapshots.borrow().pagination()
    }

    /// Loaded items matching a search term.
    pub fn filtered(&self, term: &str) -> Vec<Action> {
        self.snapshots.borrow().filtered(term)
    }
}

impl StoreClient<ActionsStore> for ActionsClient {
    type Error = ActionsError;

    fn mailbox(&self) -> &Mailbox<ActionsMessage> {
        &self.mailbox
    }

    fn snapshots(&self) -> &watch::Receiver<ActionsState> {
        &self.snapshots
    }
}
