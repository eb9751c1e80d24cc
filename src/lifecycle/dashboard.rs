use crate::actions_store::{ActionsContext, ActionsError, FetchOutcome};
use crate::api::{ActionsApi, ApiError, AuthApi, AuthGuard, HttpApi, Navigator, Route};
use crate::clients::{ActionsClient, NotificationClient, SessionClient, StoreClient};
use crate::config::{Config, ConfigError};
use crate::framework::{Scheduler, TokioScheduler, WeakMailbox};
use crate::model::{ActionForm, Credentials};
use crate::notification_store::{NotificationContext, NotificationError};
use crate::session_store::{SessionContext, SessionError, SessionMessage};
use crate::storage::{FileStore, KeyValueStore, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Toast shown after a successful create.
pub const CREATED_MESSAGE: &str = "Action created successfully";

/// Errors surfaced by the [`Dashboard`] flows.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Actions(#[from] ActionsError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("HTTP client error: {0}")]
    Api(#[from] ApiError),

    #[error("Store task failed: {0}")]
    Shutdown(String),
}

/// The external collaborators the stores are wired to.
pub struct Collaborators {
    pub auth: Arc<dyn AuthApi>,
    pub actions: Arc<dyn ActionsApi>,
    pub storage: Arc<dyn KeyValueStore>,
    pub scheduler: Arc<dyn Scheduler>,
}

/// Tracks the current screen.
///
/// A forced redirect to the login screen also asks the session store to re-read the
/// persisted token, so the store notices a session the auth guard just ended.
pub struct RouteNavigator {
    route: watch::Sender<Route>,
    session: WeakMailbox<SessionMessage>,
}

impl Navigator for RouteNavigator {
    fn navigate(&self, route: Route) {
        let previous = self.route.send_replace(route);
        if previous != route {
            info!(from = previous.path(), to = route.path(), "Navigate");
        }
        if route == Route::Login {
            // Fails only once the session store is gone.
            let _ = self.session.deliver(SessionMessage::CheckAuth(None));
        }
    }
}

/// The runtime orchestrator of the dashboard.
///
/// `Dashboard` is responsible for:
/// - **Lifecycle Management**: starting the session, actions and notification stores and
///   stopping them again
/// - **Dependency Wiring**: giving the actions store an API wrapped in the [`AuthGuard`],
///   whose redirects land in this dashboard's route
/// - **Page Flows**: the login, logout and create sequences the screens perform
///
/// # Example
///
/// ```ignore
/// let dashboard = Dashboard::new(&Config::from_env()?)?;
///
/// dashboard.login(Credentials::new("admin@example.com", "secret1")).await?;
/// dashboard.actions.set_page(2).await?;
/// dashboard.create_action(ActionForm::new("Recycle", "Sort the weekly trash")).await?;
///
/// dashboard.shutdown().await?;
/// ```
pub struct Dashboard {
    pub session: SessionClient,
    pub actions: ActionsClient,
    pub notifications: NotificationClient,
    navigator: Arc<RouteNavigator>,
    route: watch::Receiver<Route>,
    handles: Vec<JoinHandle<()>>,
}

impl Dashboard {
    /// Wires the stores to the real backend, a token file and real timers.
    pub fn new(config: &Config) -> Result<Self, DashboardError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.token_path)?);
        let http = Arc::new(HttpApi::new(config, storage.clone())?);
        let parts = Collaborators {
            auth: http.clone(),
            actions: http,
            storage,
            scheduler: Arc::new(TokioScheduler),
        };
        Ok(Self::with_parts(parts, config.page_size))
    }

    /// Wires the stores to injected collaborators. Must be called inside a Tokio runtime.
    pub fn with_parts(parts: Collaborators, page_size: u32) -> Self {
        // 1. Create stores (the session is restored from storage here)
        let (session_actor, session) = crate::session_store::new(parts.storage.as_ref());
        let (actions_actor, actions) = crate::actions_store::new(page_size);
        let (notification_actor, notifications) = crate::notification_store::new();

        // 2. Start on the screen the restored session allows
        let initial = if session.is_authenticated() {
            Route::Dashboard
        } else {
            Route::Login
        };
        let (route_sender, route) = watch::channel(initial);
        let navigator = Arc::new(RouteNavigator {
            route: route_sender,
            session: session.mailbox().downgrade(),
        });

        // 3. Start stores with injected context
        let guarded = AuthGuard::new(parts.actions, parts.storage.clone(), navigator.clone());
        let session_handle = tokio::spawn(session_actor.run(SessionContext {
            auth: parts.auth,
            storage: parts.storage,
        }));
        let actions_handle = tokio::spawn(actions_actor.run(ActionsContext {
            api: Arc::new(guarded),
        }));
        let notification_handle = tokio::spawn(notification_actor.run(NotificationContext {
            scheduler: parts.scheduler,
        }));

        info!(route = initial.path(), "Dashboard started");
        Self {
            session,
            actions,
            notifications,
            navigator,
            route,
            handles: vec![session_handle, actions_handle, notification_handle],
        }
    }

    pub fn route(&self) -> Route {
        *self.route.borrow()
    }

    /// A receiver notified on every navigation.
    pub fn routes(&self) -> watch::Receiver<Route> {
        self.route.clone()
    }

    /// Log in, move to the dashboard screen and load its first view.
    pub async fn login(&self, credentials: Credentials) -> Result<FetchOutcome, DashboardError> {
        self.session.login(credentials).await?;
        self.navigator.navigate(Route::Dashboard);
        Ok(self.actions.fetch_page(None, None).await?)
    }

    /// Log out and return to the login screen.
    pub async fn logout(&self) -> Result<(), DashboardError> {
        self.session.logout().await?;
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Submit the create form and report the result as a toast.
    ///
    /// Forms rejected by validation produce no toast; their errors belong next to the fields.
    pub async fn create_action(&self, form: ActionForm) -> Result<(), DashboardError> {
        match self.actions.create_item(form).await {
            Ok(()) => {
                self.notifications.success(CREATED_MESSAGE).await?;
                self.actions.clear_create_status().await?;
                Ok(())
            }
            Err(ActionsError::Invalid(errors)) => Err(ActionsError::Invalid(errors).into()),
            Err(e) => {
                self.notifications.error(e.to_string()).await?;
                Err(e.into())
            }
        }
    }

    /// Gracefully shuts down every store.
    ///
    /// Dropping the clients closes the mailboxes. Each store finishes the work already in
    /// flight, then exits its loop.
    pub async fn shutdown(self) -> Result<(), DashboardError> {
        info!("Shutting down dashboard...");

        drop(self.session);
        drop(self.actions);
        drop(self.notifications);
        drop(self.navigator);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(DashboardError::Shutdown(e.to_string()));
            }
        }

        info!("Dashboard shutdown complete.");
        Ok(())
    }
}
