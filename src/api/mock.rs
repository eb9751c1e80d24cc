//! # Mock Collaborators
//!
//! Test doubles for the backend and the navigator.
//!
//! Two styles are offered:
//!
//! - [`ScriptedApi`]: queue up answers with a fluent API, then [`ScriptedApi::verify`] that
//!   every one was consumed. Best when the order of calls is fixed.
//! - [`mock_actions_api`] / [`mock_auth_api`]: every call is handed to the test through a
//!   channel and stays pending until the test answers it. Best when the test must control
//!   *when* calls settle (e.g. an older fetch resolving after a newer one).

use super::{ActionsApi, ApiError, AuthApi, Navigator, Route};
use crate::model::{ActionForm, Credentials, LoginResponse, PageQuery};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    Login(Result<LoginResponse, ApiError>),
    List(Result<Value, ApiError>),
    Create(Result<Value, ApiError>),
}

impl Expectation {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::Login(_) => "login",
            Expectation::List(_) => "list",
            Expectation::Create(_) => "create",
        }
    }
}

#[derive(Default)]
struct Script {
    expectations: VecDeque<Expectation>,
    queries: Vec<PageQuery>,
    forms: Vec<ActionForm>,
    logins: Vec<Credentials>,
}

/// An [`AuthApi`] + [`ActionsApi`] answering from a queue of expectations.
///
/// # Example
/// ```ignore
/// let api = ScriptedApi::new();
/// api.expect_list().return_ok(json!([]));
/// api.expect_create().return_err(ApiError::from_response(400, "Name taken"));
/// // hand `api.clone()` to the stores...
/// api.verify();
/// ```
///
/// # Panics
/// A call that does not match the next expectation panics, failing the test.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_login(&self) -> ExpectationBuilder<LoginResponse> {
        ExpectationBuilder::new(self.script.clone(), Expectation::Login)
    }

    pub fn expect_list(&self) -> ExpectationBuilder<Value> {
        ExpectationBuilder::new(self.script.clone(), Expectation::List)
    }

    pub fn expect_create(&self) -> ExpectationBuilder<Value> {
        ExpectationBuilder::new(self.script.clone(), Expectation::Create)
    }

    /// Every listing query received so far.
    pub fn queries(&self) -> Vec<PageQuery> {
        self.lock().queries.clone()
    }

    /// Every create form received so far.
    pub fn forms(&self) -> Vec<ActionForm> {
        self.lock().forms.clone()
    }

    /// Every login attempt received so far.
    pub fn logins(&self) -> Vec<Credentials> {
        self.lock().logins.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let script = self.lock();
        if !script.expectations.is_empty() {
            let remaining: Vec<_> = script.expectations.iter().map(Expectation::kind).collect();
            panic!("Not all expectations were met. Remaining: {remaining:?}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next(&self, called: &'static str) -> Expectation {
        match self.lock().expectations.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {called} call: no expectation left"),
        }
    }
}

/// Builder for one queued answer.
pub struct ExpectationBuilder<T> {
    script: Arc<Mutex<Script>>,
    wrap: fn(Result<T, ApiError>) -> Expectation,
}

impl<T> ExpectationBuilder<T> {
    fn new(script: Arc<Mutex<Script>>, wrap: fn(Result<T, ApiError>) -> Expectation) -> Self {
        Self { script, wrap }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, ApiError>) {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        script.expectations.push_back((self.wrap)(response));
    }
}

#[async_trait]
impl AuthApi for ScriptedApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.lock().logins.push(credentials.clone());
        match self.next("login") {
            Expectation::Login(response) => response,
            other => panic!("Unexpected login call: expected {}", other.kind()),
        }
    }
}

#[async_trait]
impl ActionsApi for ScriptedApi {
    async fn list(&self, query: PageQuery) -> Result<Value, ApiError> {
        self.lock().queries.push(query);
        match self.next("list") {
            Expectation::List(response) => response,
            other => panic!("Unexpected list call: expected {}", other.kind()),
        }
    }

    async fn create(&self, form: &ActionForm) -> Result<Value, ApiError> {
        self.lock().forms.push(form.clone());
        match self.next("create") {
            Expectation::Create(response) => response,
            other => panic!("Unexpected create call: expected {}", other.kind()),
        }
    }
}

// =============================================================================
// CHANNEL-BACKED MOCKS
// =============================================================================

/// Responder handed to the test for a pending call.
pub type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

/// A call received by [`MockActionsApi`].
#[derive(Debug)]
pub enum ActionsCall {
    List {
        query: PageQuery,
        respond_to: Reply<Value>,
    },
    Create {
        form: ActionForm,
        respond_to: Reply<Value>,
    },
}

/// A call received by [`MockAuthApi`].
#[derive(Debug)]
pub struct LoginCall {
    pub credentials: Credentials,
    pub respond_to: Reply<LoginResponse>,
}

/// [`ActionsApi`] whose calls are answered by the test. See [`mock_actions_api`].
#[derive(Clone)]
pub struct MockActionsApi {
    sender: mpsc::Sender<ActionsCall>,
}

/// [`AuthApi`] whose calls are answered by the test. See [`mock_auth_api`].
#[derive(Clone)]
pub struct MockAuthApi {
    sender: mpsc::Sender<LoginCall>,
}

/// Creates a mock actions API and the receiver its calls arrive on.
///
/// # Testing Strategy
/// A call stays pending until the test sends on its responder, so the test decides the
/// order in which overlapping calls settle. Dropping a responder fails the call with a
/// transport error.
pub fn mock_actions_api(buffer_size: usize) -> (MockActionsApi, mpsc::Receiver<ActionsCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockActionsApi { sender }, receiver)
}

/// Creates a mock auth API and the receiver its calls arrive on.
pub fn mock_auth_api(buffer_size: usize) -> (MockAuthApi, mpsc::Receiver<LoginCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockAuthApi { sender }, receiver)
}

async fn forward<C, T>(
    sender: &mpsc::Sender<C>,
    make: impl FnOnce(Reply<T>) -> C,
) -> Result<T, ApiError> {
    let (respond_to, response) = oneshot::channel();
    sender
        .send(make(respond_to))
        .await
        .map_err(|_| ApiError::Transport("mock receiver dropped".into()))?;
    response
        .await
        .map_err(|_| ApiError::Transport("mock responder dropped".into()))?
}

#[async_trait]
impl ActionsApi for MockActionsApi {
    async fn list(&self, query: PageQuery) -> Result<Value, ApiError> {
        forward(&self.sender, |respond_to| ActionsCall::List { query, respond_to }).await
    }

    async fn create(&self, form: &ActionForm) -> Result<Value, ApiError> {
        let form = form.clone();
        forward(&self.sender, |respond_to| ActionsCall::Create { form, respond_to }).await
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let credentials = credentials.clone();
        forward(&self.sender, |respond_to| LoginCall {
            credentials,
            respond_to,
        })
        .await
    }
}

/// Helper to verify that the next call is a listing request.
pub async fn expect_list(
    receiver: &mut mpsc::Receiver<ActionsCall>,
) -> Option<(PageQuery, Reply<Value>)> {
    match receiver.recv().await {
        Some(ActionsCall::List { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a create request.
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<ActionsCall>,
) -> Option<(ActionForm, Reply<Value>)> {
    match receiver.recv().await {
        Some(ActionsCall::Create { form, respond_to }) => Some((form, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a login request.
pub async fn expect_login(
    receiver: &mut mpsc::Receiver<LoginCall>,
) -> Option<(Credentials, Reply<LoginResponse>)> {
    receiver
        .recv()
        .await
        .map(|call| (call.credentials, call.respond_to))
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// A [`Navigator`] that only records where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(route);
    }
}
