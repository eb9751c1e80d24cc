use actions_dashboard::api::mock::{expect_login, mock_auth_api, ScriptedApi};
use actions_dashboard::api::{ApiError, AuthApi};
use actions_dashboard::clients::{SessionClient, StoreClient};
use actions_dashboard::model::{Credentials, LoginResponse, User};
use actions_dashboard::session_store::{SessionContext, SessionError, NO_TOKEN_MESSAGE};
use actions_dashboard::storage::{KeyValueStore, MemoryStore, TOKEN_KEY};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinHandle;

fn start(auth: impl AuthApi + 'static, storage: Arc<MemoryStore>) -> (SessionClient, JoinHandle<()>) {
    let (actor, client) = actions_dashboard::session_store::new(storage.as_ref());
    let handle = tokio::spawn(actor.run(SessionContext {
        auth: Arc::new(auth),
        storage,
    }));
    (client, handle)
}

fn admin() -> Credentials {
    Credentials::new("admin@example.com", "secret1")
}

#[tokio::test]
async fn test_session_is_restored_from_storage() {
    let storage = Arc::new(MemoryStore::with_token("persisted"));
    let (client, handle) = start(ScriptedApi::new(), storage);

    assert!(client.is_authenticated());
    assert_eq!(client.get().await.unwrap().token.as_deref(), Some("persisted"));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_login_persists_token_and_user() {
    let api = ScriptedApi::new();
    api.expect_login().return_ok(
        LoginResponse::from_value(json!({
            "token": "t-1",
            "user": { "id": "u1", "email": "admin@example.com" }
        }))
        .unwrap(),
    );
    let storage = Arc::new(MemoryStore::new());
    let (client, handle) = start(api.clone(), storage.clone());

    client.login(admin()).await.unwrap();

    let state = client.get().await.unwrap();
    assert!(state.is_authenticated());
    assert!(!state.is_loading);
    assert_eq!(state.user.map(|u: User| u.email).as_deref(), Some("admin@example.com"));
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t-1"));
    assert_eq!(api.logins(), vec![admin()]);
    api.verify();

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_bare_string_token_is_accepted() {
    let api = ScriptedApi::new();
    api.expect_login()
        .return_ok(LoginResponse::from_value(json!("bare-token")).unwrap());
    let storage = Arc::new(MemoryStore::new());
    let (client, handle) = start(api, storage.clone());

    client.login(admin()).await.unwrap();
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("bare-token"));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_failed_login_clears_token_and_reports_message() {
    let api = ScriptedApi::new();
    api.expect_login()
        .return_err(ApiError::from_response(401, r#"{"message":"Invalid credentials"}"#));
    let storage = Arc::new(MemoryStore::with_token("old"));
    let (client, handle) = start(api, storage.clone());

    let err = client.login(admin()).await.unwrap_err();
    assert_eq!(err, SessionError::LoginFailed("Invalid credentials".into()));

    let state = client.get().await.unwrap();
    assert!(!state.is_authenticated());
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert_eq!(storage.get(TOKEN_KEY), None);

    client.clear_error().await.unwrap();
    assert_eq!(client.get().await.unwrap().error, None);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_success_without_token_is_a_failure() {
    let api = ScriptedApi::new();
    api.expect_login().return_ok(LoginResponse::default());
    let (client, handle) = start(api, Arc::new(MemoryStore::new()));

    let err = client.login(admin()).await.unwrap_err();
    assert_eq!(err, SessionError::LoginFailed(NO_TOKEN_MESSAGE.into()));
    assert!(!client.get().await.unwrap().is_authenticated());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_malformed_credentials_are_rejected_locally() {
    let api = ScriptedApi::new();
    let (client, handle) = start(api.clone(), Arc::new(MemoryStore::new()));

    let err = client
        .login(Credentials::new("not-an-email", "123"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Invalid(_)));
    assert!(api.logins().is_empty());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let storage = Arc::new(MemoryStore::with_token("persisted"));
    let (client, handle) = start(ScriptedApi::new(), storage.clone());

    client.logout().await.unwrap();
    let once = client.get().await.unwrap();
    client.logout().await.unwrap();
    let twice = client.get().await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.token, None);
    assert!(!twice.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY), None);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_logout_during_login_wins() {
    let (api, mut calls) = mock_auth_api(4);
    let storage = Arc::new(MemoryStore::new());
    let (client, handle) = start(api, storage.clone());

    let login = tokio::spawn({
        let client = client.clone();
        async move { client.login(admin()).await }
    });
    let (_, reply) = expect_login(&mut calls).await.expect("Expected Login call");

    client.logout().await.unwrap();
    reply
        .send(Ok(LoginResponse::from_value(json!({ "token": "late" })).unwrap()))
        .unwrap();

    assert_eq!(login.await.unwrap(), Err(SessionError::Superseded));
    assert!(!client.get().await.unwrap().is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY), None);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_check_auth_follows_storage() {
    let storage = Arc::new(MemoryStore::new());
    let (client, handle) = start(ScriptedApi::new(), storage.clone());
    assert!(!client.check_auth().await.unwrap());

    storage.set(TOKEN_KEY, "from-another-tab").unwrap();
    assert!(client.check_auth().await.unwrap());

    storage.remove(TOKEN_KEY).unwrap();
    assert!(!client.check_auth().await.unwrap());
    assert!(!client.get().await.unwrap().is_authenticated());

    drop(client);
    handle.await.unwrap();
}
