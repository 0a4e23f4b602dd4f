mod common;

use common::{MockBackend, admin_user, regular_user};
use shaya::auth::{AuthClient, Credentials};
use shaya::session::{Gate, LOGIN_ROUTE, SessionState, SessionStore};

#[tokio::test]
async fn login_renders_protected_page() {
    let backend = MockBackend::start().await;
    let mut store = SessionStore::new(AuthClient::new(backend.client()));
    assert_eq!(store.gate(), Gate::Pending);

    let credentials = Credentials::new("admin", "admin1").unwrap();
    let state = store.login(&credentials).await.unwrap();
    assert_eq!(state, &SessionState::Authenticated(admin_user()));
    assert_eq!(store.gate(), Gate::Render(&admin_user()));
    assert!(store.is_admin());

    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/api/v1/auth/login", "/api/v1/auth/me"]);
}

#[tokio::test]
async fn unauthorized_me_redirects_and_never_renders() {
    let backend = MockBackend::start().await;
    let mut store = SessionStore::new(AuthClient::new(backend.client()));
    store.refresh().await;
    assert_eq!(store.get(), &SessionState::Unauthenticated);
    assert_eq!(store.gate(), Gate::Redirect(LOGIN_ROUTE));
    assert_eq!(store.user(), None);

    store.refresh().await;
    assert!(!matches!(store.gate(), Gate::Render(_)));
}

#[tokio::test]
async fn failed_login_leaves_gate_closed() {
    let backend = MockBackend::start().await;
    let mut store = SessionStore::new(AuthClient::new(backend.client()));
    store.refresh().await;
    let credentials = Credentials::new("admin", "incorrecta").unwrap();
    assert!(store.login(&credentials).await.is_err());
    assert_eq!(store.gate(), Gate::Redirect("/login"));
}

#[tokio::test]
async fn logout_closes_gate() {
    let backend = MockBackend::start().await;
    let mut store = SessionStore::new(AuthClient::new(backend.admin_client().await));
    store.refresh().await;
    assert!(matches!(store.gate(), Gate::Render(_)));

    store.logout().await.unwrap();
    assert_eq!(store.gate(), Gate::Redirect(LOGIN_ROUTE));

    store.refresh().await;
    assert_eq!(store.gate(), Gate::Redirect(LOGIN_ROUTE));
}

#[tokio::test]
async fn regular_user_is_not_admin() {
    let backend = MockBackend::start().await;
    let mut store = SessionStore::new(AuthClient::new(backend.client()));
    store
        .login(&Credentials::new("maria", "maria123").unwrap())
        .await
        .unwrap();
    match store.gate() {
        Gate::Render(user) => assert_eq!(user, &regular_user()),
        other => panic!("expected render, got {:?}", other),
    }
    assert!(!store.is_admin());
}

#[tokio::test]
async fn clear_forgets_user_locally() {
    let backend = MockBackend::start().await;
    let mut store = SessionStore::new(AuthClient::new(backend.admin_client().await));
    store.refresh().await;
    store.clear();
    assert_eq!(store.gate(), Gate::Redirect(LOGIN_ROUTE));

    store.refresh().await;
    assert!(store.is_admin());
}

#[tokio::test]
async fn unreachable_backend_is_not_a_missing_login() {
    let client = shaya::http_utils::ShayaClient::new("http://127.0.0.1:9").unwrap();
    let mut store = SessionStore::new(AuthClient::new(client));
    store.refresh().await;
    assert_eq!(store.gate(), Gate::Redirect(LOGIN_ROUTE));
    assert!(matches!(store.last_error(), Some(shaya::ApiError::Transport(_))));
}

#[tokio::test]
async fn expired_session_is_unauthorized() {
    let backend = MockBackend::start().await;
    let mut store = SessionStore::new(AuthClient::new(backend.client()));
    store.refresh().await;
    assert!(store.last_error().is_some_and(shaya::ApiError::is_unauthorized));
}
