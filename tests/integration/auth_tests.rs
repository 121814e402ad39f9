//! Authentication flows: sign-in, current-user resolution, and LinkedIn
//! token handling.

use postpilot::backend::client::BackendClient;
use postpilot::linkedin::LinkedInClient;
use postpilot::session::Session;
use postpilot::AppError;

use super::fake_backend::{
    FakeBackend, BACKEND_TOKEN, EXTERNAL_USER_ID, SIGN_IN_PASSWORD, USER_ID,
};

#[tokio::test]
async fn sign_in_exchanges_credentials_for_a_token() {
    let backend = FakeBackend::start().await;
    let session = Session::new(String::new(), None);
    let client = BackendClient::new(&backend.config(), session).expect("client");

    let token = client
        .sign_in("operator@example.com", SIGN_IN_PASSWORD)
        .await
        .expect("valid credentials");
    assert_eq!(token, BACKEND_TOKEN);
}

#[tokio::test]
async fn sign_in_with_bad_credentials_is_an_auth_error() {
    let backend = FakeBackend::start().await;
    let session = Session::new(String::new(), None);
    let client = BackendClient::new(&backend.config(), session).expect("client");

    let err = client
        .sign_in("operator@example.com", "wrong")
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn current_user_resolves_with_the_bearer_token() {
    let backend = FakeBackend::start().await;
    let client =
        BackendClient::new(&backend.config(), backend.authed_session()).expect("client");

    let user = client.current_user().await.expect("authenticated");
    assert_eq!(user.id, USER_ID);
}

#[tokio::test]
async fn current_user_with_a_bad_token_is_an_auth_error() {
    let backend = FakeBackend::start().await;
    let session = Session::new("stale-token".to_owned(), None);
    let client = BackendClient::new(&backend.config(), session).expect("client");

    let err = client.current_user().await.expect_err("must fail");
    assert!(matches!(err, AppError::Auth(_)));
}

#[tokio::test]
async fn profile_id_returns_the_sub_field() {
    let backend = FakeBackend::start().await;
    let client =
        LinkedInClient::new(&backend.config(), backend.authed_session()).expect("client");

    let id = client.profile_id().await.expect("profile resolves");
    assert_eq!(id, EXTERNAL_USER_ID);
}

#[tokio::test]
async fn profile_without_a_token_fails_before_any_request() {
    let backend = FakeBackend::start().await;
    let session = Session::new(BACKEND_TOKEN.to_owned(), None);
    let client = LinkedInClient::new(&backend.config(), session).expect("client");

    let err = client.profile_id().await.expect_err("must fail");
    assert!(matches!(err, AppError::Auth(_)));
    // The backend never saw a request.
    assert!(backend.state.lock().await.linkedin_posts.is_empty());
}

#[tokio::test]
async fn token_delivered_mid_session_unlocks_linkedin_calls() {
    let backend = FakeBackend::start().await;
    let session = Session::new(BACKEND_TOKEN.to_owned(), None);
    let client = LinkedInClient::new(&backend.config(), session.clone()).expect("client");

    assert!(client.profile_id().await.is_err());

    session
        .set_linkedin_token(super::fake_backend::LINKEDIN_TOKEN.to_owned())
        .await;
    let id = client.profile_id().await.expect("token now accepted");
    assert_eq!(id, EXTERNAL_USER_ID);
}
