use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use payloads::{
    ClientError, auth::AuthConfig, auth::AuthState, requests::LoginCredentials,
};
use test_helpers::spawn_app;

#[tokio::test]
async fn login_persists_the_session() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let user = app
        .client
        .login(&LoginCredentials {
            username: "alice".into(),
            password: "password".into(),
        })
        .await?;
    assert_eq!(user.username, "alice");
    assert!(user.is_admin);

    let session = app.client.session();
    assert!(session.token().is_some());
    assert_eq!(session.user(), Some(user));
    let state = AuthState::from_session(session, &AuthConfig::default());
    assert!(state.is_admin());

    Ok(())
}

#[tokio::test]
async fn bad_credentials_do_not_trigger_the_unauthorized_handler()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    let redirects = Arc::new(AtomicUsize::new(0));
    let counter = redirects.clone();
    let client = app.client.clone().with_unauthorized_handler(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let result = client
        .login(&LoginCredentials {
            username: "alice".into(),
            password: "wrong".into(),
        })
        .await;
    assert!(matches!(result, Err(ClientError::InvalidCredentials)));
    assert_eq!(redirects.load(Ordering::SeqCst), 0);
    assert!(client.session().token().is_none());

    Ok(())
}

#[tokio::test]
async fn rejected_token_clears_the_session_from_any_call()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_two_properties();
    let redirects = Arc::new(AtomicUsize::new(0));
    let counter = redirects.clone();
    let client = app.client.clone().with_unauthorized_handler(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    app.login_alice().await?;
    assert!(client.session().token().is_some());

    app.backend.revoke_tokens();
    let result = client.list_properties().await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(redirects.load(Ordering::SeqCst), 1);
    assert_eq!(client.session().token(), None);
    assert_eq!(client.session().user(), None);

    // the cleared session reads as anonymous again
    let state =
        AuthState::from_session(client.session(), &AuthConfig::default());
    assert_eq!(state, AuthState::Anonymous);
    assert_eq!(client.list_properties().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn validating_a_session_refreshes_the_user() -> anyhow::Result<()> {
    let app = spawn_app().await;
    assert_eq!(app.client.validate_session().await?, None);

    app.login_bob().await?;
    let user = app.client.validate_session().await?;
    assert_eq!(user.map(|u| u.username).as_deref(), Some("bob"));

    app.backend.revoke_tokens();
    assert!(matches!(
        app.client.validate_session().await,
        Err(ClientError::Unauthorized)
    ));
    assert!(app.client.session().token().is_none());

    Ok(())
}

#[tokio::test]
async fn logout_is_local_and_unconditional() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let before = app.backend.request_count();

    app.client.logout();
    app.client.logout();

    assert!(app.client.session().token().is_none());
    assert_eq!(app.backend.request_count(), before);

    Ok(())
}
