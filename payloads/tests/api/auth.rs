use futures::future::join_all;
use payloads::requests::{self, ProductFilters};
use payloads::{ClientError, Product};
use reqwest::StatusCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn login_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let body = requests::LoginCredentials {
        username: "random".into(),
        password: "random".into(),
    };
    let result = app.client.login(&body).await;

    match result {
        Err(ClientError::APIError(code, text)) => {
            assert_eq!(code, StatusCode::UNAUTHORIZED);
            assert_eq!(text, "Invalid username or password.");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }
    // Bad credentials are not an expired token.
    assert_eq!(app.backend.refresh_calls(), 0);

    assert!(app.client.session_check().await?.is_none());

    Ok(())
}

#[tokio::test]
async fn login_and_session_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let profile = app.login_admin().await?;
    assert_eq!(profile.username, "admin");
    assert!(profile.is_staff);

    let current = app.client.session_check().await?;
    assert_eq!(current, Some(profile));

    Ok(())
}

#[tokio::test]
async fn logout_ends_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    app.client.logout().await?;

    assert!(app.client.session_check().await?.is_none());
    let result = app
        .client
        .list::<Product>(&ProductFilters::default(), 1, 20)
        .await;
    assert!(matches!(result, Err(ClientError::SessionExpired)));

    Ok(())
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(3).await?;

    app.backend.set_refresh_delay(Duration::from_millis(100));
    app.backend.expire_access_tokens();

    let filters = ProductFilters::default();
    let results = join_all(
        (0..8).map(|_| app.client.list::<Product>(&filters, 1, 20)),
    )
    .await;

    for result in results {
        assert_eq!(result?.items.len(), 3);
    }
    assert_eq!(app.backend.refresh_calls(), 1);
    assert_eq!(app.client.refresh_count(), 1);
    // Every request was replayed exactly once.
    assert_eq!(app.backend.requests_matching("GET /api/products/"), 16);

    Ok(())
}

#[tokio::test]
async fn rejected_refresh_expires_the_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let expired = Arc::new(AtomicUsize::new(0));
    let client = app.client.clone().on_session_expired({
        let expired = expired.clone();
        move || {
            expired.fetch_add(1, Ordering::SeqCst);
        }
    });

    app.backend.set_refresh_delay(Duration::from_millis(50));
    app.backend.fail_refresh(true);
    app.backend.expire_access_tokens();

    let filters = ProductFilters::default();
    let results =
        join_all((0..4).map(|_| client.list::<Product>(&filters, 1, 20))).await;

    for result in results {
        assert!(matches!(result, Err(ClientError::SessionExpired)));
    }
    assert_eq!(app.backend.refresh_calls(), 1);
    assert_eq!(expired.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn keepalive_refresh_goes_through_the_gate() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    app.backend.expire_access_tokens();
    app.client.refresh_session().await?;
    assert_eq!(app.backend.refresh_calls(), 1);

    // The fresh token is used without another refresh.
    app.client
        .list::<Product>(&ProductFilters::default(), 1, 20)
        .await?;
    assert_eq!(app.backend.refresh_calls(), 1);

    Ok(())
}

#[tokio::test]
async fn disabled_accounts_cannot_sign_in() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let user = app
        .client
        .create::<payloads::User>(&test_helpers::mock::clerk_details("riley"))
        .await?;
    app.client.deactivate_user(user.id).await?;

    let other = app.new_client();
    let result = other
        .login(&requests::LoginCredentials {
            username: "riley".into(),
            password: "Clerk-pass-2024".into(),
        })
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}
