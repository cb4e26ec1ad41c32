mod auth;
mod controller;
mod resources;

use payloads::{APIClient, ClientError};
use test_helpers::spawn_app;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.client.health_check().await?;

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
    // Bind and release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")?
        .local_addr()?
        .port();
    let client = APIClient::new(
        format!("http://127.0.0.1:{port}/api"),
        reqwest::Client::new(),
    );

    let error = client.health_check().await.err();
    assert!(matches!(error, Some(ClientError::Network(_))), "{error:?}");
    let message = error.map(|e| e.user_message());
    assert_eq!(
        message.as_deref(),
        Some("Network error. Please check your connection.")
    );

    Ok(())
}
