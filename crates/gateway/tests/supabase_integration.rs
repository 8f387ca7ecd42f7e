use cryptoiq_core::identity::error::IdentityError;
use cryptoiq_core::identity::port::IdentityProvider;
use cryptoiq_gateway::supabase::SupabaseIdentity;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn identity(server: &MockServer) -> anyhow::Result<SupabaseIdentity> {
    Ok(SupabaseIdentity::new(
        server.uri(),
        "service-key",
        Duration::from_secs(2),
    )?)
}

#[tokio::test]
async fn test_valid_token_resolves_user() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer good-token"))
        .and(header("apikey", "service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "email": "ada@example.com",
            "role": "authenticated"
        })))
        .mount(&server)
        .await;

    let user = identity(&server).await?.verify_token("good-token").await?;
    assert_eq!(user.id, "user-1");
    assert_eq!(user.email, "ada@example.com");
    Ok(())
}

#[tokio::test]
async fn test_rejected_token_is_invalid() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "invalid JWT" })))
        .mount(&server)
        .await;

    let result = identity(&server).await?.verify_token("expired").await;
    assert!(matches!(result, Err(IdentityError::InvalidToken)));
    Ok(())
}

#[tokio::test]
async fn test_empty_token_skips_request() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = identity(&server).await?.verify_token("  ").await;
    assert!(matches!(result, Err(IdentityError::InvalidToken)));
    Ok(())
}

#[tokio::test]
async fn test_identity_outage_is_upstream_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = identity(&server).await?.verify_token("token").await;
    assert!(matches!(result, Err(IdentityError::Upstream(_))));
    Ok(())
}
