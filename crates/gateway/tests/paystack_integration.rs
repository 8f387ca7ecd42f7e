use cryptoiq_core::payment::entity::CheckoutRequest;
use cryptoiq_core::payment::error::PaymentError;
use cryptoiq_core::payment::port::PaymentGateway;
use cryptoiq_gateway::paystack::PaystackGateway;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checkout() -> CheckoutRequest {
    CheckoutRequest {
        email: "ada@example.com".to_string(),
        amount: 500_000,
        currency: "NGN".to_string(),
        reference: "cryptoiq_abc".to_string(),
        callback_url: "http://localhost:5173/payment/callback".to_string(),
        user_id: "user-1".to_string(),
    }
}

/// # Summary
/// 初始化交易时携带密钥、金额与 metadata.user_id。
#[tokio::test]
async fn test_initialize_sends_owner_metadata() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .and(header("authorization", "Bearer sk_test_1"))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "amount": 500000,
            "reference": "cryptoiq_abc",
            "metadata": { "user_id": "user-1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.paystack.com/xyz",
                "access_code": "xyz",
                "reference": "cryptoiq_abc"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = PaystackGateway::new(server.uri(), "sk_test_1", Duration::from_secs(2))?;
    let session = gateway.initialize(&checkout()).await?;
    assert_eq!(session.authorization_url, "https://checkout.paystack.com/xyz");
    assert_eq!(session.reference, "cryptoiq_abc");
    Ok(())
}

#[tokio::test]
async fn test_initialize_rejected_by_provider() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": false,
            "message": "Invalid key"
        })))
        .mount(&server)
        .await;

    let gateway = PaystackGateway::new(server.uri(), "bad", Duration::from_secs(2))?;
    let result = gateway.initialize(&checkout()).await;
    assert!(matches!(result, Err(PaymentError::Rejected(msg)) if msg == "Invalid key"));
    Ok(())
}

#[tokio::test]
async fn test_verify_maps_transaction() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/cryptoiq_abc"))
        .and(header("authorization", "Bearer sk_test_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Verification successful",
            "data": {
                "reference": "cryptoiq_abc",
                "status": "success",
                "amount": 500000,
                "currency": "NGN",
                "channel": "card",
                "metadata": { "user_id": "user-1" },
                "customer": { "email": "ada@example.com" }
            }
        })))
        .mount(&server)
        .await;

    let gateway = PaystackGateway::new(server.uri(), "sk_test_1", Duration::from_secs(2))?;
    let tx = gateway.verify("cryptoiq_abc").await?;
    assert!(tx.is_successful());
    assert_eq!(tx.amount, 500_000);
    assert_eq!(tx.channel, "card");
    assert_eq!(tx.user_id.as_deref(), Some("user-1"));
    assert_eq!(tx.customer_email.as_deref(), Some("ada@example.com"));
    Ok(())
}

#[tokio::test]
async fn test_verify_unknown_reference() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transaction/verify/missing"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": false,
            "message": "Transaction reference not found"
        })))
        .mount(&server)
        .await;

    let gateway = PaystackGateway::new(server.uri(), "sk_test_1", Duration::from_secs(2))?;
    assert!(matches!(
        gateway.verify("missing").await,
        Err(PaymentError::Rejected(_))
    ));
    Ok(())
}
