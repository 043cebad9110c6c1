//! Checkout, subscription view and profile endpoints driven through the
//! full router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;
use subscription_service::ports::{PaymentError, UserDirectory};

// ════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn checkout_returns_session_url() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/subscriptions/checkout/",
            Some(FREE_TOKEN),
            Some(json!({ "price_id": "price_monthly" })),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json["url"].as_str().unwrap().starts_with("https://checkout.stripe.com/"));

    let requests = app.payments.checkout_requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent.price_id, "price_monthly");
    assert_eq!(sent.customer_email, "user-free@test.example.com");
    assert_eq!(sent.success_url, format!("{}/dashboard", BASE_URL));
    assert_eq!(sent.cancel_url, format!("{}/", BASE_URL));
    assert!(sent.automatic_tax);
    assert!(sent.allow_promotion_codes);
}

#[tokio::test]
async fn checkout_provisions_caller_for_webhook_matching() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/subscriptions/checkout/",
            Some(FREE_TOKEN),
            Some(json!({ "price_id": "price_monthly" })),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let found = app
        .directory
        .find_by_email("user-free@test.example.com")
        .await
        .unwrap();
    assert_eq!(found, Some(user_id(FREE_USER)));
}

#[tokio::test]
async fn checkout_without_price_is_400_with_error_body() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/subscriptions/checkout/",
            Some(FREE_TOKEN),
            Some(json!({})),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "price_id is required");
    assert!(app.payments.checkout_requests().is_empty());
}

#[tokio::test]
async fn checkout_provider_error_surfaces_message() {
    let app = TestApp::new().await;
    app.payments
        .set_error(PaymentError::invalid_request("No such price: 'price_gone'"));

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/subscriptions/checkout/",
            Some(FREE_TOKEN),
            Some(json!({ "price_id": "price_gone" })),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No such price: 'price_gone'");
}

#[tokio::test]
async fn checkout_requires_authentication() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/subscriptions/checkout/",
            None,
            Some(json!({ "price_id": "price_monthly" })),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_401() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/subscriptions/checkout/",
            Some("forged"),
            Some(json!({ "price_id": "price_monthly" })),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "AUTH_ERROR");
}

// ════════════════════════════════════════════════════════════════════════════
// Subscription view
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn subscribed_user_sees_own_record() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request(
            "GET",
            "/api/subscriptions/subscription/",
            Some(PAID_TOKEN),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["id"].is_string());
    assert!(json["created_at"].is_string());
    assert!(json.get("stripe_subscription_id").is_none());
}

#[tokio::test]
async fn user_without_record_is_forbidden() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request(
            "GET",
            "/api/subscriptions/subscription/",
            Some(FREE_TOKEN),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "NOT_SUBSCRIBED");
}

#[tokio::test]
async fn anonymous_subscription_view_is_401() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(json_request("GET", "/api/subscriptions/subscription/", None, None))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ════════════════════════════════════════════════════════════════════════════
// Profile
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn profile_starts_empty() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request("GET", "/api/accounts/profile/", Some(PAID_TOKEN), None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], PAID_USER);
    assert_eq!(json["email"], "user-paid@test.example.com");
    assert!(json["display_name"].is_null());
    assert!(json["bio"].is_null());
    assert!(json["updated_at"].is_null());
}

#[tokio::test]
async fn put_replaces_and_patch_merges() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request(
            "PUT",
            "/api/accounts/profile/",
            Some(PAID_TOKEN),
            Some(json!({ "display_name": "Ada", "bio": "Mathematician" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display_name"], "Ada");
    assert!(json["updated_at"].is_string());

    let (status, json) = app
        .send(json_request(
            "PATCH",
            "/api/accounts/profile/",
            Some(PAID_TOKEN),
            Some(json!({ "bio": "Analyst" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display_name"], "Ada");
    assert_eq!(json["bio"], "Analyst");

    let (status, json) = app
        .send(json_request(
            "PUT",
            "/api/accounts/profile/",
            Some(PAID_TOKEN),
            Some(json!({ "display_name": "Ada L." })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display_name"], "Ada L.");
    assert!(json["bio"].is_null());

    let (_, json) = app
        .send(json_request("GET", "/api/accounts/profile/", Some(PAID_TOKEN), None))
        .await;
    assert_eq!(json["display_name"], "Ada L.");
}

#[tokio::test]
async fn overlong_display_name_is_400() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(json_request(
            "PATCH",
            "/api/accounts/profile/",
            Some(PAID_TOKEN),
            Some(json!({ "display_name": "x".repeat(151) })),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_FAILED");
    assert_eq!(json["details"]["field"], "display_name");
}

#[tokio::test]
async fn malformed_profile_body_is_400() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(json_request(
            "PUT",
            "/api/accounts/profile/",
            Some(PAID_TOKEN),
            Some(json!({ "display_name": 42 })),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_is_forbidden_without_subscription() {
    let app = TestApp::new().await;

    for method in ["GET", "PUT", "PATCH"] {
        let body = (method != "GET").then(|| json!({ "display_name": "Eve" }));
        let (status, _) = app
            .send(json_request(method, "/api/accounts/profile/", Some(FREE_TOKEN), body))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} should be gated", method);
    }
}

#[tokio::test]
async fn losing_subscription_revokes_profile_access() {
    let app = TestApp::new().await;
    let body = event_body(
        "customer.subscription.deleted",
        json!({ "id": "sub_paid" }),
        false,
    );
    let (status, _) = app.send(signed_webhook(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(json_request("GET", "/api/accounts/profile/", Some(PAID_TOKEN), None))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
