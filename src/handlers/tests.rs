// Tests for the partner gateway handlers
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use crate::handlers::configure_routes;
use crate::testing::TestFixtures;

async fn post_json(
    path: &str,
    body: Value,
    relay: &crate::relay::LoginRelay,
) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(relay.clone()))
            .configure(configure_routes),
    )
    .await;

    let request = test::TestRequest::post()
        .uri(path)
        .set_json(body)
        .to_request();
    let response = test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

#[actix_web::test]
async fn test_initiate_login_missing_partner_key() {
    let (_store, relay) = TestFixtures::relay().await;
    let (status, body) = post_json(
        "/partner/login/initiate",
        json!({"site_identity": "example.com"}),
        &relay,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn test_initiate_login_blank_site_identity() {
    let (_store, relay) = TestFixtures::relay().await;
    let (status, body) = post_json(
        "/partner/login/initiate",
        json!({"partner_key": "abc", "site_identity": "   "}),
        &relay,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn test_initiate_login_unregistered_partner() {
    let (store, relay) = TestFixtures::relay().await;
    let (status, body) = post_json(
        "/partner/login/initiate",
        json!({"partner_key": "abc", "site_identity": "not-registered.com"}),
        &relay,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized_partner");
    assert_eq!(store.session_count().await, 0);
}

#[actix_web::test]
async fn test_initiate_login_returns_token_and_qr() {
    let (store, relay) = TestFixtures::relay().await;
    let (status, body) = post_json(
        "/partner/login/initiate",
        json!({"partner_key": TestFixtures::PARTNER_KEY, "site_identity": TestFixtures::SITE}),
        &relay,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.len(), crate::token::DEFAULT_TOKEN_LENGTH);
    assert!(!body["qr_image"].as_str().unwrap().is_empty());
    assert_eq!(store.session_count().await, 1);
}

#[actix_web::test]
async fn test_poll_missing_token() {
    let (_store, relay) = TestFixtures::relay().await;
    let (status, body) = post_json("/partner/login/status", json!({}), &relay).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[actix_web::test]
async fn test_poll_unknown_token_reports_not_found_in_body() {
    let (_store, relay) = TestFixtures::relay().await;
    let (status, body) = post_json(
        "/partner/login/status",
        json!({"token": "never-issued"}),
        &relay,
    )
    .await;

    // In-body status, not a transport-level 404: the partner may simply be
    // polling too early and should retry on a backoff.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "not_found");
}

#[actix_web::test]
async fn test_poll_pending_session_has_no_uid() {
    let (_store, relay) = TestFixtures::relay().await;
    let login = relay
        .initiate(TestFixtures::PARTNER_KEY, TestFixtures::SITE)
        .await
        .unwrap();

    let (status, body) = post_json(
        "/partner/login/status",
        json!({"token": login.token}),
        &relay,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert!(body.get("uid").is_none());
}

#[actix_web::test]
async fn test_health_endpoint() {
    let (_store, relay) = TestFixtures::relay().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(relay))
            .configure(configure_routes),
    )
    .await;

    let request = test::TestRequest::get().uri("/ping").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "ok");
}
