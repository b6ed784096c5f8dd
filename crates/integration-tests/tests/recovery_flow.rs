//! The three-step credential-recovery wizard end to end.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use quickbite_integration_tests::TestApp;

async fn mount_send_otp_ok(app: &TestApp) {
    Mock::given(method("POST"))
        .and(path("/api/auth/send-otp"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.account_service)
        .await;
}

async fn mount_verify_otp_ok(app: &TestApp) {
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.account_service)
        .await;
}

async fn submit(app: &TestApp, api_path: &str, body: Value) -> reqwest::Response {
    app.client
        .post(app.url(api_path))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn wizard_starts_at_step_one() {
    let app = TestApp::spawn().await;

    let view: Value = app
        .client
        .get(app.url("/api/recovery"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["step"], 1);
    assert_eq!(view["email"], "");
}

#[tokio::test]
async fn missing_email_is_local_and_stays_at_step_one() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/send-otp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.account_service)
        .await;

    let response = submit(&app, "/api/recovery/email", json!({ "email": "" })).await;

    assert_eq!(response.status(), 400);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["step"], 1);
    assert_eq!(view["error"], "Email is required!");
}

#[tokio::test]
async fn failed_otp_request_stays_at_step_one() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/send-otp"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.account_service)
        .await;

    let response = submit(
        &app,
        "/api/recovery/email",
        json!({ "email": "asha@example.com" }),
    )
    .await;

    assert_eq!(response.status(), 400);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["step"], 1);
    assert_eq!(view["error"], "Failed to send OTP. Try again!");
}

#[tokio::test]
async fn wrong_otp_stays_at_step_two_with_the_fixed_message() {
    let app = TestApp::spawn().await;
    mount_send_otp_ok(&app).await;

    // The service rejects the code; its wording must not leak through
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "otp expired" })),
        )
        .mount(&app.account_service)
        .await;

    let response = submit(
        &app,
        "/api/recovery/email",
        json!({ "email": "asha@example.com" }),
    )
    .await;
    assert_eq!(response.status(), 200);

    let response = submit(&app, "/api/recovery/otp", json!({ "otp": "123456" })).await;

    assert_eq!(response.status(), 400);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["step"], 2);
    assert_eq!(view["error"], "Invalid OTP. Please check and try again.");
}

#[tokio::test]
async fn password_mismatch_is_local_at_step_three() {
    let app = TestApp::spawn().await;
    mount_send_otp_ok(&app).await;
    mount_verify_otp_ok(&app).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.account_service)
        .await;

    submit(
        &app,
        "/api/recovery/email",
        json!({ "email": "asha@example.com" }),
    )
    .await;
    submit(&app, "/api/recovery/otp", json!({ "otp": "123456" })).await;

    let response = submit(
        &app,
        "/api/recovery/password",
        json!({ "newPassword": "brand-new", "confirmPassword": "different" }),
    )
    .await;

    assert_eq!(response.status(), 400);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["step"], 3);
    assert_eq!(view["error"], "Passwords do not match!");
}

#[tokio::test]
async fn successful_walkthrough_resets_the_wizard() {
    let app = TestApp::spawn().await;
    mount_send_otp_ok(&app).await;
    mount_verify_otp_ok(&app).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .and(body_json(json!({
            "email": "asha@example.com",
            "newPassword": "brand-new-password"
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.account_service)
        .await;

    let view: Value = submit(
        &app,
        "/api/recovery/email",
        json!({ "email": "asha@example.com" }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(view["step"], 2);

    let view: Value = submit(&app, "/api/recovery/otp", json!({ "otp": "123456" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["step"], 3);

    let response = submit(
        &app,
        "/api/recovery/password",
        json!({ "newPassword": "brand-new-password", "confirmPassword": "brand-new-password" }),
    )
    .await;

    assert_eq!(response.status(), 200);
    let view: Value = response.json().await.unwrap();
    // Back to a pristine step one, with the caller sent to sign in
    assert_eq!(view["step"], 1);
    assert_eq!(view["email"], "");
    assert_eq!(view["redirect"], "/signin");
    assert!(view.get("error").is_none());
}

#[tokio::test]
async fn payloads_for_the_wrong_step_are_rejected() {
    let app = TestApp::spawn().await;

    let response = submit(&app, "/api/recovery/otp", json!({ "otp": "123456" })).await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "The recovery wizard is not at this step.");
}
