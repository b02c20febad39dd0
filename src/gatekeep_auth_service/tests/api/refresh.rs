use serde_json::{Value, json};

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn refresh_without_a_cookie_is_a_400() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/refresh", &json!({})).await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        error_message(response).await,
        "Refresh token missing. Please log in."
    );
}

#[tokio::test]
async fn refresh_with_a_bogus_cookie_is_a_401() {
    let app = TestApp::spawn().await;

    let response = reqwest::Client::new()
        .post(format!("{}/refresh", app.address))
        .header("Cookie", "refreshToken=garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        error_message(response).await,
        "Invalid or expired refresh token. Please log in again."
    );
}

#[tokio::test]
async fn refresh_rotates_both_token_and_cookie() {
    let app = TestApp::spawn().await;
    app.register_and_verify("alice", "alice@gmail.com", "Password123!")
        .await;

    let response = app.login("alice", "Password123!").await;
    assert_eq!(response.status().as_u16(), 200);

    // The client's cookie store carries the refresh cookie over.
    let response = app.post_json("/refresh", &json!({})).await;
    assert_eq!(response.status().as_u16(), 200);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("rotated refresh cookie")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.contains("refreshToken="));

    let body: Value = response.json().await.unwrap();
    assert!(!body["accessToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn logout_requires_a_bearer_token() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/log", &json!({})).await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Missing authentication token");
}

#[tokio::test]
async fn logout_clears_the_refresh_cookie() {
    let app = TestApp::spawn().await;
    app.register_and_verify("bob", "bob@gmail.com", "Password123!")
        .await;

    let response = app.login("bob", "Password123!").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let access_token = body["accessToken"].as_str().unwrap().to_owned();

    let response = app
        .post_json_with_bearer("/log", &json!({}), &access_token)
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("removal cookie")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.contains("refreshToken="));
    assert!(set_cookie.contains("Max-Age=0"));
    assert_eq!(response.text().await.unwrap(), "Logged out successfully");

    // The cookie store honored the removal, so refresh now has nothing to send.
    let response = app.post_json("/refresh", &json!({})).await;
    assert_eq!(response.status().as_u16(), 400);
}
