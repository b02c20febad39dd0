use serde_json::json;

use crate::helpers::{TestApp, different_otp, error_message};

#[tokio::test]
async fn full_reset_flow_changes_the_password() {
    let app = TestApp::spawn().await;
    app.register_and_verify("alice", "alice@gmail.com", "Password123!")
        .await;

    let response = app
        .post_json(
            "/forgetPassword/verifyMail",
            &json!({ "email": "alice@gmail.com" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Email sent for verification");

    let otp = app.last_otp_sent_to("alice@gmail.com").await;
    let response = app
        .post_json(
            "/forgetPassword/verifyOtp",
            &json!({ "email": "alice@gmail.com", "otp": otp }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "OTP verified");

    let response = app
        .post_json(
            "/forgetPassword/changePassword",
            &json!({
                "email": "alice@gmail.com",
                "newPassword": "NewPassword456!",
                "confirmPassword": "NewPassword456!",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Password Updated");

    // Old password is gone, new one works.
    let response = app.login("alice", "Password123!").await;
    assert_eq!(response.status().as_u16(), 404);
    let response = app.login("alice", "NewPassword456!").await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn unknown_email_cannot_request_a_reset() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/forgetPassword/verifyMail",
            &json!({ "email": "ghost@gmail.com" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_message(response).await, "Please provide a valid email");
}

#[tokio::test]
async fn wrong_reset_otp_is_rejected() {
    let app = TestApp::spawn().await;
    app.register_and_verify("bob", "bob@gmail.com", "Password123!")
        .await;

    let response = app
        .post_json(
            "/forgetPassword/verifyMail",
            &json!({ "email": "bob@gmail.com" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let otp = app.last_otp_sent_to("bob@gmail.com").await;
    let response = app
        .post_json(
            "/forgetPassword/verifyOtp",
            &json!({ "email": "bob@gmail.com", "otp": different_otp(&otp) }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Invalid OTP");
}

#[tokio::test]
async fn change_password_requires_a_verified_otp() {
    let app = TestApp::spawn().await;
    app.register_and_verify("carol", "carol@gmail.com", "Password123!")
        .await;

    // No OTP requested at all.
    let response = app
        .post_json(
            "/forgetPassword/changePassword",
            &json!({
                "email": "carol@gmail.com",
                "newPassword": "NewPassword456!",
                "confirmPassword": "NewPassword456!",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);

    // OTP requested but never verified.
    let response = app
        .post_json(
            "/forgetPassword/verifyMail",
            &json!({ "email": "carol@gmail.com" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .post_json(
            "/forgetPassword/changePassword",
            &json!({
                "email": "carol@gmail.com",
                "newPassword": "NewPassword456!",
                "confirmPassword": "NewPassword456!",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn mismatched_passwords_keep_the_verified_otp_usable() {
    let app = TestApp::spawn().await;
    app.register_and_verify("dave", "dave@gmail.com", "Password123!")
        .await;

    let response = app
        .post_json(
            "/forgetPassword/verifyMail",
            &json!({ "email": "dave@gmail.com" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let otp = app.last_otp_sent_to("dave@gmail.com").await;
    let response = app
        .post_json(
            "/forgetPassword/verifyOtp",
            &json!({ "email": "dave@gmail.com", "otp": otp }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .post_json(
            "/forgetPassword/changePassword",
            &json!({
                "email": "dave@gmail.com",
                "newPassword": "NewPassword456!",
                "confirmPassword": "SomethingElse789!",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Passwords do not match");

    // A correct retry still goes through.
    let response = app
        .post_json(
            "/forgetPassword/changePassword",
            &json!({
                "email": "dave@gmail.com",
                "newPassword": "NewPassword456!",
                "confirmPassword": "NewPassword456!",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn the_verified_otp_is_consumed_by_a_successful_change() {
    let app = TestApp::spawn().await;
    app.register_and_verify("erin", "erin@gmail.com", "Password123!")
        .await;

    let response = app
        .post_json(
            "/forgetPassword/verifyMail",
            &json!({ "email": "erin@gmail.com" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let otp = app.last_otp_sent_to("erin@gmail.com").await;
    let response = app
        .post_json(
            "/forgetPassword/verifyOtp",
            &json!({ "email": "erin@gmail.com", "otp": otp }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .post_json(
            "/forgetPassword/changePassword",
            &json!({
                "email": "erin@gmail.com",
                "newPassword": "NewPassword456!",
                "confirmPassword": "NewPassword456!",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // Second attempt finds no pending reset.
    let response = app
        .post_json(
            "/forgetPassword/changePassword",
            &json!({
                "email": "erin@gmail.com",
                "newPassword": "AnotherPassword789!",
                "confirmPassword": "AnotherPassword789!",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
}
