//! The profile page re-reads the account from the backend.

use gharkakaam_integration_tests::{CUSTOMER_EMAIL, TestApp, location};
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_profile_page_shows_backend_changes() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;
    app.backend
        .update_account(json!({"name": "Ravi Sharma", "location": "Mumbai"}));

    let resp = app.get("/account/profile").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.expect("Failed to read body");
    assert!(page.contains(r#"value="Ravi Sharma""#));
    assert!(page.contains(r#"value="Mumbai""#));
    assert!(!page.contains("Ravi Kumar"));
    assert_eq!(app.backend.calls(&Method::GET, "auth/profile").len(), 1);
}

#[tokio::test]
async fn test_profile_page_with_rejected_token_logs_out() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;
    app.backend.expire_tokens();

    let resp = app.get("/account/profile").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?next=%2Faccount%2Fprofile");

    let resp = app.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}
