//! A token the backend rejects clears the session once and sends the user to
//! login with their return path.

use gharkakaam_integration_tests::{CUSTOMER_EMAIL, PASSWORD, TestApp, location};
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_rejected_token_clears_session_once() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;
    app.backend.expire_tokens();

    let resp = app.get("/bookings").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?next=%2Fbookings");
    assert_eq!(app.backend.calls(&Method::GET, "bookings").len(), 1);

    // The session is gone, so the guard redirects without asking the backend.
    let resp = app.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?next=%2Fdashboard");
    assert_eq!(app.backend.calls(&Method::GET, "bookings").len(), 1);

    let page = app
        .get("/auth/login?next=%2Fbookings")
        .await
        .text()
        .await
        .expect("Failed to read body");
    assert_eq!(
        page.matches("Your session has expired. Please log in again.")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_rejected_token_on_htmx_request() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;
    app.backend.expire_tokens();

    let resp = app.get_htmx("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("hx-redirect")
            .and_then(|v| v.to_str().ok()),
        Some("/auth/login?next=%2Fdashboard")
    );
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;

    let resp = app.post_form("/auth/logout", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = app.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_rejected_token_on_form_post_returns_to_the_posting_page() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;
    app.backend.expire_tokens();

    let resp = app
        .post_form_from("/bookings/1", "/bookings/1/status", &[("action", "cancel")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?next=%2Fbookings%2F1");

    // Logging back in lands on a page that answers GET.
    let resp = app
        .post_form(
            "/auth/login",
            &[
                ("email", CUSTOMER_EMAIL),
                ("password", PASSWORD),
                ("next", "/bookings/1"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/bookings/1");
}

#[tokio::test]
async fn test_rejected_token_on_form_post_without_referer_drops_next() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;
    app.backend.expire_tokens();

    let resp = app
        .post_form("/bookings/1/status", &[("action", "cancel")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login");
}

#[tokio::test]
async fn test_anonymous_form_post_returns_to_the_posting_page() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form_from("/bookings/1", "/bookings/1/status", &[("action", "cancel")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?next=%2Fbookings%2F1");
    assert!(app.backend.requests().is_empty());
}
