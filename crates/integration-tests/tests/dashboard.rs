//! Dashboard figures computed from the provider's bookings.

use gharkakaam_integration_tests::{CUSTOMER_EMAIL, PROVIDER_EMAIL, TestApp};
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_provider_dashboard_totals_completed_earnings() {
    let app = TestApp::spawn().await;
    app.login(PROVIDER_EMAIL).await;

    let resp = app.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.expect("Failed to read body");

    assert!(page.contains("Provider Dashboard"));
    assert!(page.contains("₹800"));
    assert!(page.contains("4.7"));

    // The profile comes from the bookings, so no provider scan is needed.
    assert_eq!(app.backend.calls(&Method::GET, "bookings").len(), 1);
    assert!(app.backend.calls(&Method::GET, "services/providers").is_empty());
}

#[tokio::test]
async fn test_customer_dashboard_has_no_earnings() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;

    let page = app
        .get("/dashboard")
        .await
        .text()
        .await
        .expect("Failed to read body");

    assert!(page.contains("Customer Dashboard"));
    assert!(!page.contains("Total earnings"));
}
