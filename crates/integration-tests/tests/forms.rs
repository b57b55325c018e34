//! Form submissions: validation, post/redirect/get and one-shot notices.

use gharkakaam_integration_tests::{CUSTOMER_EMAIL, TestApp, location};
use reqwest::{Method, StatusCode};

const CONTACT_CONFIRMATION: &str =
    "Thank you for your message! We will get back to you within 24 hours.";

async fn body(resp: reqwest::Response) -> String {
    resp.text().await.expect("Failed to read body")
}

#[tokio::test]
async fn test_contact_form_resets_after_success() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/contact",
            &[
                ("name", "Asha Verma"),
                ("email", "asha@example.com"),
                ("phone", ""),
                ("subject", "Weekend cook"),
                ("message", "Do you cover Baner?"),
                ("user_type", "customer"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/contact");

    let page = body(app.get("/contact").await).await;
    assert_eq!(page.matches(CONTACT_CONFIRMATION).count(), 1);
    assert!(!page.contains("Asha Verma"));

    let page = body(app.get("/contact").await).await;
    assert!(!page.contains(CONTACT_CONFIRMATION));
}

#[tokio::test]
async fn test_contact_form_keeps_input_on_error() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/contact",
            &[
                ("name", "Asha Verma"),
                ("email", "asha@example.com"),
                ("subject", ""),
                ("message", "Do you cover Baner?"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let page = body(resp).await;
    assert!(page.contains("Subject is required."));
    assert!(page.contains(r#"value="Asha Verma""#));
    assert!(!page.contains(CONTACT_CONFIRMATION));
}

#[tokio::test]
async fn test_booking_with_missing_address_never_reaches_backend() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;

    let resp = app
        .post_form(
            "/services/providers/5/book",
            &[
                ("service_date", "2030-01-15T10:30"),
                ("service_address", "   "),
                ("service_duration", "120"),
                ("special_requirements", ""),
                ("estimated_price", ""),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/services/providers/5#book");
    assert!(app.backend.calls(&Method::POST, "bookings").is_empty());

    let page = body(app.get("/services/providers/5").await).await;
    assert_eq!(page.matches("Please enter the service address.").count(), 1);

    let page = body(app.get("/services/providers/5").await).await;
    assert!(!page.contains("Please enter the service address."));
}

#[tokio::test]
async fn test_booking_is_forwarded_once() {
    let app = TestApp::spawn().await;
    app.login(CUSTOMER_EMAIL).await;

    let resp = app
        .post_form(
            "/services/providers/5/book",
            &[
                ("service_date", "2030-01-15T10:30"),
                ("service_address", " 12 MG Road "),
                ("service_duration", "120"),
                ("special_requirements", "Less oil"),
                ("estimated_price", "400"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/bookings/42");

    let calls = app.backend.calls(&Method::POST, "bookings");
    assert_eq!(calls.len(), 1);
    let sent = calls[0].body.clone().expect("booking body");
    assert_eq!(sent["provider_id"], 5);
    assert_eq!(sent["service_date"], "2030-01-15T10:30:00");
    assert_eq!(sent["service_address"], "12 MG Road");
    assert_eq!(sent["service_duration"], 120);
    assert_eq!(sent["special_requirements"], "Less oil");
}
