//! Service search: one backend fetch per filter change, every filter forwarded.

use gharkakaam_integration_tests::TestApp;
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_full_page_loads_categories_and_providers_once() {
    let app = TestApp::spawn().await;

    let resp = app.get("/services?location=Pune").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.expect("Failed to read body");
    assert!(page.contains("Home Cook"));
    assert!(page.contains("Cooking"));

    assert_eq!(app.backend.calls(&Method::GET, "services/categories").len(), 1);
    let providers = app.backend.calls(&Method::GET, "services/providers");
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].param("location"), Some("Pune"));
}

#[tokio::test]
async fn test_each_filter_change_fetches_once_with_all_filters() {
    let app = TestApp::spawn().await;

    let resp = app.get_htmx("/services/results?search=cook").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .get_htmx("/services/results?search=cook&location=Pune&category=3")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("hx-push-url")
            .and_then(|v| v.to_str().ok()),
        Some("/services?search=cook&location=Pune&category=3")
    );
    let fragment = resp.text().await.expect("Failed to read body");
    assert!(fragment.contains(r#"data-filter-signature="search=cook"#));
    assert!(fragment.contains(r#"category=3""#));
    assert!(!fragment.contains("<html"));

    let calls = app.backend.calls(&Method::GET, "services/providers");
    assert_eq!(calls.len(), 2);
    let latest = &calls[1];
    assert_eq!(latest.param("search"), Some("cook"));
    assert_eq!(latest.param("location"), Some("Pune"));
    assert_eq!(latest.param("category_id"), Some("3"));
    assert_eq!(latest.param("page"), Some("1"));
    assert_eq!(latest.param("per_page"), Some("12"));

    // Categories are only loaded by the full page.
    assert!(app.backend.calls(&Method::GET, "services/categories").is_empty());
}

#[tokio::test]
async fn test_all_means_unfiltered() {
    let app = TestApp::spawn().await;

    app.get_htmx("/services/results?search=&location=all&category=all")
        .await;

    let calls = app.backend.calls(&Method::GET, "services/providers");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].param("search"), None);
    assert_eq!(calls[0].param("location"), None);
    assert_eq!(calls[0].param("category_id"), None);
}

#[tokio::test]
async fn test_malformed_page_falls_back_to_first_page() {
    let app = TestApp::spawn().await;

    for path in ["/services?page=abc", "/services/results?page="] {
        let resp = app.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }

    let calls = app.backend.calls(&Method::GET, "services/providers");
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.param("page") == Some("1")));
}
