//! End-to-end tests for the GharKaKaam storefront.
//!
//! Each test spawns a stub REST backend and a storefront pointed at it, both
//! on ephemeral ports, then drives the storefront over HTTP with a cookie
//! jar. The stub records every request so tests can assert what reached the
//! backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gharkakaam-integration-tests
//! ```
//!
//! # Fixtures
//!
//! | Account              | Role     | User id | Password      |
//! |----------------------|----------|---------|---------------|
//! | `ravi@example.com`   | customer | 1       | `password123` |
//! | `sunita@example.com` | provider | 9       | `password123` |
//!
//! Sunita's service profile is provider 5. Every booking list holds two
//! completed bookings (₹500 and ₹300) and one pending one.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use gharkakaam_storefront::config::{ApiConfig, StorefrontConfig, SupportContact, parse_api_url};
use gharkakaam_storefront::content::ContentStore;
use gharkakaam_storefront::state::AppState;

/// Password accepted for every fixture account.
pub const PASSWORD: &str = "password123";
pub const CUSTOMER_EMAIL: &str = "ravi@example.com";
pub const PROVIDER_EMAIL: &str = "sunita@example.com";

// =============================================================================
// Stub backend
// =============================================================================

/// A request the stub backend received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Path below `/api/` without a trailing slash, e.g. `services/providers`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Recorded {
    /// First value of query parameter `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Stub of the REST backend with canned fixtures.
#[derive(Clone, Default)]
pub struct Backend {
    requests: Arc<Mutex<Vec<Recorded>>>,
    reject_tokens: Arc<AtomicBool>,
    account_changes: Arc<Mutex<serde_json::Map<String, Value>>>,
}

impl Backend {
    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Requests matching `method` and `path`.
    #[must_use]
    pub fn calls(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        self.requests.lock().expect("request log poisoned").clear();
    }

    /// Answer 401 to every authenticated call from now on.
    pub fn expire_tokens(&self) {
        self.reject_tokens.store(true, Ordering::SeqCst);
    }

    /// Change account fields the profile endpoint reports from now on.
    /// Login responses keep the original fixture.
    pub fn update_account(&self, changes: Value) {
        if let Value::Object(changes) = changes {
            self.account_changes
                .lock()
                .expect("account changes poisoned")
                .extend(changes);
        }
    }

    fn profile(&self, user: Option<Value>) -> Value {
        let mut user = user.unwrap_or(Value::Null);
        if let Value::Object(fields) = &mut user {
            let changes = self.account_changes.lock().expect("account changes poisoned");
            fields.extend(changes.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        user
    }

    fn record(&self, request: Recorded) {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<Value> {
        if self.reject_tokens.load(Ordering::SeqCst) {
            return None;
        }
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        match token {
            "token-1" => Some(customer()),
            "token-9" => Some(provider_user()),
            _ => None,
        }
    }
}

fn customer() -> Value {
    json!({
        "id": 1,
        "name": "Ravi Kumar",
        "email": CUSTOMER_EMAIL,
        "phone": "9812345678",
        "user_type": "customer",
        "location": "Pune",
        "is_verified": true,
        "is_active": true
    })
}

fn provider_user() -> Value {
    json!({
        "id": 9,
        "name": "Sunita Devi",
        "email": PROVIDER_EMAIL,
        "phone": "9876543210",
        "user_type": "provider",
        "location": "Pune",
        "is_verified": true,
        "is_active": true
    })
}

fn category() -> Value {
    json!({"id": 3, "name": "Cooking", "description": "Home cooks", "is_active": true})
}

/// Sunita's service profile.
#[must_use]
pub fn provider_profile() -> Value {
    json!({
        "id": 5,
        "user_id": 9,
        "user": provider_user(),
        "category": category(),
        "service_title": "Home Cook",
        "description": "North Indian meals",
        "specialties": ["Dal", "Roti"],
        "experience_years": 6,
        "price_range_min": 300.0,
        "price_range_max": 800.0,
        "price_unit": "per meal",
        "availability": {},
        "service_area": "Pune",
        "rating": 4.67,
        "total_reviews": 12,
        "total_bookings": 20,
        "is_approved": true,
        "is_active": true
    })
}

fn booking(id: i64, status: &str, final_price: Option<f64>) -> Value {
    json!({
        "id": id,
        "customer": customer(),
        "provider": provider_profile(),
        "service_date": "2030-01-15T10:30:00",
        "service_duration": 120,
        "service_address": "12 MG Road",
        "estimated_price": 400.0,
        "final_price": final_price,
        "status": status,
        "payment_status": "pending"
    })
}

fn bookings() -> Vec<Value> {
    vec![
        booking(1, "completed", Some(500.0)),
        booking(2, "completed", Some(300.0)),
        booking(3, "pending", None),
    ]
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

fn page_of(key: &str, items: Vec<Value>) -> Value {
    let mut page = json!({"total": items.len(), "pages": 1, "current_page": 1});
    page[key] = Value::Array(items);
    page
}

/// Route one stub request.
async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api/")
        .unwrap_or_else(|| uri.path())
        .trim_end_matches('/')
        .to_string();
    let query = uri.query().map(url_pairs).unwrap_or_default();
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    backend.record(Recorded {
        method: method.clone(),
        path: path.clone(),
        query,
        body: body.clone(),
    });

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let public = matches!(
        (&method, segments.as_slice()),
        (&Method::GET, ["health"] | ["services", ..] | ["reviews", "provider", _])
            | (&Method::POST, ["auth", "login"])
    );
    let user = backend.user_for(&headers);
    if !public && user.is_none() {
        return error(StatusCode::UNAUTHORIZED, "Token has expired");
    }

    match (&method, segments.as_slice()) {
        (&Method::GET, ["health"]) => Json(json!({"status": "ok"})).into_response(),
        (&Method::POST, ["auth", "login"]) => login(body.as_ref()),
        (&Method::GET, ["auth", "profile"]) => {
            Json(json!({"user": backend.profile(user)})).into_response()
        }
        (&Method::GET, ["services", "categories"]) => {
            Json(json!({"categories": [category()]})).into_response()
        }
        (&Method::GET, ["services", "providers"]) => {
            Json(page_of("providers", vec![provider_profile()])).into_response()
        }
        (&Method::GET, ["services", "providers", "5"]) => {
            Json(json!({"provider": provider_profile()})).into_response()
        }
        (&Method::GET, ["reviews", "provider", "5"]) => {
            Json(page_of("reviews", Vec::new())).into_response()
        }
        (&Method::GET, ["bookings"]) => Json(page_of("bookings", bookings())).into_response(),
        (&Method::POST, ["bookings"]) => (
            StatusCode::CREATED,
            Json(json!({"booking": booking(42, "pending", None)})),
        )
            .into_response(),
        _ => error(StatusCode::NOT_FOUND, "Not found"),
    }
}

fn url_pairs(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn login(body: Option<&Value>) -> Response {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let (email, password) = (field("email"), field("password"));
    let user = match email.as_str() {
        CUSTOMER_EMAIL => customer(),
        PROVIDER_EMAIL => provider_user(),
        _ => return error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };
    if password != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    Json(json!({
        "access_token": format!("token-{}", user["id"]),
        "user": user,
        "message": "Login successful"
    }))
    .into_response()
}

// =============================================================================
// Test application
// =============================================================================

/// A running storefront wired to its own stub backend.
pub struct TestApp {
    pub base_url: String,
    pub backend: Backend,
    pub client: Client,
}

/// Distinct client address per app so rate limits never cross tests.
fn next_client_ip() -> String {
    static NEXT: AtomicU32 = AtomicU32::new(1);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    format!("10.{}.{}.{}", (n >> 16) & 0xff, (n >> 8) & 0xff, n & 0xff)
}

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Listener has no address");
    (listener, addr)
}

impl TestApp {
    /// Start a stub backend and a storefront that talks to it.
    pub async fn spawn() -> Self {
        let backend = Backend::default();
        let (backend_listener, backend_addr) = bind().await;
        let stub = Router::new().fallback(handle).with_state(backend.clone());
        tokio::spawn(async move {
            axum::serve(backend_listener, stub)
                .await
                .expect("Stub backend failed");
        });

        let (listener, addr) = bind().await;
        let storefront = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            api: ApiConfig {
                base_url: parse_api_url(&format!("http://{backend_addr}/api"))
                    .expect("Stub backend URL is valid"),
                timeout: Duration::from_secs(5),
            },
            support: SupportContact::default(),
            content_dir: storefront.join("content"),
            static_dir: storefront.join("static"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let content = ContentStore::load(&config.content_dir).expect("Failed to load content");
        let state = AppState::new(config, content).expect("Failed to build app state");
        tokio::spawn(async move {
            gharkakaam_storefront::serve(listener, state, std::future::pending())
                .await
                .expect("Storefront failed");
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            next_client_ip()
                .parse()
                .expect("Generated IP is a valid header value"),
        );
        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            backend,
            client,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a storefront path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// GET a storefront path as an HTMX request.
    pub async fn get_htmx(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("hx-request", "true")
            .send()
            .await
            .expect("HTMX GET failed")
    }

    /// POST a form to a storefront path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// POST a form as if submitted from the page at `from`.
    pub async fn post_form_from(
        &self,
        from: &str,
        path: &str,
        form: &[(&str, &str)],
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header(reqwest::header::REFERER, self.url(from))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Log in as a fixture account, then forget the backend calls it made.
    pub async fn login(&self, email: &str) {
        let response = self
            .post_form(
                "/auth/login",
                &[("email", email), ("password", PASSWORD), ("next", "")],
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");
        self.backend.reset();
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
