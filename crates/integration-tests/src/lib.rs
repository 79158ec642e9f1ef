//! Integration tests for the shop storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shop-integration-tests
//! ```
//!
//! No external services are needed. Each test starts a [`MockBackend`], an
//! in-process HTTP server on an ephemeral port that speaks the backend's REST
//! contract, and points a [`Storefront`] at it.
//!
//! The backend keeps a journal of every request it receives. The
//! [`JournalNotifier`] writes checkout confirmations into the same journal, so
//! tests can assert the exact interleaving of requests and user-facing
//! notifications.
//!
//! # Test Categories
//!
//! - `storefront_loads` - Product and cart loading, lenient decoding
//! - `storefront_mutations` - Add, remove and checkout request sequences
//! - `terminal_session` - Scripted terminal sessions

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::extract::State;
use axum::http::{Method, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use shop_core::CartId;
use shop_storefront::config::ShopConfig;
use shop_storefront::{Notifier, Storefront};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use axum::http::StatusCode;

/// Path prefix the mock backend serves under.
pub const API_PREFIX: &str = "/api/v1";

/// The cart every test works on.
pub const CART_ID: CartId = CartId::new(1);

// =============================================================================
// Journal
// =============================================================================

/// A request as seen by the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path below [`API_PREFIX`], e.g. `/cart/1/items`.
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Parse the request body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not valid JSON.
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// One entry in the backend journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Request(RecordedRequest),
    OrderConfirmed,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(request) => write!(f, "{} {}", request.method, request.path),
            Self::OrderConfirmed => write!(f, "ORDER CONFIRMED"),
        }
    }
}

// =============================================================================
// Canned Responses
// =============================================================================

/// Backend endpoints the mock understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListProducts,
    GetCart,
    AddItem,
    RemoveItem,
    Checkout,
}

impl Endpoint {
    /// Route a request to an endpoint by method and path below the prefix.
    fn route(method: &str, path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method, segments.as_slice()) {
            ("GET", ["products"]) => Some(Self::ListProducts),
            ("GET", ["cart", _]) => Some(Self::GetCart),
            ("POST", ["cart", _, "items"]) => Some(Self::AddItem),
            ("DELETE", ["cart", _, "items", _]) => Some(Self::RemoveItem),
            ("POST", ["orders", "from-cart", _]) => Some(Self::Checkout),
            _ => None,
        }
    }

    fn default_response(self) -> MockResponse {
        match self {
            Self::ListProducts => MockResponse::ok(&json!({ "content": [], "totalElements": 0 })),
            Self::GetCart => MockResponse::ok(&cart_json(&[])),
            Self::AddItem => MockResponse::json(StatusCode::CREATED, &json!({ "id": 1 })),
            Self::RemoveItem => MockResponse::status(StatusCode::NO_CONTENT),
            Self::Checkout => MockResponse::json(
                StatusCode::CREATED,
                &json!({ "id": 100, "status": "PENDING" }),
            ),
        }
    }
}

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: String,
}

impl MockResponse {
    /// A `200 OK` with a JSON body.
    #[must_use]
    pub fn ok(body: &Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    /// A JSON response with any status.
    #[must_use]
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::raw(status, body.to_string())
    }

    /// A response with a verbatim body, which need not be valid JSON.
    #[must_use]
    pub fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response with no body.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self::raw(status, "")
    }

    /// A backend error in the `{status, message}` shape.
    #[must_use]
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(
            status,
            &json!({ "status": status.canonical_reason(), "message": message }),
        )
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

// =============================================================================
// Mock Backend
// =============================================================================

#[derive(Debug, Default)]
struct Shared {
    journal: Mutex<Vec<Event>>,
    responses: Mutex<HashMap<Endpoint, VecDeque<MockResponse>>>,
}

impl Shared {
    fn record(&self, event: Event) {
        lock(&self.journal).push(event);
    }

    /// Take the next queued response. The last one is sticky.
    fn next_response(&self, endpoint: Endpoint) -> MockResponse {
        let mut responses = lock(&self.responses);
        let queue = responses.entry(endpoint).or_default();
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.unwrap_or_else(|| endpoint.default_response())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();

    shared.record(Event::Request(RecordedRequest {
        method: method.as_str().to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body,
    }));

    match Endpoint::route(method.as_str(), &path) {
        Some(endpoint) => shared.next_response(endpoint).into_response(),
        None => MockResponse::error(StatusCode::NOT_FOUND, "No such endpoint").into_response(),
    }
}

/// In-process HTTP server implementing the backend contract with canned
/// responses. The server stops when the value is dropped.
#[derive(Debug)]
pub struct MockBackend {
    addr: SocketAddr,
    config: ShopConfig,
    shared: Arc<Shared>,
    server: JoinHandle<io::Result<()>>,
}

impl MockBackend {
    /// Bind an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let config = ShopConfig::new(&format!("http://{addr}{API_PREFIX}"), CART_ID)
            .map_err(io::Error::other)?;

        let shared = Arc::new(Shared::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&shared));

        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self {
            addr,
            config,
            shared,
            server,
        })
    }

    /// Address the server listens on.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Client configuration pointing at this backend, cart [`CART_ID`].
    #[must_use]
    pub const fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// A storefront wired to this backend and its journal.
    #[must_use]
    pub fn storefront(&self) -> Storefront<JournalNotifier> {
        Storefront::new(&self.config, self.notifier())
    }

    /// A notifier that records confirmations in this backend's journal.
    #[must_use]
    pub fn notifier(&self) -> JournalNotifier {
        JournalNotifier {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Always answer an endpoint with this response.
    pub fn respond(&self, endpoint: Endpoint, response: MockResponse) {
        self.respond_sequence(endpoint, [response]);
    }

    /// Answer an endpoint with these responses in order, repeating the last.
    pub fn respond_sequence(
        &self,
        endpoint: Endpoint,
        responses: impl IntoIterator<Item = MockResponse>,
    ) {
        lock(&self.shared.responses).insert(endpoint, responses.into_iter().collect());
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn journal(&self) -> Vec<Event> {
        lock(&self.shared.journal).clone()
    }

    /// The journal as `METHOD /path` lines and confirmation markers.
    #[must_use]
    pub fn journal_lines(&self) -> Vec<String> {
        self.journal().iter().map(ToString::to_string).collect()
    }

    /// Recorded requests only.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.journal()
            .into_iter()
            .filter_map(|event| match event {
                Event::Request(request) => Some(request),
                Event::OrderConfirmed => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear_journal(&self) {
        lock(&self.shared.journal).clear();
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Notifier recording each checkout confirmation as
/// [`Event::OrderConfirmed`].
#[derive(Debug, Clone)]
pub struct JournalNotifier {
    shared: Arc<Shared>,
}

impl Notifier for JournalNotifier {
    async fn order_placed(&self) {
        self.shared.record(Event::OrderConfirmed);
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A backend product object.
#[must_use]
pub fn product_json(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "categoryId": 1,
        "inStock": true,
    })
}

/// A backend product with every nullable column unset, as the backend
/// serializes it: explicit `null`s rather than missing fields.
#[must_use]
pub fn bare_product_json(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "price": price,
        "imageUrl": null,
        "categoryId": null,
        "inStock": null,
    })
}

/// A backend product page holding the given products.
#[must_use]
pub fn product_page_json(products: &[Value]) -> Value {
    json!({
        "content": products,
        "totalElements": products.len(),
        "number": 0,
        "size": 10,
    })
}

/// A backend cart for [`CART_ID`] with `(item id, product id, quantity)` lines.
#[must_use]
pub fn cart_json(items: &[(i64, i64, u32)]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|&(id, product_id, quantity)| {
            json!({ "id": id, "productId": product_id, "quantity": quantity })
        })
        .collect();
    json!({
        "id": CART_ID.as_i64(),
        "customerId": 1,
        "items": items,
        "status": "ACTIVE",
    })
}

/// A configuration pointing at a local port with nothing listening.
///
/// # Errors
///
/// Returns an I/O error if no port can be reserved.
pub fn unreachable_config() -> io::Result<ShopConfig> {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
    ShopConfig::new(&format!("http://{addr}{API_PREFIX}"), CART_ID).map_err(io::Error::other)
}
