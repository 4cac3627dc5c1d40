//! Unauthorized signal step definitions against a local HTTP server.

use std::fmt;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use cucumber::{given, then, when, World};
use serde_json::{json, Value};
use stockroom_client::model::{LoginRequest, LoginResponse, Order};
use stockroom_client::{
    ApiClient, ClientError, HttpTransportConfig, Services, TokenProvider, UnauthorizedObserver,
};

#[derive(Clone, Default)]
struct ServerState {
    password: Option<String>,
    seen_headers: Arc<Mutex<Vec<String>>>,
}

async fn reject_order(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.seen_headers.lock().unwrap().push(value.to_string());
    }
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "jwt expired"})))
}

async fn login(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();
    match &state.password {
        Some(expected) if expected == password => (
            StatusCode::CREATED,
            Json(json!({
                "accessToken": format!("token-{email}"),
                "user": {"id": 1, "email": email, "role": "ADMIN"}
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "invalid credentials"})),
        ),
    }
}

async fn spawn_server(state: ServerState) -> String {
    let app = Router::new()
        .route("/inventory/orders/:id", get(reject_order))
        .route("/inventory/auth/login", post(login))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct FixedToken(String);

impl TokenProvider for FixedToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingObserver {
    paths: Mutex<Vec<String>>,
}

impl UnauthorizedObserver for RecordingObserver {
    fn on_unauthorized(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// Test context for unauthorized signal scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct SessionSignalWorld {
    state: ServerState,
    base_url: Option<String>,
    services: Option<Services>,
    observer: Arc<RecordingObserver>,
    order: Option<Order>,
    login: Option<LoginResponse>,
    error: Option<ClientError>,
}

impl fmt::Debug for SessionSignalWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSignalWorld")
            .field("base_url", &self.base_url)
            .field("error", &self.error)
            .finish()
    }
}

impl SessionSignalWorld {
    fn new() -> Self {
        Self {
            state: ServerState::default(),
            base_url: None,
            services: None,
            observer: Arc::new(RecordingObserver::default()),
            order: None,
            login: None,
            error: None,
        }
    }

    fn connect(&mut self, token: Option<String>) {
        let base_url = self.base_url.clone().expect("server not started");
        let mut api = ApiClient::http(HttpTransportConfig::default().with_base_url(base_url))
            .expect("client");
        if let Some(token) = token {
            api = api.with_token_provider(Arc::new(FixedToken(token)));
        }
        api.subscribe_unauthorized(self.observer.clone());
        self.services = Some(Services::new(api));
    }

    fn services(&self) -> &Services {
        self.services.as_ref().expect("client not created")
    }

    fn notified_paths(&self) -> Vec<String> {
        self.observer.paths.lock().unwrap().clone()
    }
}

// --- Given steps ---

#[given("an API server that rejects every token")]
async fn given_rejecting_server(world: &mut SessionSignalWorld) {
    world.base_url = Some(spawn_server(world.state.clone()).await);
}

#[given(expr = "an API server that accepts password {string}")]
async fn given_login_server(world: &mut SessionSignalWorld, password: String) {
    world.state.password = Some(password);
    world.base_url = Some(spawn_server(world.state.clone()).await);
}

#[given(expr = "a client holding token {string}")]
async fn given_client_with_token(world: &mut SessionSignalWorld, token: String) {
    world.connect(Some(token));
}

#[given("a client without a token")]
async fn given_client_without_token(world: &mut SessionSignalWorld) {
    world.connect(None);
}

// --- When steps ---

#[when(expr = "I fetch order {int}")]
async fn when_fetch_order(world: &mut SessionSignalWorld, id: i64) {
    match world.services().orders.get(id).await {
        Ok(order) => world.order = Some(order),
        Err(err) => world.error = Some(err),
    }
}

#[when(expr = "I log in with email {string} and password {string}")]
async fn when_login(world: &mut SessionSignalWorld, email: String, password: String) {
    let request = LoginRequest::new(email, password);
    match world.services().auth.login(&request).await {
        Ok(login) => world.login = Some(login),
        Err(err) => world.error = Some(err),
    }
}

// --- Then steps ---

#[then("the call should fail as unauthorized")]
async fn then_unauthorized(world: &mut SessionSignalWorld) {
    let err = world.error.as_ref().expect("call succeeded");
    assert!(matches!(err, ClientError::Unauthorized), "got {err:?}");
}

#[then(expr = "the call should fail with status {int}")]
async fn then_fail_status(world: &mut SessionSignalWorld, status: u16) {
    let err = world.error.as_ref().expect("call succeeded");
    assert_eq!(err.status(), Some(status));
}

#[then(expr = "the observer should have been notified once for {string}")]
async fn then_notified_once(world: &mut SessionSignalWorld, path: String) {
    assert_eq!(world.notified_paths(), vec![path]);
}

#[then("the observer should not have been notified")]
async fn then_not_notified(world: &mut SessionSignalWorld) {
    assert!(world.notified_paths().is_empty());
}

#[then(expr = "the server should have seen the header {string}")]
async fn then_seen_header(world: &mut SessionSignalWorld, header: String) {
    let seen = world.state.seen_headers.lock().unwrap().clone();
    assert_eq!(seen, vec![header]);
}

#[then(expr = "the login should return token {string}")]
async fn then_login_token(world: &mut SessionSignalWorld, token: String) {
    let login = world.login.as_ref().expect("login failed");
    assert_eq!(login.access_token, token);
    assert_eq!(login.user.email, "admin@shop.test");
}
