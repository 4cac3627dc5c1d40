//! Recording in-memory transport for tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, RawResponse};
use crate::traits::ApiTransport;

type Route = (Method, String);

/// Mock transport answering from scripted responses.
///
/// Responses are queued per method and path. The last queued response for a
/// route is sticky so repeated reads keep working; unscripted routes answer
/// 404. Every request is recorded for later assertions.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<Route, VecDeque<RawResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Mutex<Option<Duration>>,
    offline: Mutex<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response for `method path`.
    pub async fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, RawResponse::json(status, &body))
            .await;
    }

    pub async fn respond_raw(&self, method: Method, path: &str, response: RawResponse) {
        self.routes
            .lock()
            .await
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Delay every response, to hold requests in flight.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    /// Fail every request with a connection error.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.lock().await = offline;
    }

    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().await.last().cloned()
    }

    /// Number of recorded requests for `method path`.
    pub async fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let route = (request.method.clone(), request.path.clone());
        self.requests.lock().await.push(request);

        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.offline.lock().await {
            return Err(ClientError::Connection("mock transport offline".to_string()));
        }

        let mut routes = self.routes.lock().await;
        let response = match routes.get_mut(&route) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(response.unwrap_or_else(|| {
            RawResponse::json(404, &serde_json::json!({"message": "no mock route"}))
        }))
    }
}
