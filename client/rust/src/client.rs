//! Authenticated JSON client over an [`ApiTransport`].

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, FilePart, RawResponse};
use crate::traits::{ApiTransport, TokenProvider, UnauthorizedObserver};
use crate::transport::{HttpTransport, HttpTransportConfig};

type Observers = Arc<RwLock<Vec<Arc<dyn UnauthorizedObserver>>>>;

/// Shared API client used by every service.
///
/// Adds the bearer token to each request, interprets the response status,
/// and turns a 401 into a synchronous notification of every registered
/// [`UnauthorizedObserver`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
    tokens: Option<Arc<dyn TokenProvider>>,
    observers: Observers,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            tokens: None,
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Client over reqwest for the given configuration.
    pub fn http(config: HttpTransportConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Register an observer for rejected tokens.
    pub fn subscribe_unauthorized(&self, observer: Arc<dyn UnauthorizedObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(observer);
    }

    fn notify_unauthorized(&self, path: &str) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for observer in observers {
            observer.on_unauthorized(path);
        }
    }

    /// Send a request and check its status; the body is returned raw.
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        self.dispatch(request, true).await
    }

    /// Send without a token. A 401 here means bad credentials, not an
    /// expired session, so observers are not notified.
    pub async fn send_anonymous(&self, request: ApiRequest) -> Result<RawResponse> {
        self.dispatch(request, false).await
    }

    async fn dispatch(&self, mut request: ApiRequest, authenticated: bool) -> Result<RawResponse> {
        if authenticated {
            if let Some(token) = self.tokens.as_ref().and_then(|t| t.bearer_token()) {
                request = request.with_header("Authorization", format!("Bearer {token}"));
            }
        }

        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;

        if response.is_success() {
            debug!(%method, %path, status = response.status, "api request succeeded");
            return Ok(response);
        }

        if response.status == 401 && authenticated {
            warn!(%method, %path, "api rejected session token");
            self.notify_unauthorized(&path);
            return Err(ClientError::Unauthorized);
        }

        let message = error_message(&response);
        warn!(%method, %path, status = response.status, %message, "api request failed");
        Err(ClientError::Api {
            status: response.status,
            message,
        })
    }

    /// Send a request and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        decode(&response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T> {
        self.send_json(ApiRequest::get(path).with_query(query)).await
    }

    /// Download a binary body, e.g. an export file.
    pub async fn get_bytes(&self, path: &str, query: Vec<(String, String)>) -> Result<Vec<u8>> {
        let response = self.send(ApiRequest::get(path).with_query(query)).await?;
        Ok(response.body)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::patch(path).with_json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }

    pub async fn delete_with<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(ApiRequest::delete(path).with_json(body)?)
            .await
            .map(|_| ())
    }

    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        files: Vec<FilePart>,
        fields: Vec<(String, String)>,
    ) -> Result<T> {
        if files.is_empty() {
            return Err(ClientError::InvalidArgument(
                "at least one file is required".to_string(),
            ));
        }
        self.send_json(ApiRequest::post(path).with_multipart(files, fields))
            .await
    }
}

/// Decode a JSON body; an empty body decodes as `null`.
fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&response.body)?)
}

/// Pull a human-readable message out of an error body.
///
/// Backends answer `{"message": "..."}`, `{"message": ["a", "b"]}` or
/// `{"error": "..."}`; anything else falls back to the raw text.
fn error_message(response: &RawResponse) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(&response.body) {
        let field = value.get("message").or_else(|| value.get("error"));
        match field {
            Some(Value::String(message)) => return message.clone(),
            Some(Value::Array(messages)) => {
                let joined = messages
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; ");
                if !joined.is_empty() {
                    return joined;
                }
            }
            _ => {}
        }
    }

    let text = response.text();
    if text.trim().is_empty() {
        reqwest::StatusCode::from_u16(response.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("request failed")
            .to_string()
    } else {
        text.chars().take(200).collect()
    }
}
