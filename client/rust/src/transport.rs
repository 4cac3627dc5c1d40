//! reqwest-backed [`ApiTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, error};

use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, RawResponse, RequestBody};
use crate::traits::ApiTransport;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// API base URL, e.g. `https://api.shop.test`.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("stockroom-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpTransportConfig {
    /// Create config from environment variables.
    ///
    /// - `STOCKROOM_API_URL`: Required base URL
    /// - `STOCKROOM_API_TIMEOUT`: Optional timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("STOCKROOM_API_URL")
            .map_err(|_| ClientError::InvalidArgument("STOCKROOM_API_URL not set".to_string()))?;

        let timeout_secs = std::env::var("STOCKROOM_API_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT.as_secs());

        Ok(Self::default()
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(timeout_secs)))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Transport that sends requests with reqwest.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::InvalidArgument(
                "API base URL not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn multipart_form(
    files: Vec<crate::request::FilePart>,
    fields: Vec<(String, String)>,
) -> Result<Form> {
    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.data)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        form = form.part(file.field, part);
    }
    for (key, value) in fields {
        form = form.text(key, value);
    }
    Ok(form)
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = self.url(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { files, fields } => {
                builder.multipart(multipart_form(files, fields)?)
            }
        };

        let response = builder.send().await.map_err(|e| {
            error!(method = %request.method, %url, error = %e, "request did not complete");
            if e.is_connect() {
                ClientError::Connection(e.to_string())
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(method = %request.method, %url, status, bytes = body.len(), "response received");

        Ok(RawResponse { status, body })
    }
}
