//! Authentication endpoint.

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{LoginRequest, LoginResponse};
use crate::request::ApiRequest;
use crate::validation::require_non_empty;

pub const LOGIN_PATH: &str = "/inventory/auth/login";

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a bearer token and the signed-in user.
    ///
    /// Rejected credentials come back as `ClientError::Api { status: 401, .. }`
    /// and leave any existing session alone.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        require_non_empty(&credentials.email, "email")?;
        require_non_empty(&credentials.password, "password")?;

        let request = ApiRequest::post(LOGIN_PATH).with_json(credentials)?;
        let response = self.api.send_anonymous(request).await?;
        let login: LoginResponse = serde_json::from_slice(&response.body)?;
        info!(user_id = login.user.id, "logged in");
        Ok(login)
    }
}
