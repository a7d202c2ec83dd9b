//! HTTP clients for the auth and inventory services.
//!
//! [`ApiClient`] is the authenticated wrapper around the inventory API:
//! it attaches the bearer token, and on a 401 performs exactly one token
//! refresh and replays the request. A second 401 means the grant is gone;
//! the session is torn down and [`ApiError::SessionExpired`] surfaces.

pub mod auth;
mod error;
pub mod movements;
pub mod product_types;
pub mod products;
pub mod reports;

pub use error::ApiError;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::SessionManager;
use crate::config::Config;
use error::message_from_body;

/// Authenticated client for the inventory API.
///
/// Cheap to clone; shares the session with its manager.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionManager,
}

impl ApiClient {
    /// Creates a client for the configured inventory API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, session: SessionManager) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let mut base_url = config.app_base_url.clone();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The session manager backing this client.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let token = self
            .session
            .access_token()
            .ok_or(ApiError::NotAuthenticated)?;

        let mut request = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Sends a request, transparently refreshing the access token on the
    /// first 401 and replaying once. Returns the response body text.
    async fn request_text(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String, ApiError> {
        let mut response = self.send(method.clone(), path, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!(path, "got 401, refreshing and replaying once");
            self.session.refresh().await?;

            response = self.send(method, path, body).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                // Fresh token rejected: the grant itself is gone.
                self.session.invalidate();
                return Err(ApiError::SessionExpired);
            }
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: message_from_body(status.as_u16(), &text),
            });
        }
        Ok(text)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let text = self.request_text(method, path, body).await?;
        serde_json::from_str(&text)
            .map_err(|err| ApiError::UnexpectedResponse(format!("{path}: {err}")))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::UnexpectedResponse(format!("{path}: encode: {err}")))?;
        self.request(Method::POST, path, Some(&body)).await
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::UnexpectedResponse(format!("{path}: encode: {err}")))?;
        self.request(Method::PUT, path, Some(&body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_text(Method::DELETE, path, None).await?;
        Ok(())
    }
}
