//! Authorization service client.
//!
//! Thin typed wrapper over the auth REST endpoints. Responses arrive in an
//! envelope `{ success, message, data, timestamp }`; errors reuse the same
//! envelope with `message` set.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, message_from_body};
use crate::auth::store::UserProfile;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email or username
    pub identifier: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

/// Token grant returned by login, register and refresh.
///
/// `refresh_token` is optional: the refresh endpoint may keep the existing
/// one, in which case the field is omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: UserProfile,
}

/// Response envelope used by every auth endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

/// Client for the authorization service.
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl AuthApi {
    /// Creates a client for the given base URL.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: message_from_body(status.as_u16(), &body),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|err| ApiError::UnexpectedResponse(format!("{path}: {err}")))?;
        envelope.data.ok_or_else(|| {
            ApiError::UnexpectedResponse(format!(
                "{path}: missing data ({})",
                envelope.message.unwrap_or_default()
            ))
        })
    }

    /// Like [`Self::post`] but for endpoints whose `data` is irrelevant.
    async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post::<B, serde_json::Value>(path, body)
            .await
            .or_else(|err| match err {
                // Some deployments return an empty or data-less envelope
                ApiError::UnexpectedResponse(_) => Ok(serde_json::Value::Null),
                other => Err(other),
            })?;
        Ok(())
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenGrant, ApiError> {
        self.post("/api/auth/login", request).await
    }

    /// `POST /api/auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenGrant, ApiError> {
        self.post("/api/auth/register", request).await
    }

    /// `POST /api/auth/refresh`
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        self.post("/api/auth/refresh", &RefreshTokenRequest { refresh_token })
            .await
    }

    /// `POST /api/auth/logout` — invalidates the refresh token server-side.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        self.post_unit("/api/auth/logout", &RefreshTokenRequest { refresh_token })
            .await
    }

    /// `POST /api/auth/forgot-password`
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiError> {
        self.post_unit("/api/auth/forgot-password", request).await
    }

    /// `POST /api/auth/reset-password`
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.post_unit("/api/auth/reset-password", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: request bodies use the auth wire's camelCase names.
    #[test]
    fn test_request_wire_names() {
        let login = serde_json::to_value(LoginRequest {
            identifier: "ana@example.com".to_string(),
            password: "secret".to_string(),
            remember_me: Some(true),
        })
        .unwrap();
        assert_eq!(login["identifier"], "ana@example.com");
        assert_eq!(login["rememberMe"], true);

        let register = serde_json::to_value(RegisterRequest {
            email: "ana@example.com".to_string(),
            username: "ana".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
        })
        .unwrap();
        assert!(register.get("confirmPassword").is_some());

        let refresh = serde_json::to_value(RefreshTokenRequest { refresh_token: "r1" }).unwrap();
        assert_eq!(refresh["refreshToken"], "r1");
    }

    /// Test: a grant without refreshToken deserializes with None.
    #[test]
    fn test_grant_optional_refresh_token() {
        let grant: TokenGrant = serde_json::from_str(
            r#"{
                "accessToken": "a.b.c",
                "tokenType": "Bearer",
                "expiresIn": 900,
                "user": {
                    "id": "u-1", "email": "a@b.c", "username": "a",
                    "roles": [], "isActive": true, "isVerified": false
                }
            }"#,
        )
        .unwrap();

        assert_eq!(grant.access_token, "a.b.c");
        assert!(grant.refresh_token.is_none());
        assert_eq!(grant.user.username, "a");
    }
}
