//! Session lifecycle: token storage, expiry, refresh, guards and handoff.
//!
//! [`SessionManager`] is the single owner of authentication state. The
//! persisted [`TokenStore`] and the in-memory mirror are updated together
//! under one lock, so no other component can observe one ahead of the
//! other. Refreshes are single-flight: concurrent callers wait on the
//! in-flight refresh instead of issuing their own.

pub mod guard;
pub mod handoff;
pub mod jwt;
pub mod store;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::api::auth::{
    AuthApi, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenGrant,
};
use crate::api::ApiError;
use crate::config::Config;
pub use store::{Session, TokenStore, UserProfile};

/// Authentication state as observed by guards and UI surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Initializing,
    Authenticated,
    Refreshing,
}

/// Outcome of an authenticated check: proceed, or go sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCheck {
    Authenticated,
    Redirect(String),
}

/// Which sign-in page to land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    fn as_str(self) -> &'static str {
        match self {
            AuthAction::Login => "login",
            AuthAction::Register => "register",
        }
    }
}

struct State {
    auth: AuthState,
    session: Option<Session>,
}

struct Inner {
    store: TokenStore,
    api: AuthApi,
    auth_app_url: String,
    app_base_url: String,
    state: Mutex<State>,
    /// Serializes refreshes; at most one refresh call is in flight.
    refresh_gate: AsyncMutex<()>,
}

/// Owns the token lifecycle and exposes authentication state.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Creates a manager using the default store location.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_store(config, TokenStore::at_default())
    }

    /// Creates a manager backed by a specific store (tests, custom homes).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_store(config: &Config, store: TokenStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let mut auth_app_url = config.auth_app_url.clone();
        while auth_app_url.ends_with('/') {
            auth_app_url.pop();
        }

        Ok(Self {
            inner: Arc::new(Inner {
                api: AuthApi::new(http, config.auth_base_url.clone()),
                store,
                auth_app_url,
                app_base_url: config.app_base_url.clone(),
                state: Mutex::new(State {
                    auth: AuthState::Unauthenticated,
                    session: None,
                }),
                refresh_gate: AsyncMutex::new(()),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of the session machine.
    pub fn auth_state(&self) -> AuthState {
        self.state().auth
    }

    pub fn is_authenticated(&self) -> bool {
        let st = self.state();
        st.auth == AuthState::Authenticated && st.session.is_some()
    }

    /// The in-memory session, if any.
    pub fn session(&self) -> Option<Session> {
        self.state().session.clone()
    }

    /// The current access token, if a session exists.
    pub fn access_token(&self) -> Option<String> {
        self.state()
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// The current user snapshot, if a session exists.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state().session.as_ref().map(|s| s.user.clone())
    }

    /// The backing store (handoff and surfaces read through this).
    pub fn store(&self) -> &TokenStore {
        &self.inner.store
    }

    /// Whether a persisted session exists, without loading it into memory.
    pub fn has_stored_session(&self) -> bool {
        self.inner.store.read().ok().flatten().is_some()
    }

    /// Absolute application URL for a path.
    pub fn app_url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.app_base_url.trim_end_matches('/'))
    }

    /// Builds the sign-in URL and records where to return afterwards.
    ///
    /// The return URL defaults to the application base URL.
    pub fn login_redirect_url(&self, action: AuthAction, return_to: Option<&str>) -> String {
        let return_to = return_to.unwrap_or(&self.inner.app_base_url);
        if let Err(err) = self.inner.store.save_return_url(return_to) {
            warn!(error = %err, "failed to record return URL");
        }
        format!("{}/{}", self.inner.auth_app_url, action.as_str())
    }

    /// Drives the machine from stored tokens on startup.
    ///
    /// Returns true when the session ends up authenticated. A stored but
    /// expired access token triggers a refresh; refresh failure tears the
    /// session down and returns false.
    ///
    /// # Errors
    /// Returns an error only for local store I/O failures.
    pub async fn initialize(&self) -> Result<bool, ApiError> {
        {
            let mut st = self.state();
            if st.auth == AuthState::Authenticated && st.session.is_some() {
                return Ok(true);
            }
            st.auth = AuthState::Initializing;
        }

        let stored = self.inner.store.read().map_err(ApiError::Store)?;
        let Some(session) = stored else {
            debug!("no stored session");
            self.state().auth = AuthState::Unauthenticated;
            return Ok(false);
        };

        let access = session.access_token.clone();
        self.state().session = Some(session);

        if jwt::is_expired(&access) {
            debug!("stored access token expired, refreshing");
            match self.refresh_from(&access).await {
                Ok(()) => Ok(true),
                // refresh_from already cleared everything
                Err(_) => Ok(false),
            }
        } else {
            self.state().auth = AuthState::Authenticated;
            Ok(true)
        }
    }

    /// Verifies the session is usable, refreshing an expired access token.
    ///
    /// Resolves to exactly one outcome: authenticated, or a single redirect
    /// to the sign-in page (with the session torn down).
    ///
    /// # Errors
    /// Returns an error only for local store I/O failures.
    pub async fn check_auth(&self) -> Result<AuthCheck, ApiError> {
        let access = self.access_token();
        let Some(access) = access else {
            return Ok(AuthCheck::Redirect(
                self.login_redirect_url(AuthAction::Login, None),
            ));
        };

        if !jwt::is_expired(&access) {
            return Ok(AuthCheck::Authenticated);
        }

        match self.refresh_from(&access).await {
            Ok(()) => Ok(AuthCheck::Authenticated),
            Err(ApiError::Store(err)) => Err(ApiError::Store(err)),
            Err(_) => Ok(AuthCheck::Redirect(
                self.login_redirect_url(AuthAction::Login, None),
            )),
        }
    }

    /// Forces a token refresh (used by the HTTP wrapper on 401).
    ///
    /// # Errors
    /// `NotAuthenticated` without a session; `SessionExpired` when the
    /// refresh endpoint rejects the refresh token (the session is cleared).
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let seen = self.access_token().ok_or(ApiError::NotAuthenticated)?;
        self.refresh_from(&seen).await
    }

    /// Refreshes unless the access token the caller saw was already
    /// replaced by a refresh that finished while waiting on the gate.
    async fn refresh_from(&self, seen_access: &str) -> Result<(), ApiError> {
        let _gate = self.inner.refresh_gate.lock().await;

        let refresh_token = {
            let mut st = self.state();
            match st.session.as_ref() {
                None => return Err(ApiError::NotAuthenticated),
                Some(s) if s.access_token != seen_access => {
                    // Another caller refreshed while we waited.
                    return Ok(());
                }
                Some(s) => {
                    let refresh_token = s.refresh_token.clone();
                    st.auth = AuthState::Refreshing;
                    refresh_token
                }
            }
        };

        match self.inner.api.refresh(&refresh_token).await {
            Ok(grant) => {
                let session = Session {
                    access_token: grant.access_token,
                    // Refresh token is replaced only when the response carries one
                    refresh_token: grant.refresh_token.unwrap_or(refresh_token),
                    user: grant.user,
                };
                // Install in memory first so the machine lands in a
                // terminal state even if persisting fails.
                let mut st = self.state();
                st.session = Some(session.clone());
                st.auth = AuthState::Authenticated;
                if let Err(err) = self.inner.store.write(&session) {
                    drop(st);
                    warn!(error = %err, "refreshed session could not be persisted");
                    return Err(ApiError::Store(err));
                }
                debug!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                let mut st = self.state();
                st.session = None;
                st.auth = AuthState::Unauthenticated;
                drop(st);
                if let Err(store_err) = self.inner.store.clear() {
                    warn!(error = %store_err, "failed to clear session store");
                }
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Authenticates with credentials and installs the granted session.
    ///
    /// # Errors
    /// Validation failures surface as `ApiError::Status` with the
    /// server-provided message.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        let grant = self.inner.api.login(request).await?;
        self.install_grant(grant)
    }

    /// Registers a new account and installs the granted session.
    ///
    /// # Errors
    /// Validation failures surface as `ApiError::Status`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError> {
        let grant = self.inner.api.register(request).await?;
        self.install_grant(grant)
    }

    fn install_grant(&self, grant: TokenGrant) -> Result<Session, ApiError> {
        let refresh_token = grant.refresh_token.ok_or_else(|| {
            ApiError::UnexpectedResponse("grant missing refreshToken".to_string())
        })?;
        let session = Session {
            access_token: grant.access_token,
            refresh_token,
            user: grant.user,
        };

        let mut st = self.state();
        self.inner.store.write(&session).map_err(ApiError::Store)?;
        st.session = Some(session.clone());
        st.auth = AuthState::Authenticated;
        Ok(session)
    }

    /// Ends the session: best-effort server-side invalidation, then
    /// unconditional local cleanup. Returns the sign-in URL to land on.
    ///
    /// # Errors
    /// Returns an error only if the persisted session cannot be removed;
    /// in-memory state is cleared regardless.
    pub async fn logout(&self) -> Result<String, ApiError> {
        let refresh_token = self.state().session.as_ref().map(|s| s.refresh_token.clone());

        if let Some(token) = refresh_token
            && let Err(err) = self.inner.api.logout(&token).await
        {
            warn!(error = %err, "server-side token invalidation failed");
        }

        {
            let mut st = self.state();
            st.session = None;
            st.auth = AuthState::Unauthenticated;
        }
        self.inner.store.clear().map_err(ApiError::Store)?;

        Ok(self.login_redirect_url(AuthAction::Login, None))
    }

    /// Requests a password-recovery email.
    ///
    /// # Errors
    /// Validation failures surface as `ApiError::Status`.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiError> {
        self.inner.api.forgot_password(request).await
    }

    /// Completes a password reset with a recovery token.
    ///
    /// # Errors
    /// Validation failures surface as `ApiError::Status`.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.inner.api.reset_password(request).await
    }

    /// Mirrors a session delivered out of band (cross-app handoff) into
    /// store and memory.
    ///
    /// # Errors
    /// Returns an error if the session cannot be persisted.
    pub fn adopt_session(&self, session: Session) -> Result<(), ApiError> {
        let mut st = self.state();
        self.inner.store.write(&session).map_err(ApiError::Store)?;
        st.session = Some(session);
        st.auth = AuthState::Authenticated;
        Ok(())
    }

    /// Clears local state without contacting the server (irrecoverable 401).
    pub(crate) fn invalidate(&self) {
        let mut st = self.state();
        st.session = None;
        st.auth = AuthState::Unauthenticated;
        drop(st);
        if let Err(err) = self.inner.store.clear() {
            warn!(error = %err, "failed to clear session store");
        }
    }
}
