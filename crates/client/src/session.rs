//! Session store: the current user and their authentication lifecycle.
//!
//! The store mirrors one invariant: `is_authenticated()` iff a user record
//! is present. The access token itself lives in the [`HttpClient`]; the
//! refresh credential lives in an HTTP-only cookie the client never reads.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::http::{HttpClient, RefreshOutcome};
use crate::types::{LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest, User};

const TOKEN_PATH: &str = "/users/token/";
const REGISTER_PATH: &str = "/users/register/";
const PROFILE_PATH: &str = "/users/profile/";
const LOGOUT_PATH: &str = "/users/logout/";

/// Holds the current user. Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct SessionStore {
    http: HttpClient,
    user: Arc<RwLock<Option<User>>>,
}

impl SessionStore {
    /// Create a session store over an injected HTTP client.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Whether a user is signed in. True iff a user record is held.
    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    /// Rehydrate the session at application start.
    ///
    /// Attempts one silent refresh against the cookie credential; on success
    /// fetches the profile and populates the user. Any failure clears the
    /// session. Returns whether the session is authenticated afterwards.
    /// Runs once at startup; there are no retries.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> bool {
        if self.http.refresh_access_token().await == RefreshOutcome::SessionExpired {
            debug!("no usable refresh credential, starting anonymous");
            self.clear_local().await;
            return false;
        }

        match self.http.get_json::<User>(PROFILE_PATH).await {
            Ok(user) => {
                debug!(user = %user.email, "session rehydrated");
                *self.user.write().await = Some(user);
                true
            }
            Err(err) => {
                warn!(error = %err, "profile fetch failed after refresh, clearing session");
                self.http.clear_access_token().await;
                self.clear_local().await;
                false
            }
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On success the client's bearer token is updated and the user is
    /// stored; the server also sets the HTTP-only refresh cookie on this
    /// response. An API rejection returns `Ok(false)` with the session
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        let request = LoginRequest { email, password };
        match self.http.post_json::<LoginResponse>(TOKEN_PATH, &request).await {
            Ok(response) => {
                self.install(response).await;
                Ok(true)
            }
            Err(ApiError::Api { status, .. }) => {
                debug!(status, "login rejected");
                Ok(false)
            }
            // An unauthenticated login attempt can trip the 401 interceptor
            // when no refresh cookie exists; treat that as a plain rejection.
            Err(ApiError::SessionExpired) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures; validation
    /// rejections return `Ok(false)`.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<bool, ApiError> {
        match self.http.post_json::<LoginResponse>(REGISTER_PATH, request).await {
            Ok(response) => {
                self.install(response).await;
                Ok(true)
            }
            Err(ApiError::Api { .. } | ApiError::SessionExpired) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Sign out: best-effort server-side invalidation, then unconditionally
    /// clear local state. Never fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(err) = self.http.post_empty(LOGOUT_PATH).await {
            debug!(error = %err, "server-side logout failed, clearing locally anyway");
        }
        self.http.clear_access_token().await;
        self.clear_local().await;
    }

    /// Update the profile and refresh the stored user.
    ///
    /// # Errors
    ///
    /// Returns the API rejection or transport failure unchanged.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let user: User = self.http.put_json(PROFILE_PATH, update).await?;
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    async fn install(&self, response: LoginResponse) {
        self.http
            .set_access_token(SecretString::from(response.access))
            .await;
        *self.user.write().await = Some(response.user);
    }

    async fn clear_local(&self) {
        *self.user.write().await = None;
    }
}
