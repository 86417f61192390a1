//! Authenticated HTTP plumbing for the PayMall API.
//!
//! # Architecture
//!
//! [`HttpClient`] is a cheaply cloneable handle (`Arc` inner) constructed
//! once and handed to each store explicitly - there is no process-wide
//! singleton. It owns three pieces of session state:
//!
//! - the in-memory access token (never persisted, never logged),
//! - the reqwest cookie store carrying the HTTP-only refresh cookie, which
//!   the client code itself never reads,
//! - the refresh coordinator, an `Idle`/`Refreshing` state machine.
//!
//! # 401 recovery
//!
//! A 401 on any endpoint except the refresh endpoint consults the
//! coordinator and replays the request exactly once with the renewed token.
//! A 401 on the replayed request is surfaced as a plain API error. The
//! refresh endpoint is never intercepted, so a rejected refresh cannot
//! recurse.
//!
//! While a refresh call is in flight, further 401s enqueue a waiter instead
//! of issuing a second refresh; waiters are resumed in enqueue order once
//! the single refresh resolves. The refresh call has no dedicated timeout -
//! a hung refresh stalls every queued request until the transport gives up.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock, oneshot, watch};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorPayload};
use crate::types::RefreshResponse;

/// Token refresh endpoint. Excluded from 401 interception.
pub(crate) const REFRESH_PATH: &str = "/users/token/refresh/";

/// Where the session currently stands, as observed by the HTTP layer.
///
/// Broadcast on a watch channel so the embedding application can react to
/// an expired session (the UI equivalent is a redirect to the login page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No access token is held.
    Anonymous,
    /// An access token is held and requests carry a bearer header.
    Authenticated,
    /// The silent refresh was rejected; the user must sign in again.
    Expired,
}

/// Result of a pass through the refresh coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefreshOutcome {
    /// A new access token is in place; replay the original request.
    Refreshed,
    /// The refresh credential was rejected; the session is gone.
    SessionExpired,
}

/// Refresh coordinator state. At most one refresh call is ever in flight;
/// the waiter queue is non-empty only while one is.
enum RefreshState {
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

/// Authenticated HTTP client for the PayMall API.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    base_url: String,
    access_token: RwLock<Option<SecretString>>,
    refresh: Mutex<RefreshState>,
    phase_tx: watch::Sender<SessionPhase>,
}

impl HttpClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        let (phase_tx, _) = watch::channel(SessionPhase::Anonymous);

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                base_url: config.base_url.clone(),
                access_token: RwLock::new(None),
                refresh: Mutex::new(RefreshState::Idle),
                phase_tx,
            }),
        })
    }

    /// Get the base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Subscribe to session phase changes.
    ///
    /// The receiver yields [`SessionPhase::Expired`] when a silent refresh
    /// is rejected; the embedding application should send the user back to
    /// its login surface.
    #[must_use]
    pub fn session_phases(&self) -> watch::Receiver<SessionPhase> {
        self.inner.phase_tx.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Token slot
    // ─────────────────────────────────────────────────────────────────────

    /// Install a new access token. All subsequent requests carry it.
    pub(crate) async fn set_access_token(&self, token: SecretString) {
        *self.inner.access_token.write().await = Some(token);
        let _ = self.inner.phase_tx.send(SessionPhase::Authenticated);
    }

    /// Drop the access token. Subsequent requests carry no bearer header.
    pub(crate) async fn clear_access_token(&self) {
        *self.inner.access_token.write().await = None;
        let _ = self.inner.phase_tx.send(SessionPhase::Anonymous);
    }

    async fn expire_session(&self) {
        *self.inner.access_token.write().await = None;
        let _ = self.inner.phase_tx.send(SessionPhase::Expired);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Request execution
    // ─────────────────────────────────────────────────────────────────────

    /// Issue one request. No interception, no retry.
    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&serde_json::Value>,
        authorize: bool,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.client.request(method.clone(), url);

        if authorize
            && let Some(token) = self.inner.access_token.read().await.as_ref()
        {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Issue a request with 401 interception and a single replay.
    ///
    /// The refresh endpoint is deliberately excluded: a 401 there is final.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let response = self.send_once(&method, path, body.as_ref(), true).await?;

        if response.status() != StatusCode::UNAUTHORIZED || path == REFRESH_PATH {
            return Self::check_status(response).await;
        }

        match self.refresh_access_token().await {
            RefreshOutcome::Refreshed => {
                debug!(path, "replaying request with refreshed token");
                let retried = self.send_once(&method, path, body.as_ref(), true).await?;
                // Single-retry policy: a second 401 surfaces as a plain
                // API error instead of re-entering the coordinator.
                Self::check_status(retried).await
            }
            RefreshOutcome::SessionExpired => Err(ApiError::SessionExpired),
        }
    }

    /// Map a non-success response to `ApiError::Api`, keeping the server's
    /// error body when it parses.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let payload = serde_json::from_str::<ErrorPayload>(&body).unwrap_or_default();
        debug!(status = status.as_u16(), message = payload.message(), "API rejection");

        Err(ApiError::Api {
            status: status.as_u16(),
            payload,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Refresh coordinator
    // ─────────────────────────────────────────────────────────────────────

    /// Renew the access token, coalescing concurrent attempts.
    ///
    /// The first caller while `Idle` owns the single refresh call; callers
    /// arriving while `Refreshing` park on a oneshot and are woken in
    /// enqueue order with the shared outcome.
    pub(crate) async fn refresh_access_token(&self) -> RefreshOutcome {
        let waiter = {
            let mut state = self.inner.refresh.lock().await;
            match &mut *state {
                RefreshState::Refreshing(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            debug!("refresh already in flight, queueing");
            // A dropped sender means the leader panicked; treat the
            // session as gone rather than refreshing again.
            return rx.await.unwrap_or(RefreshOutcome::SessionExpired);
        }

        let outcome = self.perform_refresh().await;

        let waiters = {
            let mut state = self.inner.refresh.lock().await;
            match std::mem::replace(&mut *state, RefreshState::Idle) {
                RefreshState::Refreshing(waiters) => waiters,
                RefreshState::Idle => Vec::new(),
            }
        };

        debug!(waiters = waiters.len(), ?outcome, "refresh resolved, flushing queue");
        for tx in waiters {
            let _ = tx.send(outcome);
        }

        outcome
    }

    /// The single refresh call. Cookie-authenticated: no bearer header, the
    /// refresh credential travels in the HTTP-only cookie the server set at
    /// login.
    async fn perform_refresh(&self) -> RefreshOutcome {
        debug!("access token rejected, attempting silent refresh");

        let result: Result<RefreshResponse, ApiError> = async {
            let response = self.send_once(&Method::POST, REFRESH_PATH, None, false).await?;
            let response = Self::check_status(response).await?;
            Ok(response.json().await?)
        }
        .await;

        match result {
            Ok(refreshed) => {
                self.set_access_token(SecretString::from(refreshed.access)).await;
                debug!("access token renewed");
                RefreshOutcome::Refreshed
            }
            Err(err) => {
                warn!(error = %err, "token refresh rejected, clearing session");
                self.expire_session().await;
                RefreshOutcome::SessionExpired
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Typed helpers
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, None).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::POST, path, Some(body)).await?;
        Ok(response.json().await?)
    }

    /// POST without a body, discarding any response payload.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::POST, path, None).await?;
        Ok(())
    }

    /// POST without a body, parsing the success payload leniently: an empty
    /// or non-JSON body yields `T::default()`.
    pub(crate) async fn post_empty_json<T: DeserializeOwned + Default>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::POST, path, None).await?;
        let body = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::PUT, path, Some(body)).await?;
        Ok(response.json().await?)
    }

    /// DELETE, expecting no response body (204).
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// GET a binary payload (invoice PDFs). Same interception path as JSON.
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(Method::GET, path, None).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
