//! Authenticated HTTP client.
//!
//! [`ApiClient::execute`] attaches the stored bearer credential and the
//! session cookie to every call. When a call comes back 401 it is retried
//! exactly once:
//!
//! 1. If a refresh is already running, the call waits for its outcome.
//! 2. Otherwise the call leads a refresh (`POST /auth/refresh`). Before
//!    refreshing, the leader checks whether the credential that was rejected
//!    is still the stored one; if another call rotated it in the meantime the
//!    call is simply replayed with the stored credential.
//! 3. A successful refresh is persisted, then every waiter is released with
//!    the new credential and reissues its call.
//! 4. A failed refresh releases every waiter with the failure, deletes the
//!    stored session and navigates to the login view.
//!
//! Calls marked non-refreshable (login, register, refresh, logout) and calls
//! that were already retried surface their 401 as [`ApiError::Unauthorized`].

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use super::request::{ApiRequest, Method};
use crate::auth::{
    parse_refresh_cookie, RefreshCoordinator, RefreshError, RefreshLeader, RefreshTicket, Session,
};
use crate::error::{ApiError, ApiResult};
use crate::models::{ErrorBody, TokenResponse};
use crate::traits::{Headers, HttpClient, Navigator, Response, SessionStore, StoreError};
use crate::view::View;

/// Client for the TradeLog backend.
///
/// Cheap to clone; clones share the transport, the session store and the
/// refresh coordinator.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    refresh: Arc<RefreshCoordinator>,
    /// Serializes read-modify-write cycles on the stored session.
    session_writes: Arc<AsyncMutex<()>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` (for example `http://localhost:8080/api/v1`).
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            store,
            navigator,
            refresh: Arc::new(RefreshCoordinator::new()),
            session_writes: Arc::new(AsyncMutex::new(())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Refresh bookkeeping of this client.
    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// The stored session, if any.
    pub async fn session(&self) -> ApiResult<Option<Session>> {
        Ok(self.store.load().await?)
    }

    pub(crate) fn navigate(&self, view: View) {
        self.navigator.navigate(view);
    }

    /// Send `request`, recovering once from an expired credential.
    ///
    /// Returns the response for any 2xx status, or the mapped [`ApiError`].
    pub async fn execute(&self, mut request: ApiRequest) -> ApiResult<Response> {
        let session = self.store.load().await?.unwrap_or_default();
        let sent = session.access_token.clone();
        let response = self
            .dispatch(&request, sent.as_deref(), session.cookie_header())
            .await?;

        if response.status != 401 || !request.can_retry() {
            return self.check_status(&request, response);
        }

        request.retried = true;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "Credential rejected, recovering"
        );
        let token = self.recover_credential(sent.as_deref()).await?;

        let cookie = self.stored_session().await.and_then(|s| s.cookie_header());
        let response = self.dispatch(&request, Some(&token), cookie).await?;
        if response.status == 401 {
            tracing::warn!(path = %request.path, "Credential rejected again after refresh");
        }
        self.check_status(&request, response)
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(ApiRequest::get(path)).await?;
        Ok(response.json()?)
    }

    /// POST `body` to `path` and decode the JSON body.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.execute(ApiRequest::post(path, body)?).await?;
        Ok(response.json()?)
    }

    /// Obtain a fresh credential, joining a refresh that is already running.
    pub async fn refresh(&self) -> ApiResult<String> {
        match self.refresh.begin() {
            RefreshTicket::Follower(waiter) => waiter.wait().await.map_err(ApiError::SessionExpired),
            RefreshTicket::Leader(leader) => self.lead_refresh(leader).await,
        }
    }

    /// Get a credential to replay a call whose `rejected` credential got a 401.
    async fn recover_credential(&self, rejected: Option<&str>) -> ApiResult<String> {
        let leader = match self.refresh.begin() {
            RefreshTicket::Follower(waiter) => {
                tracing::debug!("Waiting for in-flight token refresh");
                return waiter.wait().await.map_err(ApiError::SessionExpired);
            }
            RefreshTicket::Leader(leader) => leader,
        };

        let stored = self.stored_session().await.and_then(|s| s.access_token);
        if let Some(current) = stored {
            if rejected != Some(current.as_str()) {
                tracing::debug!("Credential rotated while in flight, replaying with stored token");
                leader.complete(Ok(current.clone()));
                return Ok(current);
            }
        }

        self.lead_refresh(leader).await
    }

    async fn lead_refresh(&self, leader: RefreshLeader<'_>) -> ApiResult<String> {
        match self.request_new_token().await {
            Ok(token) => {
                tracing::info!("Access token refreshed");
                leader.complete(Ok(token.clone()));
                Ok(token)
            }
            Err(err) => {
                tracing::warn!(status = ?err.status, "Token refresh failed: {}", err);
                leader.complete(Err(err.clone()));
                if let Err(store_err) = self.end_session().await {
                    tracing::warn!("Failed to clear session: {}", store_err);
                }
                Err(ApiError::SessionExpired(err))
            }
        }
    }

    /// `POST /auth/refresh` with the session cookie. The new credential is
    /// persisted before this returns.
    async fn request_new_token(&self) -> Result<String, RefreshError> {
        let cookie = self.stored_session().await.and_then(|s| s.cookie_header());
        let request = ApiRequest::empty_post("/auth/refresh").public();
        let response = self
            .dispatch(&request, None, cookie)
            .await
            .map_err(|e| RefreshError::new(None, e.to_string()))?;

        if !response.is_success() {
            return Err(RefreshError::new(
                Some(response.status),
                error_message(&response),
            ));
        }

        let body: TokenResponse = response.json().map_err(|e| {
            RefreshError::new(Some(response.status), format!("Malformed refresh response: {}", e))
        })?;

        let token = body.access_token;
        let persisted = self
            .update_session(|session| session.rotate_token(token.clone()))
            .await;
        if let Err(err) = persisted {
            tracing::warn!("Refreshed token could not be persisted: {}", err);
        }
        Ok(token)
    }

    /// Delete the stored session and go back to the login view.
    pub(crate) async fn end_session(&self) -> Result<(), StoreError> {
        let cleared = {
            let _guard = self.session_writes.lock().await;
            self.store.clear().await
        };
        self.navigate(View::Login);
        cleared
    }

    /// Replace the stored session.
    pub(crate) async fn replace_session(&self, session: &Session) -> Result<(), StoreError> {
        let _guard = self.session_writes.lock().await;
        self.store.save(session).await
    }

    async fn update_session<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Session),
    {
        let _guard = self.session_writes.lock().await;
        let mut session = self.store.load().await?.unwrap_or_default();
        apply(&mut session);
        self.store.save(&session).await
    }

    async fn stored_session(&self) -> Option<Session> {
        match self.store.load().await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("Failed to load session: {}", err);
                None
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        cookie: Option<String>,
    ) -> ApiResult<Response> {
        let url = self.url(&request.path);
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        if let Some(cookie) = cookie {
            headers.insert("Cookie".to_string(), cookie);
        }

        let response = match request.method {
            Method::Get => self.http.get(&url, &headers).await?,
            Method::Post => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                let body = request.body.as_deref().unwrap_or("{}");
                self.http.post(&url, body, &headers).await?
            }
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            retried = request.retried,
            "Response received"
        );
        self.capture_cookie(&response).await;
        Ok(response)
    }

    /// Track the session cookie the server sets or clears.
    async fn capture_cookie(&self, response: &Response) {
        let Some(cookie) = response.header("set-cookie").and_then(parse_refresh_cookie) else {
            return;
        };

        let _guard = self.session_writes.lock().await;
        let mut session = match self.store.load().await {
            Ok(session) => session.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("Failed to load session for cookie update: {}", err);
                return;
            }
        };
        if session.refresh_cookie == cookie {
            return;
        }

        session.refresh_cookie = cookie;
        if let Err(err) = self.store.save(&session).await {
            tracing::warn!("Failed to persist session cookie: {}", err);
        }
    }

    fn check_status(&self, request: &ApiRequest, response: Response) -> ApiResult<Response> {
        if response.is_success() {
            return Ok(response);
        }

        let err = ApiError::from_status(response.status, error_message(&response));
        tracing::debug!(
            path = %request.path,
            status = response.status,
            code = err.error_code(),
            "Request failed"
        );
        Err(err)
    }
}

/// Message of an error response: the `error` field if the body has one,
/// otherwise the trimmed body text.
fn error_message(response: &Response) -> String {
    match response.json::<ErrorBody>() {
        Ok(body) => body.error,
        Err(_) => response.text().unwrap_or_default().trim().to_string(),
    }
}
