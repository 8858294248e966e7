//! HTTP client core — auth calls, session persistence, and the
//! bearer-attaching request path every authorized endpoint goes through.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::config::ClientConfig;
use crate::error::{AuthError, Result};
use crate::session::{Session, SessionStore, normalize_auth_response};
use crate::signup::SignupSubmission;

/// The `{success, data, message}` envelope the current API wraps
/// non-auth responses in.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

/// Client for the LearnFrame API.
///
/// Owns one `reqwest::Client` and the injected session store; every
/// authorized call reads the store for a bearer token and clears it on a
/// 401.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The currently persisted session, if any. Never fails.
    pub async fn session(&self) -> Option<Session> {
        self.store.get().await
    }

    /// Drop the persisted session. Idempotent.
    pub async fn logout(&self) {
        self.store.clear().await;
        tracing::info!("Session cleared");
    }

    // ── Auth ────────────────────────────────────────────────────────

    /// Log in and persist the normalized session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = json!({"email": email, "password": password});
        let value = self
            .post_for_auth("/users/login", &body)
            .await?;

        let session = normalize_auth_response(&value)?;
        self.store.set(&session).await?;
        tracing::info!(user = %session.user.email, "Logged in as {}", session.user_type);
        Ok(session)
    }

    /// Sign up and persist the normalized session. `additional_data` is
    /// flattened into the top level of the request body, not nested.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        role: &str,
        name: &str,
        additional_data: &Map<String, Value>,
    ) -> Result<Session> {
        let mut body = Map::new();
        body.insert("email".to_string(), Value::String(email.to_string()));
        body.insert("password".to_string(), Value::String(password.to_string()));
        body.insert("role".to_string(), Value::String(role.to_string()));
        body.insert("name".to_string(), Value::String(name.to_string()));
        for (key, value) in additional_data {
            body.insert(key.clone(), value.clone());
        }

        let value = self
            .post_for_auth("/users/signup", &Value::Object(body))
            .await?;

        let session = normalize_auth_response(&value)?;
        self.store.set(&session).await?;
        tracing::info!(user = %session.user.email, "Signed up as {}", session.user_type);
        Ok(session)
    }

    /// Sign up from a wizard submission.
    pub async fn submit_signup(&self, submission: &SignupSubmission) -> Result<Session> {
        self.signup(
            &submission.email,
            &submission.password,
            &submission.role,
            &submission.name,
            &submission.additional_data,
        )
        .await
    }

    /// POST an auth request and hand back the raw JSON body for shape
    /// normalization. Auth endpoints are the one place the envelope is not
    /// trusted, so the body is parsed regardless of HTTP status.
    async fn post_for_auth(&self, path: &str, body: &Value) -> std::result::Result<Value, AuthError> {
        let resp = self
            .http
            .post(self.url(path))
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = resp.status();
        resp.json()
            .await
            .map_err(|_| AuthError::Request(format!("{path} returned {status}")))
    }

    // ── Authorized requests ─────────────────────────────────────────

    /// GET with bearer attachment and envelope unwrapping.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, AuthError> {
        let req = self.http.get(self.url(path)).query(query);
        let resp = self.send_authorized(req).await?;
        self.expect_data(resp).await
    }

    /// POST with bearer attachment and envelope unwrapping.
    pub(crate) async fn post_data<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> std::result::Result<T, AuthError> {
        let req = self.http.post(self.url(path)).json(body);
        let resp = self.send_authorized(req).await?;
        self.expect_data(resp).await
    }

    /// PUT with bearer attachment and envelope unwrapping.
    pub(crate) async fn put_data<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> std::result::Result<T, AuthError> {
        let req = self.http.put(self.url(path)).json(body);
        let resp = self.send_authorized(req).await?;
        self.expect_data(resp).await
    }

    /// Attach the bearer token when a session holds one and send. A 401
    /// clears the persisted session and signals `SessionExpired` exactly
    /// once; there is no retry.
    async fn send_authorized(
        &self,
        req: reqwest::RequestBuilder,
    ) -> std::result::Result<reqwest::Response, AuthError> {
        let mut req = req.timeout(self.request_timeout);
        if let Some(session) = self.store.get().await {
            if !session.token.is_empty() {
                req = req.bearer_auth(&session.token);
            }
        }

        let resp = req
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Authorized request returned 401; clearing session");
            self.store.clear().await;
            return Err(AuthError::SessionExpired);
        }

        Ok(resp)
    }

    /// Unwrap the `{success, data, message}` envelope, surfacing the
    /// server's message when it offers one.
    async fn expect_data<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> std::result::Result<T, AuthError> {
        let status = resp.status();
        let envelope: ApiEnvelope<T> = resp
            .json()
            .await
            .map_err(|_| AuthError::Request(format!("server returned {status}")))?;

        if !status.is_success() || !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("server returned {status}"));
            return Err(AuthError::Request(message));
        }

        envelope
            .data
            .ok_or_else(|| AuthError::Request("response missing data".to_string()))
    }
}
