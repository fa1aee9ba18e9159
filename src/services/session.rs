//! Session manager: authentication lifecycle against the remote service
//!
//! Two states: `LoggedOut` and `LoggedIn(token)`. Login is the only
//! transition in; explicit logout the only transition out. A request
//! failure never clears the token, including a 401 mid-pipeline (kept
//! as-is from the reference behavior, see DESIGN.md).

use crate::error::WorkflowError;
use crate::models::TokenResponse;
use crate::services::failure_message;
use serde_json::json;

/// Authentication state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn { token: String },
}

/// Which credential form the user is filling in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Owns the access token and the auth endpoints
pub struct SessionManager {
    http: reqwest::Client,
    base_url: String,
    state: AuthState,
}

impl SessionManager {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self {
            http,
            base_url,
            state: AuthState::LoggedOut,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Access token, `None` when logged out
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::LoggedIn { token } => Some(token),
            AuthState::LoggedOut => None,
        }
    }

    /// POST /login with form-encoded credentials; stores the returned token
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), WorkflowError> {
        let params = [("username", username), ("password", password)];

        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WorkflowError::Auth(
                failure_message(response, "Login failed").await,
            ));
        }

        let body: TokenResponse = response.json().await?;
        self.state = AuthState::LoggedIn {
            token: body.access_token,
        };

        tracing::info!(username = %username, "Login succeeded");
        Ok(())
    }

    /// POST /register with JSON credentials.
    ///
    /// Success does not authenticate; the user is expected to log in
    /// afterwards.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), WorkflowError> {
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WorkflowError::Auth(
                failure_message(response, "Registration failed").await,
            ));
        }

        tracing::info!(email = %email, "Registration succeeded");
        Ok(())
    }

    /// Clear the token. Cascaded clearing of selection, result, errors
    /// and history is owned by the workflow controller.
    pub fn logout(&mut self) {
        self.state = AuthState::LoggedOut;
        tracing::info!("Logged out");
    }
}
