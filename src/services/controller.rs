//! Workflow controller
//!
//! Wires user actions to the session manager, validator, detection
//! pipeline and history ledger, and owns the derived view state the
//! rendering layer reads: the loading flag, the mutually exclusive
//! auth/detection error slots, and an informational message slot.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;

use crate::config::Config;
use crate::error::WorkflowError;
use crate::models::{DetectionResult, HistoryEntry, MediaSelection};
use crate::preview::PreviewHandle;
use crate::services::detection::DetectionClient;
use crate::services::history::HistoryLedger;
use crate::services::session::{AuthMode, SessionManager};
use crate::services::validator;

const USER_AGENT: &str = concat!("dfcheck/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const REJECTED_FILE_MESSAGE: &str = "Please select a JPG, PNG image or MP4, AVI, MOV video.";
const NO_SELECTION_MESSAGE: &str = "Please select an image or video file.";
const NOT_LOGGED_IN_MESSAGE: &str = "Please log in first.";
const REGISTERED_MESSAGE: &str = "Registration successful! Please log in.";

/// Top-level coordinator for the detection workflow
pub struct WorkflowController {
    session: SessionManager,
    detector: DetectionClient,
    history: HistoryLedger,
    auth_mode: AuthMode,
    selection: Option<MediaSelection>,
    result: Option<DetectionResult>,
    auth_error: Option<String>,
    detection_error: Option<String>,
    info_message: Option<String>,
    loading: bool,
}

impl WorkflowController {
    pub fn new(config: &Config) -> Result<Self, WorkflowError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WorkflowError::Config(e.to_string()))?;

        Ok(Self {
            session: SessionManager::new(http.clone(), config.api_url.clone()),
            detector: DetectionClient::new(http, config.api_url.clone()),
            history: HistoryLedger::new(),
            auth_mode: AuthMode::Login,
            selection: None,
            result: None,
            auth_error: None,
            detection_error: None,
            info_message: None,
            loading: false,
        })
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    pub async fn login(&mut self, username: &str, password: &str) {
        self.auth_error = None;
        self.info_message = None;

        if let Err(e) = self.session.login(username, password).await {
            tracing::warn!(error = %e, "Login failed");
            self.auth_error = Some(e.to_string());
        }
    }

    /// On success the auth mode flips back to login; registration never
    /// authenticates.
    pub async fn register(&mut self, email: &str, password: &str) {
        self.auth_error = None;
        self.info_message = None;

        match self.session.register(email, password).await {
            Ok(()) => {
                self.auth_mode = AuthMode::Login;
                self.info_message = Some(REGISTERED_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                self.auth_error = Some(e.to_string());
            }
        }
    }

    /// Clears token, selection, result, errors and history unconditionally
    pub fn logout(&mut self) {
        self.session.logout();
        self.history.clear();
        self.selection = None; // drops the preview handle
        self.result = None;
        self.auth_error = None;
        self.detection_error = None;
        self.info_message = None;
    }

    /// Switching between the login and register forms clears any stale
    /// auth error
    pub fn set_auth_mode(&mut self, mode: AuthMode) {
        self.auth_mode = mode;
        self.auth_error = None;
    }

    // ========================================================================
    // Selection & submission
    // ========================================================================

    /// Validate and select a media file. Replacing a selection releases
    /// the previous preview copy.
    pub fn select_file(&mut self, path: &Path) {
        self.detection_error = None;
        self.result = None;

        match Self::build_selection(path) {
            Ok(selection) => self.selection = Some(selection),
            Err(e) => {
                self.selection = None;
                self.detection_error = Some(e.to_string());
            }
        }
    }

    fn build_selection(path: &Path) -> Result<MediaSelection, WorkflowError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let kind = validator::classify(&filename)
            .ok_or_else(|| WorkflowError::Validation(REJECTED_FILE_MESSAGE.to_string()))?;
        let preview = PreviewHandle::create(path)?;

        Ok(MediaSelection {
            path: path.to_path_buf(),
            filename,
            kind,
            preview,
        })
    }

    /// Drop the current selection and its preview copy
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Run the three-stage detection pipeline for the current selection.
    ///
    /// Result and detection error are reset at the start of every
    /// attempt so a stale verdict never lingers alongside a new error.
    /// The loading flag is released on every exit path.
    pub async fn submit(&mut self) {
        self.detection_error = None;
        self.result = None;

        let Some(token) = self.session.token().map(str::to_owned) else {
            self.detection_error = Some(NOT_LOGGED_IN_MESSAGE.to_string());
            return;
        };
        let Some(selection) = &self.selection else {
            self.detection_error = Some(NO_SELECTION_MESSAGE.to_string());
            return;
        };
        let path = selection.path.clone();
        let filename = selection.filename.clone();

        self.loading = true;
        let outcome = self.detector.detect(&path, &filename, &token).await;
        self.loading = false;

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.history.record(HistoryEntry {
                    filename,
                    is_deepfake: result.is_deepfake,
                    confidence: result.confidence,
                    detected_at: Utc::now(),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, filename = %filename, "Detection failed");
                self.detection_error = Some(e.to_string());
            }
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ========================================================================
    // View state
    // ========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn selection(&self) -> Option<&MediaSelection> {
        self.selection.as_ref()
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn detection_error(&self) -> Option<&str> {
        self.detection_error.as_deref()
    }

    pub fn info_message(&self) -> Option<&str> {
        self.info_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
