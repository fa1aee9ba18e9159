//! Core data types for the detection workflow
//!
//! Local state types plus the wire DTOs exchanged with the detection
//! service. The service reports `is_deepfake` as a 0/1 integer; the
//! deserializer also tolerates a JSON boolean.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

use crate::preview::PreviewHandle;

/// Media classification derived from the filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Currently selected media file
#[derive(Debug)]
pub struct MediaSelection {
    /// Path of the file as selected by the user
    pub path: PathBuf,

    /// Locally known filename, recorded in history on success
    pub filename: String,

    /// Image or video, per extension
    pub kind: MediaKind,

    /// Scratch copy for local preview; deleted when the selection is
    /// replaced or cleared
    pub preview: PreviewHandle,
}

/// Verdict for the most recent completed detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionResult {
    pub is_deepfake: bool,

    /// As reported by the service, passed through unmodified (no clamping)
    pub confidence: f64,
}

/// Completed detection, immutable once recorded
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub filename: String,
    pub is_deepfake: bool,
    pub confidence: f64,
    pub detected_at: DateTime<Utc>,
}

// ============================================================================
// Wire DTOs
// ============================================================================

/// POST /login success body
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always "bearer" from the reference service; unused
    #[serde(default)]
    pub token_type: Option<String>,
}

/// POST /upload/ success body (subset; the service echoes more media
/// fields which the client has no use for)
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub id: i64,
}

/// GET /result/{id} success body
#[derive(Debug, Deserialize)]
pub struct ResultResponse {
    #[serde(deserialize_with = "bool_from_int")]
    pub is_deepfake: bool,
    pub confidence: f64,
}

impl From<ResultResponse> for DetectionResult {
    fn from(body: ResultResponse) -> Self {
        Self {
            is_deepfake: body.is_deepfake,
            confidence: body.confidence,
        }
    }
}

/// Failure body shape used across all endpoints
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

fn bool_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrBool {
        Int(i64),
        Bool(bool),
    }

    Ok(match IntOrBool::deserialize(deserializer)? {
        IntOrBool::Int(n) => n != 0,
        IntOrBool::Bool(b) => b,
    })
}
