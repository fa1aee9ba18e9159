//! dfcheck - client for a remote deepfake detection service
//!
//! Orchestrates the client-side workflow: authentication lifecycle,
//! filename validation, the sequential upload → detect → result
//! pipeline, and the in-memory history of completed detections. The
//! binary in main.rs is a thin interactive driver over this library.

pub mod config;
pub mod error;
pub mod models;
pub mod preview;
pub mod services;

pub use crate::error::{Result, WorkflowError};
pub use crate::services::controller::WorkflowController;
