//! Detection pipeline: upload → trigger analysis → fetch result
//!
//! Three strictly sequential remote calls, all-or-nothing. A failure at
//! any stage aborts the pipeline immediately; no stage is retried and
//! the uploaded artifact is not rolled back (cleanup of orphaned uploads
//! is a server responsibility). No partial-success state is exposed.

use std::path::Path;

use crate::error::WorkflowError;
use crate::models::{DetectionResult, ResultResponse, UploadResponse};
use crate::services::failure_message;

/// Client for the three detection endpoints
pub struct DetectionClient {
    http: reqwest::Client,
    base_url: String,
}

impl DetectionClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Run the full pipeline for one file.
    ///
    /// Each stage only begins after the previous response is fully
    /// received. The caller records the history entry on success using
    /// the locally known filename, not anything echoed by the server.
    pub async fn detect(
        &self,
        path: &Path,
        filename: &str,
        token: &str,
    ) -> Result<DetectionResult, WorkflowError> {
        let media_id = self.upload(path, filename, token).await?;
        self.trigger(media_id, token).await?;
        self.fetch_result(media_id, token).await
    }

    /// Stage 1: submit the raw file as multipart form content
    async fn upload(&self, path: &Path, filename: &str, token: &str) -> Result<i64, WorkflowError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| WorkflowError::Unexpected(format!("read {}: {}", path.display(), e)))?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload/", self.base_url))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WorkflowError::Detection(
                failure_message(response, "Upload failed").await,
            ));
        }

        let body: UploadResponse = response.json().await?;
        tracing::debug!(media_id = body.id, filename = %filename, "Upload accepted");
        Ok(body.id)
    }

    /// Stage 2: request analysis of the uploaded media
    async fn trigger(&self, media_id: i64, token: &str) -> Result<(), WorkflowError> {
        let response = self
            .http
            .post(format!("{}/detect/{}", self.base_url, media_id))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WorkflowError::Detection(
                failure_message(response, "Detection failed").await,
            ));
        }

        tracing::debug!(media_id, "Detection triggered");
        Ok(())
    }

    /// Stage 3: retrieve the computed verdict
    async fn fetch_result(
        &self,
        media_id: i64,
        token: &str,
    ) -> Result<DetectionResult, WorkflowError> {
        let response = self
            .http
            .get(format!("{}/result/{}", self.base_url, media_id))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WorkflowError::Detection(
                failure_message(response, "Could not get result").await,
            ));
        }

        let body: ResultResponse = response.json().await?;
        let result = DetectionResult::from(body);

        tracing::info!(
            media_id,
            is_deepfake = result.is_deepfake,
            confidence = result.confidence,
            "Detection result received"
        );

        Ok(result)
    }
}
