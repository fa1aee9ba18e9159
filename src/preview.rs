//! Scoped preview resource
//!
//! The selection preview is modeled as an owned scratch copy of the
//! selected media, deleted when the handle is dropped. Replacing or
//! clearing a selection therefore releases the previous copy instead of
//! relying on implicit cleanup.

use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::WorkflowError;

/// Owned temp-file copy of the selected media
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Copy the selected media into a scratch file for local preview
    pub fn create(source: &Path) -> Result<Self, WorkflowError> {
        let file = NamedTempFile::new()
            .map_err(|e| WorkflowError::Unexpected(format!("preview temp file: {}", e)))?;
        std::fs::copy(source, file.path())
            .map_err(|e| WorkflowError::Unexpected(format!("preview copy: {}", e)))?;

        tracing::debug!(
            source = %source.display(),
            preview = %file.path().display(),
            "Preview copy created"
        );

        Ok(Self { file })
    }

    /// Path of the scratch copy, valid until the handle is dropped
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
