//! Filename-based media validation
//!
//! Extension check only, no content sniffing: a file whose content does
//! not match its name still passes. The extension is the substring after
//! the final `.`, compared case-insensitively.

use crate::models::MediaKind;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// Classify a filename by its extension.
///
/// Returns `None` for a missing or unrecognized extension.
pub fn classify(filename: &str) -> Option<MediaKind> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}
