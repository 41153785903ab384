//! Turning a picked path (or raw bytes) into a validated [`SelectedFile`].

use std::path::Path;

use shared::domain::SelectedFile;

use crate::error::IntakeError;

const FALLBACK_FILE_NAME: &str = "image";

pub async fn load_selected_file(
    path: &Path,
    max_upload_bytes: u64,
) -> Result<SelectedFile, IntakeError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(IntakeError::NotAFile(path.to_path_buf()));
    }
    // Checked before reading so oversized files never get loaded.
    if metadata.len() > max_upload_bytes {
        return Err(IntakeError::TooLarge {
            size: metadata.len(),
            limit: max_upload_bytes,
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(FALLBACK_FILE_NAME);

    validate_selection(name, bytes, max_upload_bytes)
}

pub fn validate_selection(
    name: &str,
    bytes: Vec<u8>,
    max_upload_bytes: u64,
) -> Result<SelectedFile, IntakeError> {
    if bytes.is_empty() {
        return Err(IntakeError::Empty);
    }
    let size = bytes.len() as u64;
    if size > max_upload_bytes {
        return Err(IntakeError::TooLarge {
            size,
            limit: max_upload_bytes,
        });
    }

    let mime_type = sniff_mime_type(name, &bytes);
    if !mime_type.starts_with("image/") {
        return Err(IntakeError::NotAnImage {
            detected: mime_type,
        });
    }

    Ok(SelectedFile::new(name, mime_type, bytes))
}

/// Magic bytes win; the extension is only consulted when they are unknown.
fn sniff_mime_type(name: &str, bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

#[cfg(test)]
#[path = "tests/intake_tests.rs"]
mod tests;
