//! Upload validation.
//!
//! Runs before the estimator sees any bytes: the file must carry an extension
//! the backend can decode and must not exceed the size limit (5 MiB by
//! default). Only the extension and the file size are checked here; whether
//! the content really is an image is the decoder's call.

use crate::imaging::supported_input_extensions;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default upload limit, 5120 KiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file type {extension:?} for {path} (accepted: {accepted})")]
    UnsupportedExtension {
        path: PathBuf,
        extension: String,
        accepted: String,
    },
    #[error("{path} is {size} bytes, the limit is {limit}")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// What an upload must satisfy.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    /// Lowercase extensions without the dot.
    pub extensions: Vec<&'static str>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            extensions: supported_input_extensions().to_vec(),
        }
    }
}

impl UploadPolicy {
    /// Whether `path` has an accepted extension, ignoring case.
    pub fn accepts(&self, path: &Path) -> bool {
        let ext = lowercase_extension(path);
        self.extensions.contains(&ext.as_str())
    }
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Validate an upload against `policy` and read it into memory.
pub fn read_upload(path: &Path, policy: &UploadPolicy) -> Result<Vec<u8>, IntakeError> {
    if !policy.accepts(path) {
        return Err(IntakeError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: lowercase_extension(path),
            accepted: policy.extensions.join(", "),
        });
    }

    let size = fs::metadata(path)?.len();
    if size > policy.max_bytes {
        return Err(IntakeError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: policy.max_bytes,
        });
    }

    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "accepted upload");
    Ok(bytes)
}
