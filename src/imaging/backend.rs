//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two places the pipeline touches
//! encoded bytes: decoding an uploaded design into a
//! [`RasterImage`](super::raster::RasterImage), and encoding the analysis image
//! into a displayable preview. Everything between those two calls is pure
//! pixel math.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::Quality;
use super::raster::{AnalysisImage, RasterImage};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Could not encode preview: {0}")]
    Encode(String),
}

/// An encoded preview image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl Preview {
    /// Inline `data:` URI for embedding in HTML or JSON.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Trait for image backends.
///
/// `Sync` so a single backend can serve concurrent estimates; implementations
/// hold no per-call state.
pub trait ImageBackend: Sync {
    /// Decode encoded image bytes, including any resolution metadata.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError>;

    /// Encode the analysis image as a lossy preview.
    fn encode_preview(
        &self,
        image: &AnalysisImage,
        quality: Quality,
    ) -> Result<Preview, BackendError>;
}
