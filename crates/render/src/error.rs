//! Render errors.

/// Result type for fallible render output steps.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors from encoding a rendered image. Drawing itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// PNG encoding failed
    #[error("PNG encoding error: {0}")]
    Encode(#[from] png::EncodingError),
}
