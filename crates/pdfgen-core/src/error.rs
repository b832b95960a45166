use thiserror::Error;

/// Failures surfaced by the composition pipeline.
///
/// The `Display` text of every variant is the message returned to the caller,
/// so variants carry the full user-facing sentence rather than a fragment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdfGenError {
    /// Header, footer or watermark could not be fetched or is not an image.
    #[error("{0}")]
    InvalidAsset(String),

    /// The external document could not be turned into page images.
    #[error("{0}")]
    Rasterization(String),

    /// The renderer failed to load the composed HTML or print it.
    #[error("{0}")]
    Render(String),

    /// The request itself is malformed.
    #[error("{0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, PdfGenError>;
