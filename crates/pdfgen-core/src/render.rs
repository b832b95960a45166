//! Renderer seam
//!
//! The renderer is a black box that prints HTML to PDF. Implementations own
//! the engine for the duration of a single call and release it on every exit
//! path before returning.

use async_trait::async_trait;

use crate::error::Result;
use crate::options::PrintOptions;

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load `html`, wait for it to settle, and print it with `options`.
    ///
    /// Failures are reported as [`crate::PdfGenError::Render`].
    async fn render(&self, html: &str, options: &PrintOptions) -> Result<Vec<u8>>;
}
