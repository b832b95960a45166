//! Request pipeline: compose, then render.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::asset::{AssetFetcher, SourceLocator};
use crate::compose::{ComposedDocument, GenerateRequest, PageComposer};
use crate::error::Result;
use crate::render::Renderer;
use crate::splice::PageRasterizer;

/// Everything needed to turn a [`GenerateRequest`] into PDF bytes.
///
/// Holds no per-request state; each call composes and renders independently.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn AssetFetcher>,
    rasterizer: Arc<dyn PageRasterizer>,
    renderer: Arc<dyn Renderer>,
    locator: SourceLocator,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        rasterizer: Arc<dyn PageRasterizer>,
        renderer: Arc<dyn Renderer>,
        locator: SourceLocator,
    ) -> Self {
        Self {
            fetcher,
            rasterizer,
            renderer,
            locator,
        }
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    pub async fn compose(&self, request: &GenerateRequest) -> Result<ComposedDocument> {
        PageComposer::new(self.fetcher.as_ref(), self.rasterizer.as_ref(), &self.locator)
            .compose(request)
            .await
    }

    /// Compose and render. No partial output is returned on failure.
    #[instrument(skip_all)]
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Vec<u8>> {
        let document = self.compose(request).await?;
        document.options.validate()?;

        let pdf = self.renderer.render(&document.html, &document.options).await?;
        info!("Rendered PDF: {} bytes", pdf.len());
        Ok(pdf)
    }
}
