//! External document rasterization with pdfium

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat, RgbaImage};
use pdfgen_core::{AssetFetcher, PageRasterizer, RasterPage};
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// Rasterizes every page of a fetched PDF to PNG.
pub struct PdfiumRasterizer {
    fetcher: Arc<dyn AssetFetcher>,
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, library_dir: Option<PathBuf>) -> Self {
        Self {
            fetcher,
            library_dir,
        }
    }
}

#[async_trait]
impl PageRasterizer for PdfiumRasterizer {
    async fn rasterize(&self, location: &str, scale: f32) -> anyhow::Result<Vec<RasterPage>> {
        let bytes = self.fetcher.fetch(location).await?;
        let library_dir = self.library_dir.clone();

        let pages = tokio::task::spawn_blocking(move || {
            render_pages(library_dir.as_deref(), bytes, scale)
        })
        .await
        .context("Rasterization task panicked")??;

        debug!("Rasterized {} pages from {}", pages.len(), location);
        Ok(pages)
    }
}

/// Bind pdfium from `library_dir` if given, else from the system search path.
fn bind_pdfium(library_dir: Option<&Path>) -> anyhow::Result<Pdfium> {
    if let Some(dir) = library_dir {
        match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)) {
            Ok(binding) => return Ok(Pdfium::new(binding)),
            Err(e) => warn!("pdfium not loadable from {}: {:?}", dir.display(), e),
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| anyhow!("Failed to bind pdfium: {:?}", e))
}

fn render_pages(
    library_dir: Option<&Path>,
    bytes: Vec<u8>,
    scale: f32,
) -> anyhow::Result<Vec<RasterPage>> {
    let pdfium = bind_pdfium(library_dir)?;
    let document = pdfium
        .load_pdf_from_byte_vec(bytes, None)
        .map_err(|e| anyhow!("Failed to load PDF: {:?}", e))?;

    let config = PdfRenderConfig::new().scale_page_by_factor(scale);

    document
        .pages()
        .iter()
        .enumerate()
        .map(|(index, page)| -> anyhow::Result<RasterPage> {
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| anyhow!("Failed to render page {}: {:?}", index + 1, e))?;
            let png = encode_png(
                bitmap.width() as u32,
                bitmap.height() as u32,
                bitmap.as_rgba_bytes().to_vec(),
            )?;
            Ok(RasterPage::new(BASE64.encode(png)))
        })
        .collect()
}

/// Encode raw RGBA pixels as PNG.
fn encode_png(width: u32, height: u32, rgba: Vec<u8>) -> anyhow::Result<Vec<u8>> {
    let image = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| anyhow!("Bitmap size does not match {}x{}", width, height))?;

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
