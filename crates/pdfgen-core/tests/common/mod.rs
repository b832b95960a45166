//! In-memory collaborators for composition tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use pdfgen_core::{
    AssetFetcher, PdfGenError, Pipeline, PrintOptions, RasterPage, Renderer, SourceLocator,
};
use pdfgen_core::splice::PageRasterizer;

pub const BASE_URL: &str = "https://app.example.com";

/// Encode a blank PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Serves bytes by exact location, 404 otherwise.
#[derive(Default)]
pub struct MapFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MapFetcher {
    pub fn with(mut self, location: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(location.to_string(), bytes);
        self
    }

    /// Register a PNG under `BASE_URL` + `path`.
    pub fn with_png(self, path: &str, width: u32, height: u32) -> Self {
        self.with(&format!("{}{}", BASE_URL, path), png_bytes(width, height))
    }
}

#[async_trait]
impl AssetFetcher for MapFetcher {
    async fn fetch(&self, location: &str) -> anyhow::Result<Vec<u8>> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("404 Not Found: {}", location))
    }
}

/// Returns `pages` fake page images for any location, or fails.
pub struct FakeRasterizer {
    pub pages: Option<usize>,
    pub calls: Mutex<Vec<(String, f32)>>,
}

impl FakeRasterizer {
    pub fn pages(n: usize) -> Self {
        Self {
            pages: Some(n),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            pages: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PageRasterizer for FakeRasterizer {
    async fn rasterize(&self, location: &str, scale: f32) -> anyhow::Result<Vec<RasterPage>> {
        self.calls.lock().unwrap().push((location.to_string(), scale));
        match self.pages {
            Some(n) => Ok((0..n).map(|i| RasterPage::new(format!("PAGE{}", i))).collect()),
            None => anyhow::bail!("not a PDF"),
        }
    }
}

/// Records what it was asked to print.
#[derive(Default)]
pub struct RecordingRenderer {
    pub fail: bool,
    pub last: Mutex<Option<(String, PrintOptions)>>,
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn render(&self, html: &str, options: &PrintOptions) -> pdfgen_core::Result<Vec<u8>> {
        *self.last.lock().unwrap() = Some((html.to_string(), options.clone()));
        if self.fail {
            return Err(PdfGenError::Render("Failed to render PDF".into()));
        }
        Ok(b"%PDF-1.7\n%fake\n".to_vec())
    }
}

pub fn pipeline(
    fetcher: MapFetcher,
    rasterizer: FakeRasterizer,
    renderer: Arc<RecordingRenderer>,
) -> Pipeline {
    Pipeline::new(
        Arc::new(fetcher),
        Arc::new(rasterizer),
        renderer,
        SourceLocator::new(BASE_URL),
    )
}
