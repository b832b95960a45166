//! Image asset resolution
//!
//! Turns a header/footer/watermark source (absolute URL or a path relative to
//! the configured base URL) into an embeddable data URI plus its pixel size.

use std::io::Cursor;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::ImageReader;
use tracing::{debug, warn};

use crate::error::{PdfGenError, Result};

/// Raw byte source for assets and external documents.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the bytes behind an already-resolved location.
    async fn fetch(&self, location: &str) -> anyhow::Result<Vec<u8>>;
}

/// Resolves caller-supplied sources against the configured base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocator {
    base_url: String,
}

impl SourceLocator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute `https://` / `http://` sources pass through untouched; anything
    /// else is appended verbatim to the base URL.
    pub fn locate(&self, source: &str) -> String {
        if is_absolute(source) {
            source.to_string()
        } else {
            format!("{}{}", self.base_url, source)
        }
    }
}

fn is_absolute(source: &str) -> bool {
    source.starts_with("https://") || source.starts_with("http://")
}

/// Pixel size read from an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A fetched image, ready to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// `data:<mime>;base64,<bytes>`
    pub data_uri: String,
    pub mime: String,
    /// `None` when the format was recognized but its header could not be read.
    pub dimensions: Option<Dimensions>,
}

impl ImageAsset {
    pub fn width(&self) -> Option<u32> {
        self.dimensions.map(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions.map(|d| d.height)
    }
}

/// Which slot an asset fills. Only used to phrase the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Header,
    Footer,
    Watermark,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Header => "Header",
            AssetKind::Footer => "Footer",
            AssetKind::Watermark => "Watermark",
        }
    }

    pub fn invalid_message(&self) -> String {
        format!("{} file is not valid", self.label())
    }
}

/// Sniff the image format from magic bytes and read its dimensions.
///
/// Returns the MIME type and, when readable, the pixel size. Fails if the
/// bytes are not a recognized image format.
pub fn probe_image(bytes: &[u8]) -> anyhow::Result<(String, Option<Dimensions>)> {
    let format = image::guess_format(bytes)?;
    let mime = format.to_mime_type();
    if !mime.starts_with("image/") {
        anyhow::bail!("File is not an image");
    }

    let dimensions = match ImageReader::with_format(Cursor::new(bytes), format).into_dimensions() {
        Ok((width, height)) => Some(Dimensions { width, height }),
        Err(e) => {
            debug!("Image dimensions unavailable: {}", e);
            None
        }
    };

    Ok((mime.to_string(), dimensions))
}

/// Encode bytes as a base64 data URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Fetches and validates header/footer/watermark images.
pub struct ImageResolver<'a> {
    fetcher: &'a dyn AssetFetcher,
    locator: &'a SourceLocator,
}

impl<'a> ImageResolver<'a> {
    pub fn new(fetcher: &'a dyn AssetFetcher, locator: &'a SourceLocator) -> Self {
        Self { fetcher, locator }
    }

    /// Fetch `source` and turn it into an [`ImageAsset`].
    ///
    /// Every failure, whether unreachable, unrecognized or non-image, collapses
    /// into [`PdfGenError::InvalidAsset`] carrying `kind`'s message.
    pub async fn resolve(&self, source: &str, kind: AssetKind) -> Result<ImageAsset> {
        let location = self.locator.locate(source);
        debug!("Resolving {} asset from {}", kind.label(), location);

        let invalid = |cause: anyhow::Error| {
            warn!("{} asset {} rejected: {:#}", kind.label(), location, cause);
            PdfGenError::InvalidAsset(kind.invalid_message())
        };

        let bytes = self.fetcher.fetch(&location).await.map_err(invalid)?;
        let (mime, dimensions) = probe_image(&bytes).map_err(invalid)?;

        Ok(ImageAsset {
            data_uri: data_uri(&mime, &bytes),
            mime,
            dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::collections::HashMap;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    struct MapFetcher(HashMap<String, Vec<u8>>);

    #[async_trait]
    impl AssetFetcher for MapFetcher {
        async fn fetch(&self, location: &str) -> anyhow::Result<Vec<u8>> {
            self.0
                .get(location)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 for {}", location))
        }
    }

    #[test]
    fn test_locate_relative_source_prefixes_base_url() {
        let locator = SourceLocator::new("https://app.example.com");
        assert_eq!(
            locator.locate("/storage/logo.png"),
            "https://app.example.com/storage/logo.png"
        );
        assert_eq!(locator.base_url(), "https://app.example.com");
    }

    #[test]
    fn test_locate_absolute_source_is_untouched() {
        let locator = SourceLocator::new("https://app.example.com");
        assert_eq!(
            locator.locate("https://cdn.example.com/logo.png"),
            "https://cdn.example.com/logo.png"
        );
        assert_eq!(
            locator.locate("http://cdn.example.com/logo.png"),
            "http://cdn.example.com/logo.png"
        );
    }

    #[test]
    fn test_probe_png_reads_mime_and_size() {
        let (mime, dims) = probe_image(&png_bytes(1200, 200)).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(
            dims,
            Some(Dimensions {
                width: 1200,
                height: 200
            })
        );
    }

    #[test]
    fn test_probe_rejects_text() {
        assert!(probe_image(b"just some text, not an image").is_err());
    }

    #[test]
    fn test_data_uri_format() {
        assert_eq!(data_uri("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_resolve_builds_data_uri() {
        let bytes = png_bytes(10, 20);
        let fetcher = MapFetcher(HashMap::from([(
            "https://app.example.com/logo.png".to_string(),
            bytes.clone(),
        )]));
        let locator = SourceLocator::new("https://app.example.com");
        let asset = ImageResolver::new(&fetcher, &locator)
            .resolve("/logo.png", AssetKind::Header)
            .await
            .unwrap();

        assert_eq!(asset.mime, "image/png");
        assert_eq!(asset.width(), Some(10));
        assert_eq!(asset.height(), Some(20));
        assert_eq!(asset.data_uri, data_uri("image/png", &bytes));
    }

    #[tokio::test]
    async fn test_resolve_non_image_uses_kind_message() {
        let fetcher = MapFetcher(HashMap::from([(
            "/notes.txt".to_string(),
            b"hello".to_vec(),
        )]));
        let locator = SourceLocator::default();
        let err = ImageResolver::new(&fetcher, &locator)
            .resolve("/notes.txt", AssetKind::Footer)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PdfGenError::InvalidAsset("Footer file is not valid".into())
        );
    }

    #[tokio::test]
    async fn test_resolve_unreachable_source() {
        let fetcher = MapFetcher(HashMap::new());
        let locator = SourceLocator::default();
        let err = ImageResolver::new(&fetcher, &locator)
            .resolve("/missing.png", AssetKind::Watermark)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Watermark file is not valid");
    }
}
