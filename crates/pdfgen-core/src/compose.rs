//! Page composition
//!
//! Assembles the final HTML document and the matching print options from a
//! generate request. The composer is the only place that decides margins,
//! so the HTML it emits and the options it returns always agree.

use futures::try_join;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::asset::{AssetFetcher, AssetKind, ImageAsset, ImageResolver, SourceLocator};
use crate::constants::{DEFAULT_MARGIN, PAGE_WIDTH};
use crate::error::Result;
use crate::options::{PrintOptions, PrintOptionsBuilder};
use crate::part::{scale_part, PartRole};
use crate::splice::{splice, PageRasterizer};
use crate::watermark::inject_watermark;

/// Generate request as received over HTTP.
///
/// Empty strings in optional fields count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateRequest {
    pub header: Option<String>,
    pub body: String,
    pub footer: Option<String>,
    pub watermark: Option<String>,
    pub original_cv: Option<String>,
}

impl GenerateRequest {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn header_source(&self) -> Option<&str> {
        present(&self.header)
    }

    pub fn footer_source(&self) -> Option<&str> {
        present(&self.footer)
    }

    pub fn watermark_source(&self) -> Option<&str> {
        present(&self.watermark)
    }

    pub fn original_cv_source(&self) -> Option<&str> {
        present(&self.original_cv)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Final HTML plus the options it must be printed with.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedDocument {
    pub html: String,
    pub options: PrintOptions,
}

/// Body wrapper used when no external document is spliced in.
///
/// The 72px inset sits inside the 72px side print margins, so body text ends
/// up 144px from each paper edge. Only spliced documents drop the side margins.
pub fn plain_body(body: &str) -> String {
    format!(
        r#"<main style="margin-left:{m}px;margin-right:{m}px;">{body}</main>"#,
        m = DEFAULT_MARGIN
    )
}

pub struct PageComposer<'a> {
    fetcher: &'a dyn AssetFetcher,
    rasterizer: &'a dyn PageRasterizer,
    locator: &'a SourceLocator,
}

impl<'a> PageComposer<'a> {
    pub fn new(
        fetcher: &'a dyn AssetFetcher,
        rasterizer: &'a dyn PageRasterizer,
        locator: &'a SourceLocator,
    ) -> Self {
        Self {
            fetcher,
            rasterizer,
            locator,
        }
    }

    /// Resolve assets, scale bands, splice the external document and return
    /// the document ready for rendering.
    ///
    /// Header, footer and watermark are fetched concurrently; the first
    /// failure aborts the whole composition.
    #[instrument(skip_all, fields(
        header = request.header_source().is_some(),
        footer = request.footer_source().is_some(),
        watermark = request.watermark_source().is_some(),
        original_cv = request.original_cv_source().is_some(),
    ))]
    pub async fn compose(&self, request: &GenerateRequest) -> Result<ComposedDocument> {
        let resolver = ImageResolver::new(self.fetcher, self.locator);

        let (header, footer, watermark) = try_join!(
            resolve_optional(&resolver, request.header_source(), AssetKind::Header),
            resolve_optional(&resolver, request.footer_source(), AssetKind::Footer),
            resolve_optional(&resolver, request.watermark_source(), AssetKind::Watermark),
        )?;

        let external = request.original_cv_source();
        let builder = PrintOptionsBuilder::new(external.is_some());

        let builder = match &header {
            Some(image) => {
                let part = scale_part(image, PartRole::Header, PAGE_WIDTH);
                debug!("Header band {}x{}", part.width, part.height);
                builder.header(&part)
            }
            None => builder,
        };

        let builder = match &footer {
            Some(image) => {
                let part = scale_part(image, PartRole::Footer, PAGE_WIDTH);
                debug!("Footer band {}x{}", part.width, part.height);
                builder.footer(&part)
            }
            None => builder,
        };

        let body = match external {
            Some(source) => {
                splice(
                    self.rasterizer,
                    self.locator,
                    source,
                    &request.body,
                    &builder.margins(),
                )
                .await?
            }
            None => plain_body(&request.body),
        };

        let html = match &watermark {
            Some(image) => inject_watermark(&body, &image.data_uri),
            None => body,
        };

        let options = builder.build()?;
        info!(
            "Composed document: {} bytes, margins top={} bottom={}",
            html.len(),
            options.margins.top,
            options.margins.bottom
        );

        Ok(ComposedDocument { html, options })
    }
}

async fn resolve_optional(
    resolver: &ImageResolver<'_>,
    source: Option<&str>,
    kind: AssetKind,
) -> Result<Option<ImageAsset>> {
    match source {
        Some(source) => resolver.resolve(source, kind).await.map(Some),
        None => Ok(None),
    }
}
