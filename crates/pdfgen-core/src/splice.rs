//! External document splicing
//!
//! Rasterizes a multi-page document and interleaves its pages with the body
//! HTML at the `{original_cv}` splice point. Page breaks are emitted only
//! between page blocks. A break before the first or after the last block makes
//! the renderer emit an extra blank page.
//!
//! The splice point is plain text: a literal `{original_cv}` typed into the
//! body is indistinguishable from an intentional one. Only the first
//! occurrence splits the body; later occurrences stay as text.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::asset::SourceLocator;
use crate::constants::{DEFAULT_MARGIN, PAGE_BREAK, PAGE_HEIGHT, PAGE_WIDTH, PX_PER_PT, RASTER_SCALE};
use crate::error::{PdfGenError, Result};
use crate::options::PageMargins;

/// Token marking where the external document's pages go.
pub const SPLICE_PLACEHOLDER: &str = "{original_cv}";

const RASTERIZATION_FAILED: &str = "Original CV could not be converted";

const NO_ROOM_FOR_PAGES: &str = "Header and footer leave no room for the original CV";

/// Turns a document into one raster image per page.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Rasterize every page of the document at `location`, in page order,
    /// upscaled by `scale`.
    async fn rasterize(&self, location: &str, scale: f32) -> anyhow::Result<Vec<RasterPage>>;
}

/// One rasterized page as base64-encoded PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    pub png_base64: String,
}

impl RasterPage {
    pub fn new(png_base64: impl Into<String>) -> Self {
        Self {
            png_base64: png_base64.into(),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.png_base64)
    }
}

/// Body HTML split at its splice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyTemplate<'a> {
    pub before: &'a str,
    /// `None` when the body has no splice point.
    pub after: Option<&'a str>,
}

impl<'a> BodyTemplate<'a> {
    pub fn parse(body: &'a str) -> Self {
        match body.split_once(SPLICE_PLACEHOLDER) {
            Some((before, after)) => Self {
                before,
                after: Some(after),
            },
            None => Self {
                before: body,
                after: None,
            },
        }
    }

    pub fn has_splice_point(&self) -> bool {
        self.after.is_some()
    }
}

/// Pixel box each rasterized page is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub width: f64,
    pub height: f64,
}

impl PageBox {
    /// Content area left on a physical page once vertical margins are taken.
    /// Never negative; bands taller than the page leave a zero-height box.
    pub fn for_margins(margins: &PageMargins) -> Self {
        let content = f64::from(PAGE_HEIGHT) - margins.top - margins.bottom;
        Self {
            width: f64::from(PAGE_WIDTH) * PX_PER_PT,
            height: content.max(0.0) * PX_PER_PT,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.height <= 0.0
    }
}

/// Wrap a body fragment in the standard horizontal inset.
pub fn inset_fragment(fragment: &str) -> String {
    format!(
        r#"<div style="margin-left:{m}px;margin-right:{m}px">{fragment}</div>"#,
        m = DEFAULT_MARGIN
    )
}

fn page_block(page: &RasterPage, page_box: PageBox) -> String {
    format!(
        r#"<div style="width:{:.2}px;height:{:.2}px;position:relative;"><img src="{}" style="width:100%;height:100%;"></div>"#,
        page_box.width,
        page_box.height,
        page.data_uri()
    )
}

/// Page blocks joined by breaks, with no break at either end.
pub fn page_sequence(pages: &[RasterPage], page_box: PageBox) -> String {
    pages
        .iter()
        .map(|page| page_block(page, page_box))
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

/// Assemble the `<main>` block from already rasterized pages.
///
/// Without a splice point the pages follow the body.
pub fn splice_pages(body: &str, pages: &[RasterPage], margins: &PageMargins) -> String {
    let template = BodyTemplate::parse(body);
    let sequence = page_sequence(pages, PageBox::for_margins(margins));

    let mut html = String::from("<main>");
    html.push_str(&inset_fragment(template.before));
    html.push_str(&sequence);
    if let Some(after) = template.after {
        html.push_str(&inset_fragment(after));
    }
    html.push_str("</main>");
    html
}

/// Rasterize the document at `source` and splice it into `body`.
pub async fn splice(
    rasterizer: &dyn PageRasterizer,
    locator: &SourceLocator,
    source: &str,
    body: &str,
    margins: &PageMargins,
) -> Result<String> {
    let page_box = PageBox::for_margins(margins);
    if page_box.is_empty() {
        warn!(
            "Margins top={} bottom={} leave no page area",
            margins.top, margins.bottom
        );
        return Err(PdfGenError::InvalidRequest(NO_ROOM_FOR_PAGES.to_string()));
    }

    let location = locator.locate(source);
    let pages = rasterizer
        .rasterize(&location, RASTER_SCALE)
        .await
        .map_err(|e| {
            warn!("Rasterizing {} failed: {:#}", location, e);
            PdfGenError::Rasterization(RASTERIZATION_FAILED.to_string())
        })?;

    debug!("Splicing {} rasterized pages from {}", pages.len(), location);
    Ok(splice_pages(body, &pages, margins))
}
