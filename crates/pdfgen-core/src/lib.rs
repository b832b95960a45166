//! HTML-to-PDF layout composition
//!
//! This crate decides how a generate request is laid out before it reaches a
//! print engine:
//! - `asset`: fetch and validate header/footer/watermark images
//! - `part`: scale an image into a header or footer band
//! - `options`: print options built step by step
//! - `splice`: interleave a rasterized external document with the body
//! - `watermark`: fixed overlay repeated on every page
//! - `compose`: the composer tying the above together
//!
//! Fetching, rasterizing and rendering are trait seams implemented by the
//! server.

pub mod asset;
pub mod compose;
pub mod constants;
pub mod error;
pub mod options;
pub mod part;
pub mod pipeline;
pub mod render;
pub mod splice;
pub mod watermark;

pub use asset::{AssetFetcher, AssetKind, Dimensions, ImageAsset, ImageResolver, SourceLocator};
pub use compose::{ComposedDocument, GenerateRequest, PageComposer};
pub use error::{PdfGenError, Result};
pub use options::{PageFormat, PageMargins, PrintOptions, PrintOptionsBuilder};
pub use part::{scale_part, PartRole, RenderedPart};
pub use pipeline::Pipeline;
pub use render::Renderer;
pub use splice::{BodyTemplate, PageRasterizer, RasterPage, SPLICE_PLACEHOLDER};
