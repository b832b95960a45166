//! Layout constants
//!
//! Empirically tuned values. All lengths are CSS pixels, the unit the
//! renderer applies to bare numeric margins and the unit the generated
//! markup is written in.

/// Width every scaled header/footer band is stretched to.
pub const PAGE_WIDTH: u32 = 596;

/// Height of A4 in the renderer's layout units.
pub const PAGE_HEIGHT: u32 = 842;

/// Images narrower than this are drawn at native width instead of stretched.
pub const MIN_SCALED_PART_WIDTH: u32 = 380;

/// Fixed band height for narrow or unmeasurable header/footer images.
pub const FIXED_PART_HEIGHT: u32 = 80;

/// Negative offset pulling a scaled band flush to the physical page edge.
pub const PART_EDGE_OFFSET: u32 = 16;

/// Space between a header/footer band and the body content.
pub const PART_GAP: u32 = 36;

/// Default print margin and horizontal body inset.
pub const DEFAULT_MARGIN: u32 = 72;

/// Conversion from layout units to the pixels rasterized pages are boxed in.
pub const PX_PER_PT: f64 = 1.33;

/// Upscale factor used when rasterizing an external document.
pub const RASTER_SCALE: f32 = 2.2;

/// Side length of the square watermark overlay.
pub const WATERMARK_SIZE: u32 = 280;

/// Opacity of the watermark overlay.
pub const WATERMARK_OPACITY: f64 = 0.25;

/// Template installed on whichever header/footer side has no image, so the
/// renderer never falls back to its own boilerplate.
pub const BLANK_TEMPLATE: &str = r#"<div style="font-size:0;width:100%">&nbsp;</div>"#;

/// Explicit break between rasterized pages.
pub const PAGE_BREAK: &str = r#"<div style="page-break-after:always;"></div>"#;
