//! Watermark overlay
//!
//! The watermark is part of the document flow, not a header/footer template:
//! templates clip it and pin it to the band. A `position:fixed` element is
//! repeated by the print engine on every page at the same spot.

use crate::constants::{WATERMARK_OPACITY, WATERMARK_SIZE};

/// Overlay markup for an image data URI, centered on the page.
pub fn watermark_overlay(data_uri: &str) -> String {
    format!(
        concat!(
            r#"<div style="position:fixed;top:50%;left:50%;transform:translate(-50%,-50%);"#,
            r#"width:{size}px;height:{size}px;opacity:{opacity};z-index:10;pointer-events:none;">"#,
            r#"<img src="{src}" style="width:100%;height:100%;" /></div>"#
        ),
        size = WATERMARK_SIZE,
        opacity = WATERMARK_OPACITY,
        src = data_uri,
    )
}

/// Place the overlay ahead of the content so every printed page carries it.
pub fn inject_watermark(html: &str, data_uri: &str) -> String {
    format!("{}{}", watermark_overlay(data_uri), html)
}
