//! Header/footer band scaling
//!
//! Fits an image of arbitrary aspect ratio into a print-engine template slot.
//! Wide images are stretched to the page width with a proportional height;
//! narrow ones keep their native width at a fixed band height so small logos
//! are not blown up.

use crate::asset::ImageAsset;
use crate::constants::{FIXED_PART_HEIGHT, MIN_SCALED_PART_WIDTH, PART_EDGE_OFFSET, PART_GAP};

/// Slot a band is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    Header,
    Footer,
}

impl PartRole {
    /// Element name wrapping the image.
    pub fn tag(&self) -> &'static str {
        match self {
            PartRole::Header => "header",
            PartRole::Footer => "footer",
        }
    }

    /// Side of the band that faces the physical page edge.
    pub fn page_edge(&self) -> &'static str {
        match self {
            PartRole::Header => "top",
            PartRole::Footer => "bottom",
        }
    }
}

/// A header or footer fragment sized for one template slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPart {
    pub markup: String,
    pub width: u32,
    pub height: u32,
}

impl RenderedPart {
    /// Page margin needed to clear this band: its height plus the body gap.
    pub fn margin(&self) -> u32 {
        self.height + PART_GAP
    }
}

/// Scale `image` for the given role against a fixed page width.
pub fn scale_part(image: &ImageAsset, role: PartRole, page_width: u32) -> RenderedPart {
    let tag = role.tag();

    let Some(dimensions) = image.dimensions.filter(|d| d.width > 0) else {
        return fixed_height_part(&image.data_uri, tag, page_width);
    };

    if dimensions.width < MIN_SCALED_PART_WIDTH {
        return fixed_height_part(&image.data_uri, tag, dimensions.width);
    }

    let compression_ratio = f64::from(dimensions.width) / f64::from(page_width);
    let height = (f64::from(dimensions.height) / compression_ratio).ceil() as u32;

    RenderedPart {
        markup: format!(
            r#"<{tag} style="margin-{edge}:-{offset}px"><img style="width:{page_width}px;height:{height}px" src="{src}"></{tag}>"#,
            edge = role.page_edge(),
            offset = PART_EDGE_OFFSET,
            src = image.data_uri,
        ),
        width: page_width,
        height,
    }
}

fn fixed_height_part(src: &str, tag: &str, width: u32) -> RenderedPart {
    RenderedPart {
        markup: format!(
            r#"<{tag}><img style="width:{width}px;height:{FIXED_PART_HEIGHT}px" src="{src}"></{tag}>"#
        ),
        width,
        height: FIXED_PART_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Dimensions;
    use crate::constants::PAGE_WIDTH;
    use pretty_assertions::assert_eq;

    fn asset(dimensions: Option<(u32, u32)>) -> ImageAsset {
        ImageAsset {
            data_uri: "data:image/png;base64,AAAA".into(),
            mime: "image/png".into(),
            dimensions: dimensions.map(|(width, height)| Dimensions { width, height }),
        }
    }

    #[test]
    fn test_wide_header_scales_to_page_width() {
        let part = scale_part(&asset(Some((1200, 200))), PartRole::Header, PAGE_WIDTH);
        assert_eq!(part.width, 596);
        assert_eq!(part.height, 100);
        assert_eq!(part.margin(), 136);
        assert_eq!(
            part.markup,
            r#"<header style="margin-top:-16px"><img style="width:596px;height:100px" src="data:image/png;base64,AAAA"></header>"#
        );
    }

    #[test]
    fn test_wide_footer_offsets_bottom_edge() {
        let part = scale_part(&asset(Some((1192, 300))), PartRole::Footer, PAGE_WIDTH);
        assert_eq!(part.height, 150);
        assert!(part.markup.starts_with(r#"<footer style="margin-bottom:-16px">"#));
        assert!(part.markup.ends_with("</footer>"));
    }

    #[test]
    fn test_narrow_image_keeps_native_width() {
        let part = scale_part(&asset(Some((300, 900))), PartRole::Header, PAGE_WIDTH);
        assert_eq!(part.width, 300);
        assert_eq!(part.height, 80);
        assert_eq!(part.margin(), 116);
        assert_eq!(
            part.markup,
            r#"<header><img style="width:300px;height:80px" src="data:image/png;base64,AAAA"></header>"#
        );
    }

    #[test]
    fn test_threshold_width_is_scaled() {
        let part = scale_part(&asset(Some((380, 38))), PartRole::Header, PAGE_WIDTH);
        assert_eq!(part.width, PAGE_WIDTH);
        // 38 / (380 / 596) = 59.6
        assert_eq!(part.height, 60);
    }

    #[test]
    fn test_unknown_dimensions_use_page_width() {
        let part = scale_part(&asset(None), PartRole::Footer, PAGE_WIDTH);
        assert_eq!(part.width, PAGE_WIDTH);
        assert_eq!(part.height, 80);
        assert!(part.markup.contains("width:596px;height:80px"));
    }

    #[test]
    fn test_zero_width_treated_as_unknown() {
        let part = scale_part(&asset(Some((0, 50))), PartRole::Header, PAGE_WIDTH);
        assert_eq!(part.width, PAGE_WIDTH);
        assert_eq!(part.height, 80);
    }
}
