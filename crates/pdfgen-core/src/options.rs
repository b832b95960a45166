//! Print options handed to the renderer
//!
//! [`PrintOptionsBuilder`] threads an immutable value through each composition
//! step. Enabling either header or footer immediately installs a blank template
//! on the other side, so the renderer never substitutes its own boilerplate
//! (page numbers, URL, title).

use crate::constants::{BLANK_TEMPLATE, DEFAULT_MARGIN};
use crate::error::{PdfGenError, Result};
use crate::part::RenderedPart;

/// CSS pixels per inch, the renderer's conversion for numeric margins.
pub const PX_PER_INCH: f64 = 96.0;

/// Paper size selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageFormat {
    #[default]
    A4,
}

impl PageFormat {
    /// Paper width and height in inches.
    pub fn size_inches(&self) -> (f64, f64) {
        match self {
            PageFormat::A4 => (8.27, 11.7),
        }
    }
}

/// Page margins in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl PageMargins {
    /// Baseline margins. When an external document is spliced in, its page
    /// images span the full width and left/right collapse to zero.
    pub fn baseline(external_document: bool) -> Self {
        let margin = f64::from(DEFAULT_MARGIN);
        let side = if external_document { 0.0 } else { margin };
        Self {
            top: margin,
            bottom: margin,
            left: side,
            right: side,
        }
    }

    pub fn with_top(self, top: f64) -> Self {
        Self { top, ..self }
    }

    pub fn with_bottom(self, bottom: f64) -> Self {
        Self { bottom, ..self }
    }

    /// `(top, bottom, left, right)` in inches.
    pub fn to_inches(&self) -> (f64, f64, f64, f64) {
        (
            self.top / PX_PER_INCH,
            self.bottom / PX_PER_INCH,
            self.left / PX_PER_INCH,
            self.right / PX_PER_INCH,
        )
    }
}

/// Fully resolved renderer options.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOptions {
    pub format: PageFormat,
    pub print_background: bool,
    pub prefer_css_page_size: bool,
    pub display_header_footer: bool,
    pub header_template: Option<String>,
    pub footer_template: Option<String>,
    pub margins: PageMargins,
}

impl PrintOptions {
    /// Check that header/footer display never relies on a default template.
    pub fn validate(&self) -> Result<()> {
        if !self.display_header_footer {
            return Ok(());
        }
        let filled = |t: &Option<String>| t.as_deref().is_some_and(|s| !s.is_empty());
        if filled(&self.header_template) && filled(&self.footer_template) {
            Ok(())
        } else {
            Err(PdfGenError::Render(
                "Header and footer templates must both be set".to_string(),
            ))
        }
    }
}

/// Builds [`PrintOptions`] step by step, each step returning a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOptionsBuilder {
    options: PrintOptions,
}

impl PrintOptionsBuilder {
    /// A4, backgrounds on, CSS page size honored, no header/footer.
    pub fn new(external_document: bool) -> Self {
        Self {
            options: PrintOptions {
                format: PageFormat::A4,
                print_background: true,
                prefer_css_page_size: true,
                display_header_footer: false,
                header_template: None,
                footer_template: None,
                margins: PageMargins::baseline(external_document),
            },
        }
    }

    /// Current margins, as seen by later composition steps.
    pub fn margins(&self) -> PageMargins {
        self.options.margins
    }

    pub fn header(self, part: &RenderedPart) -> Self {
        let options = PrintOptions {
            display_header_footer: true,
            header_template: Some(part.markup.clone()),
            footer_template: self
                .options
                .footer_template
                .or_else(|| Some(BLANK_TEMPLATE.to_string())),
            margins: self.options.margins.with_top(f64::from(part.margin())),
            ..self.options
        };
        Self { options }
    }

    pub fn footer(self, part: &RenderedPart) -> Self {
        let options = PrintOptions {
            display_header_footer: true,
            header_template: self
                .options
                .header_template
                .or_else(|| Some(BLANK_TEMPLATE.to_string())),
            footer_template: Some(part.markup.clone()),
            margins: self.options.margins.with_bottom(f64::from(part.margin())),
            ..self.options
        };
        Self { options }
    }

    pub fn build(self) -> Result<PrintOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
