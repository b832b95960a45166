//! Headless Chromium renderer
//!
//! Each render launches its own browser with a private profile directory,
//! prints one page, and tears the browser down again. Nothing is shared
//! between requests.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use pdfgen_core::{PdfGenError, PrintOptions, Renderer};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BrowserLaunch;

/// Resolves once the document has loaded, every image has decoded and web
/// fonts are ready.
const SETTLE_SCRIPT: &str = r#"(async () => {
    if (document.readyState !== 'complete') {
        await new Promise((resolve) => window.addEventListener('load', resolve, { once: true }));
    }
    await Promise.all(Array.from(document.images).map((img) => img.decode().catch(() => null)));
    if (document.fonts) {
        await document.fonts.ready;
    }
    return true;
})()"#;

/// Renders HTML to PDF with a per-request headless Chromium.
pub struct ChromiumRenderer {
    launch: BrowserLaunch,
    request_timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(launch: BrowserLaunch, request_timeout: Duration) -> Self {
        Self {
            launch,
            request_timeout,
        }
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, html: &str, options: &PrintOptions) -> pdfgen_core::Result<Vec<u8>> {
        let session = BrowserSession::launch(&self.launch, self.request_timeout)
            .await
            .map_err(render_error)?;

        let result = session.print(html, options).await;
        session.close().await;

        let pdf = result.map_err(render_error)?;
        info!("Printed {} byte PDF", pdf.len());
        Ok(pdf)
    }
}

fn render_error(e: anyhow::Error) -> PdfGenError {
    warn!("Renderer failed: {:#}", e);
    PdfGenError::Render(format!("Failed to render PDF: {}", e))
}

/// Translate print options into the DevTools print request.
pub fn print_params(options: &PrintOptions) -> PrintToPdfParams {
    let (paper_width, paper_height) = options.format.size_inches();
    let (top, bottom, left, right) = options.margins.to_inches();

    PrintToPdfParams {
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(top),
        margin_bottom: Some(bottom),
        margin_left: Some(left),
        margin_right: Some(right),
        print_background: Some(options.print_background),
        prefer_css_page_size: Some(options.prefer_css_page_size),
        display_header_footer: Some(options.display_header_footer),
        header_template: options.header_template.clone(),
        footer_template: options.footer_template.clone(),
        ..Default::default()
    }
}

/// A launched browser owned by one request.
///
/// `close` is called on every normal exit path. If the request future is
/// dropped first (timeout or client disconnect), `Drop` aborts the event
/// handler and the fields drop in declaration order: the browser process is
/// killed before `profile` deletes its directory.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    profile: TempDir,
}

impl BrowserSession {
    async fn launch(launch: &BrowserLaunch, request_timeout: Duration) -> anyhow::Result<Self> {
        let profile = profile_dir().context("Failed to create browser profile directory")?;

        let mut builder = BrowserConfig::builder()
            .request_timeout(request_timeout)
            .user_data_dir(profile.path());

        if let Some(executable) = &launch.executable {
            builder = builder.chrome_executable(executable);
        }
        if launch.no_sandbox {
            builder = builder.no_sandbox();
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {:?}", e);
                    break;
                }
            }
        });

        debug!("Browser launched with profile {}", profile.path().display());
        Ok(Self {
            browser,
            handler,
            profile,
        })
    }

    async fn print(&self, html: &str, options: &PrintOptions) -> anyhow::Result<Vec<u8>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open page")?;

        page.set_content(html)
            .await
            .context("Failed to load document")?;
        wait_until_settled(&page).await?;

        let pdf = page
            .pdf(print_params(options))
            .await
            .context("Failed to print document")?;

        if let Err(e) = page.close().await {
            debug!("Page close failed: {:?}", e);
        }
        Ok(pdf)
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {:?}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Browser wait failed: {:?}", e);
        }
        self.handler.abort();
        debug!("Browser closed, removing {}", self.profile.path().display());
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

async fn wait_until_settled(page: &Page) -> anyhow::Result<()> {
    let params = EvaluateParams::builder()
        .expression(SETTLE_SCRIPT)
        .await_promise(true)
        .return_by_value(true)
        .build()
        .map_err(|e| anyhow!("Invalid settle script: {}", e))?;

    page.evaluate_expression(params)
        .await
        .context("Document did not settle")?;
    Ok(())
}

/// Private Chromium profile, deleted when dropped.
fn profile_dir() -> std::io::Result<TempDir> {
    tempfile::Builder::new().prefix("pdfgen-").tempdir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfgen_core::constants::BLANK_TEMPLATE;
    use pdfgen_core::{PrintOptionsBuilder, RenderedPart};

    #[test]
    fn test_print_params_default_page() {
        let options = PrintOptionsBuilder::new(false).build().unwrap();
        let params = print_params(&options);

        assert_eq!(params.paper_width, Some(8.27));
        assert_eq!(params.paper_height, Some(11.7));
        assert_eq!(params.margin_top, Some(0.75));
        assert_eq!(params.margin_left, Some(0.75));
        assert_eq!(params.print_background, Some(true));
        assert_eq!(params.prefer_css_page_size, Some(true));
        assert_eq!(params.display_header_footer, Some(false));
        assert_eq!(params.header_template, None);
        assert_eq!(params.footer_template, None);
    }

    #[test]
    fn test_print_params_carry_both_templates() {
        let header = RenderedPart {
            markup: "<header>h</header>".into(),
            width: 596,
            height: 108,
        };
        let options = PrintOptionsBuilder::new(true).header(&header).build().unwrap();
        let params = print_params(&options);

        assert_eq!(params.display_header_footer, Some(true));
        assert_eq!(params.header_template.as_deref(), Some("<header>h</header>"));
        assert_eq!(params.footer_template.as_deref(), Some(BLANK_TEMPLATE));
        assert_eq!(params.margin_top, Some(1.5));
        assert_eq!(params.margin_left, Some(0.0));
    }

    #[test]
    fn test_profile_dirs_are_unique() {
        let first = profile_dir().unwrap();
        let second = profile_dir().unwrap();
        assert_ne!(first.path(), second.path());
        assert!(first
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("pdfgen-"));
    }

    #[test]
    fn test_profile_dir_removed_when_dropped() {
        let profile = profile_dir().unwrap();
        let path = profile.path().to_path_buf();
        std::fs::write(path.join("Local State"), b"{}").unwrap();
        assert!(path.exists());

        drop(profile);
        assert!(!path.exists());
    }
}
