//! Runtime configuration
//!
//! Values come from command-line flags, falling back to environment variables
//! (a `.env` file is loaded first) and then to defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Default system Chromium used in production deployments.
pub const PRODUCTION_CHROME_PATH: &str = "/usr/bin/chromium-browser";

#[derive(Parser, Debug, Clone)]
#[command(name = "pdfgen-server")]
#[command(about = "HTML to PDF service with image headers, footers and watermarks")]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Base URL prefixed to relative asset and document sources
    #[arg(long, env = "APP_URL", default_value = "")]
    pub app_url: String,

    /// Deployment environment; `production` runs the system browser unsandboxed
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// Explicit browser executable
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Directory containing the pdfium shared library
    #[arg(long, env = "PDFIUM_LIBRARY_PATH")]
    pub pdfium_path: Option<PathBuf>,

    /// Upper bound on a whole generate request, in milliseconds
    #[arg(long, env = "RENDER_TIMEOUT_MS", default_value = "60000")]
    pub render_timeout_ms: u64,

    /// Maximum JSON request body, in megabytes
    #[arg(long, env = "BODY_LIMIT_MB", default_value = "50")]
    pub body_limit_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// How the per-request browser is launched.
    pub fn browser_launch(&self) -> BrowserLaunch {
        let production = self.is_production();
        let executable = self
            .chrome_path
            .clone()
            .or_else(|| production.then(|| PathBuf::from(PRODUCTION_CHROME_PATH)));

        BrowserLaunch {
            executable,
            no_sandbox: production,
        }
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb * 1024 * 1024
    }
}

/// Browser launch settings derived from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserLaunch {
    pub executable: Option<PathBuf>,
    pub no_sandbox: bool,
}
