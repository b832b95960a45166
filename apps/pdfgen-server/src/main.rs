//! PDF Generation Server
//!
//! Converts an HTML body into an A4 PDF, optionally framed by image header and
//! footer bands, overlaid with a watermark, and interleaved with the pages of
//! an existing PDF (the "original CV").
//!
//! ## Architecture
//!
//! Layout decisions live in `pdfgen-core`. This binary supplies the
//! collaborators it needs:
//!
//! - `HttpFetcher`: assets and documents over HTTP(S)
//! - `PdfiumRasterizer`: PDF pages to PNG
//! - `ChromiumRenderer`: HTML to PDF, one browser per request

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use clap::Parser;
use pdfgen_core::{AssetFetcher, Pipeline, SourceLocator};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod browser;
mod config;
mod error;
mod fetch;
mod rasterizer;
mod state;

use api::{handle_generate_pdf, handle_health};
use browser::ChromiumRenderer;
use config::Args;
use fetch::HttpFetcher;
use rasterizer::PdfiumRasterizer;
use state::AppState;

/// Build the router with all middleware.
pub fn router(state: AppState, body_limit: usize) -> Router {
    // Reflect the caller's origin so credentialed requests are accepted.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(handle_health))
        .route("/generate-pdf", post(handle_generate_pdf))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting pdfgen server on {}:{} ({})",
        args.host, args.port, args.environment
    );

    let fetcher: Arc<dyn AssetFetcher> = Arc::new(HttpFetcher::new(args.render_timeout())?);
    let rasterizer = Arc::new(PdfiumRasterizer::new(
        Arc::clone(&fetcher),
        args.pdfium_path.clone(),
    ));
    let renderer = Arc::new(ChromiumRenderer::new(
        args.browser_launch(),
        args.render_timeout(),
    ));

    let pipeline = Pipeline::new(
        fetcher,
        rasterizer,
        renderer,
        SourceLocator::new(args.app_url.clone()),
    );
    info!("Asset base URL: {:?}", pipeline.locator().base_url());
    let state = AppState::new(pipeline, args.render_timeout());

    let app = router(state, args.body_limit_bytes());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Render timeout: {}ms", args.render_timeout_ms);

    axum::serve(listener, app).await?;

    Ok(())
}
