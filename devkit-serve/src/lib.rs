//! Static file server for web builds.
//!
//! Emscripten builds of the dev environment and examples produce an
//! `index.html` plus `.js`/`.wasm`/`.data` files that browsers refuse to load
//! from `file://`. This crate serves such a directory over HTTP, either from
//! the standalone `devkit-serve` binary or embedded in `devkit dev` /
//! `devkit example`.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use axum::Router;
use axum::http::{HeaderName, HeaderValue, header};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const COOP: HeaderName = HeaderName::from_static("cross-origin-opener-policy");
const COEP: HeaderName = HeaderName::from_static("cross-origin-embedder-policy");

/// Where and how to serve a build directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeOptions {
    /// Directory to serve (usually a meson build dir containing `index.html`).
    pub root: PathBuf,
    /// Address to bind.
    pub bind: String,
    pub port: u16,
    /// Send COOP/COEP headers so `SharedArrayBuffer` is available to
    /// pthread-enabled wasm builds.
    pub cross_origin_isolation: bool,
}

impl ServeOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bind: "127.0.0.1".to_string(),
            port: 8000,
            cross_origin_isolation: false,
        }
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(SocketAddr::new(parse_bind(&self.bind)?, self.port))
    }

    /// URL a browser on this machine should open.
    pub fn url(&self) -> String {
        match parse_bind(&self.bind) {
            Ok(ip) if ip.is_unspecified() || ip.is_loopback() => {
                format!("http://localhost:{}/", self.port)
            }
            Ok(IpAddr::V6(ip)) => format!("http://[{ip}]:{}/", self.port),
            _ => format!("http://{}:{}/", self.bind, self.port),
        }
    }
}

/// Parse a bind address. Only IP literals are accepted (`127.0.0.1`, `::`).
pub fn parse_bind(bind: &str) -> Result<IpAddr> {
    bind.trim()
        .parse()
        .with_context(|| format!("bind address '{bind}' is not an IP address"))
}

/// Build the router serving `root`.
///
/// Directory requests resolve to their `index.html`. Every response carries
/// `Cache-Control: no-store` so a rebuilt wasm module is never served stale.
pub fn router(root: &Path, cross_origin_isolation: bool) -> Router {
    let mut app = Router::new()
        .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    if cross_origin_isolation {
        app = app
            .layer(SetResponseHeaderLayer::overriding(
                COOP,
                HeaderValue::from_static("same-origin"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                COEP,
                HeaderValue::from_static("require-corp"),
            ));
    }

    app.layer(TraceLayer::new_for_http())
}

/// Serve `options.root` until Ctrl-C.
pub async fn serve(options: &ServeOptions) -> Result<()> {
    serve_with(options, || {}).await
}

/// Like [`serve`], calling `on_bound` once the listener holds the port.
///
/// Nothing is called when the directory is missing or the bind fails.
pub async fn serve_with(options: &ServeOptions, on_bound: impl FnOnce()) -> Result<()> {
    if !options.root.is_dir() {
        bail!("serve directory {} does not exist", options.root.display());
    }
    let addr = options.addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!(addr = %addr, root = %options.root.display(), "serving");
    on_bound();
    axum::serve(
        listener,
        router(&options.root, options.cross_origin_isolation),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("serve http")?;

    info!("server stopped");
    Ok(())
}

/// Blocking wrapper around [`serve_with`] for synchronous callers.
pub fn serve_blocking(options: &ServeOptions, on_bound: impl FnOnce()) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(serve_with(options, on_bound))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(err = %err, "failed to listen for ctrl-c, serving until killed");
        std::future::pending::<()>().await;
    }
}
