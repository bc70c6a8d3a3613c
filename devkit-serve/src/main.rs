//! devkit-serve - serve a web build directory over HTTP.

use std::path::PathBuf;

use clap::Parser;
use devkit_serve::{ServeOptions, serve};

#[derive(Parser)]
#[command(name = "devkit-serve")]
#[command(about = "Serve a web build directory over HTTP")]
struct Args {
    /// Directory to serve
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Send cross-origin isolation headers (needed for pthread wasm builds)
    #[arg(long)]
    isolate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("devkit_serve=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let options = ServeOptions {
        root: args.dir.canonicalize().unwrap_or(args.dir),
        bind: args.bind,
        port: args.port,
        cross_origin_isolation: args.isolate,
    };
    println!("serve: {} at {}", options.root.display(), options.url());
    serve(&options).await
}
