//! pcjc-web - Award Browsing Service
//!
//! Serves the award store read-only over HTTP: filtered listings, award
//! detail with the corrections trail, per-year counts, and the photo
//! library as static files.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pcjc_common::config::{resolve_root_folder, Paths};
use pcjc_common::db;
use pcjc_web::AppState;

#[derive(Parser)]
#[command(name = "pcjc-web", about = "Award browsing HTTP service")]
struct Cli {
    /// Root data folder (overrides PCJC_ROOT and the config file)
    #[arg(long)]
    root: Option<String>,

    /// Listen port
    #[arg(long, default_value_t = 5730)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    info!("Starting pcjc-web (award browsing service)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let paths = Paths::new(resolve_root_folder(cli.root.as_deref()));
    paths.ensure_base_directories()?;
    info!("Root folder: {}", paths.root().display());

    let db_path = paths.database();
    info!("Database: {}", db_path.display());
    let pool = db::init_database(&db_path).await?;
    info!("Database connection established");

    let state = AppState::new(pool, paths.images_dir());
    let app = pcjc_web::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", cli.port)).await?;
    info!("Listening on http://127.0.0.1:{}", cli.port);
    info!("Health check: http://127.0.0.1:{}/health", cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
