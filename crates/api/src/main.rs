//! Performance Quality Server - Main Entry Point

use anyhow::Result;
use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;
    init_logging(&settings.logging)?;

    info!("=== Performance Quality Server v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Model {} (schema {})",
        settings.model.dir.display(),
        settings.model.schema_version
    );

    run_server(settings).await
}
