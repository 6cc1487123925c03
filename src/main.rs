use thiserror::Error;
use tracing::info;

use place_sitemap::cli::Cli;
use place_sitemap::config::{ConfigError, DbConfig, ExportConfig};
use place_sitemap::db::{PgPlaceSource, SourceError};
use place_sitemap::exporter::{self, ExportError};
use place_sitemap::logging;

#[derive(Error, Debug)]
enum MainError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Source(#[from] SourceError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let cli = Cli::parse_args();
    let _log_guard = logging::init_logging("logs")?;

    let config = ExportConfig::new(
        cli.page_size,
        cli.max_offset,
        &cli.url_template,
        &cli.site_root,
        &cli.output_dir,
        cli.lastmod,
        &cli.table,
        &cli.id_column,
        &cli.rank_column,
    )?;
    let db = DbConfig::from_env()?;

    info!(
        page_size = config.page_size,
        max_offset = config.max_offset,
        output_dir = %config.output_dir.display(),
        lastmod = %config.lastmod,
        "starting sitemap export"
    );

    let source = PgPlaceSource::connect(&db, &config).await?;

    // Run to completion or first fatal error; either way the pool is
    // released before the process reports the outcome.
    let result = exporter::export(&source, &config).await;
    source.close().await;
    let summary = result?;

    info!(
        files = summary.sitemap_files,
        urls = summary.urls_written,
        skipped = summary.rows_skipped,
        "export complete"
    );

    Ok(())
}
