//! The pagination loop: fetch pages of place identifiers, write one
//! urlset file per page, then write the index referencing every file.

use std::fs;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::ExportConfig;
use crate::db::{PlaceSource, SourceError};
use crate::sitemap_writer::{SitemapIndexWriter, UrlsetWriter};

/// Subdirectory of the output directory holding the per-page files.
pub const SITEMAP_SUBDIR: &str = "sitemaps";

/// Filename of the index document at the output directory root.
pub const INDEX_FILENAME: &str = "sitemap.xml";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("failed to write sitemap output: {0}")]
    Io(#[from] std::io::Error),
}

/// Counts reported after a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub sitemap_files: usize,
    pub urls_written: usize,
    pub rows_skipped: usize,
}

/// Run one full export: paginate to the configured maximum offset,
/// writing `sitemaps/sitemap-<n>.xml` per page, then `sitemap.xml`
/// listing one entry per file written.
///
/// The loop is bound-driven: it always scans to `max_offset`, so pages
/// past the end of the table serialize as empty urlsets and still appear
/// in the index. A query failure aborts the run and leaves the files
/// written so far in place; the index is written last, so output from an
/// aborted run is unindexed.
#[tracing::instrument(skip_all)]
pub async fn export<S>(source: &S, config: &ExportConfig) -> Result<ExportSummary, ExportError>
where
    S: PlaceSource + ?Sized,
{
    let sitemap_dir = config.output_dir.join(SITEMAP_SUBDIR);
    fs::create_dir_all(&sitemap_dir)?;

    let mut summary = ExportSummary::default();
    let mut page = 1usize;
    let mut offset = 0u64;

    while offset < config.max_offset {
        info!(offset, page, "processing offset");
        let rows = source.fetch_page(config.page_size, offset).await?;

        let mut urls = Vec::with_capacity(rows.len());
        for row in rows {
            match row {
                Ok(id) => urls.push(config.url_template.format(&id)),
                Err(e) => {
                    warn!(page, error = %e, "skipping row");
                    summary.rows_skipped += 1;
                }
            }
        }
        info!(page, found = urls.len(), "found pages");

        let path = sitemap_dir.join(format!("sitemap-{page}.xml"));
        let mut writer = UrlsetWriter::create(&path)?;
        for url in &urls {
            writer.add_url(url, &config.lastmod)?;
        }
        summary.urls_written += writer.finish()?;
        summary.sitemap_files += 1;

        page += 1;
        offset += config.page_size;
    }

    // Index last, one entry per file written above. Nothing ties the
    // files together transactionally; a crash before this point leaves
    // page files on disk with no index.
    let mut index = SitemapIndexWriter::create(config.output_dir.join(INDEX_FILENAME))?;
    for n in 1..page {
        index.add_sitemap(
            &format!("{}/{}/sitemap-{}.xml", config.site_root, SITEMAP_SUBDIR, n),
            &config.lastmod,
        )?;
    }
    let indexed = index.finish()?;
    info!(
        files = summary.sitemap_files,
        indexed, "wrote sitemap index"
    );

    Ok(summary)
}
