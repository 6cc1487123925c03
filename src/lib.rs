pub mod cli;
pub mod config;
pub mod db;
pub mod exporter;
pub mod logging;
pub mod sitemap_writer;
pub mod url_template;

// Re-export main types for library usage
pub use config::{ConfigError, DbConfig, Defaults, ExportConfig};
pub use db::{PgPlaceSource, PlaceSource, RowError, RowResult, SourceError};
pub use exporter::{export, ExportError, ExportSummary};
pub use sitemap_writer::{SitemapIndexWriter, UrlsetWriter};
pub use url_template::UrlTemplate;
