//! Configuration for the export run: database settings from the
//! environment, export knobs from CLI arguments with production defaults.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::url_template::UrlTemplate;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Default export knobs - single source of truth
pub struct Defaults;

impl Defaults {
    // Pagination
    pub const PAGE_SIZE: u64 = 50_000;
    pub const MAX_OFFSET: u64 = 1_500_000;

    // URL layout
    pub const PLACE_URL_TEMPLATE: &'static str = "https://www.niromap.com/places/{id}";
    pub const SITE_ROOT: &'static str = "https://www.niromap.com";

    // Output
    pub const OUTPUT_DIR: &'static str = "static";

    // Source table
    pub const TABLE: &'static str = "public.places";
    pub const ID_COLUMN: &'static str = "ogc_fid";
    pub const RANK_COLUMN: &'static str = "confidence";
}

/// Database connection settings, read once at startup.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    /// Read `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER` and `DB_PASS` from
    /// the environment. Any missing or unparsable value is fatal before
    /// the database or filesystem is touched.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_raw = require_env("DB_PORT")?;
        let port = port_raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
            name: "DB_PORT",
            value: port_raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            host: require_env("DB_HOST")?,
            port,
            name: require_env("DB_NAME")?,
            user: require_env("DB_USER")?,
            password: require_env("DB_PASS")?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}

/// Validated settings for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub page_size: u64,
    pub max_offset: u64,
    pub url_template: UrlTemplate,
    /// Absolute URL prefix under which the output directory is served.
    /// Used to build the `loc` entries of the sitemap index.
    pub site_root: String,
    pub output_dir: PathBuf,
    /// `YYYY-MM-DD` date stamped on every sitemap and index entry.
    pub lastmod: String,
    pub table: String,
    pub id_column: String,
    pub rank_column: String,
}

impl ExportConfig {
    /// Validate loose CLI values into a config the exporter can trust.
    /// A `lastmod` of `None` stamps today's UTC date.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        page_size: u64,
        max_offset: u64,
        url_template: &str,
        site_root: &str,
        output_dir: &str,
        lastmod: Option<String>,
        table: &str,
        id_column: &str,
        rank_column: &str,
    ) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "page-size",
                value: page_size.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let url_template =
            UrlTemplate::parse(url_template).map_err(|e| ConfigError::Invalid {
                name: "url-template",
                value: url_template.to_string(),
                reason: e.to_string(),
            })?;

        let lastmod = match lastmod {
            Some(value) => {
                NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|e| {
                    ConfigError::Invalid {
                        name: "lastmod",
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;
                value
            }
            None => chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        };

        validate_sql_identifier("table", table)?;
        validate_sql_identifier("id-column", id_column)?;
        validate_sql_identifier("rank-column", rank_column)?;

        Ok(Self {
            page_size,
            max_offset,
            url_template,
            site_root: site_root.trim_end_matches('/').to_string(),
            output_dir: PathBuf::from(output_dir),
            lastmod,
            table: table.to_string(),
            id_column: id_column.to_string(),
            rank_column: rank_column.to_string(),
        })
    }
}

/// Table and column names are interpolated into the query text (they
/// cannot be bound parameters), so they are restricted to a charset that
/// keeps the statement well-formed.
fn validate_sql_identifier(name: &'static str, value: &str) -> Result<(), ConfigError> {
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "only ASCII alphanumerics, '_' and '.' are allowed".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_lastmod(lastmod: Option<String>) -> Result<ExportConfig, ConfigError> {
        ExportConfig::new(
            Defaults::PAGE_SIZE,
            Defaults::MAX_OFFSET,
            Defaults::PLACE_URL_TEMPLATE,
            Defaults::SITE_ROOT,
            Defaults::OUTPUT_DIR,
            lastmod,
            Defaults::TABLE,
            Defaults::ID_COLUMN,
            Defaults::RANK_COLUMN,
        )
    }

    #[test]
    fn test_defaults_validate() {
        let config = config_with_lastmod(Some("2025-09-10".to_string())).unwrap();
        assert_eq!(config.page_size, 50_000);
        assert_eq!(config.max_offset, 1_500_000);
        assert_eq!(config.lastmod, "2025-09-10");
        assert_eq!(config.site_root, "https://www.niromap.com");
    }

    #[test]
    fn test_lastmod_defaults_to_today() {
        let config = config_with_lastmod(None).unwrap();
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(config.lastmod, today);
    }

    #[test]
    fn test_rejects_bad_lastmod() {
        let err = config_with_lastmod(Some("September 10".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "lastmod", .. }));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = ExportConfig::new(
            0,
            100,
            Defaults::PLACE_URL_TEMPLATE,
            Defaults::SITE_ROOT,
            Defaults::OUTPUT_DIR,
            None,
            Defaults::TABLE,
            Defaults::ID_COLUMN,
            Defaults::RANK_COLUMN,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "page-size", .. }));
    }

    #[test]
    fn test_rejects_template_without_placeholder() {
        let err = ExportConfig::new(
            10,
            100,
            "https://example.com/places/",
            Defaults::SITE_ROOT,
            Defaults::OUTPUT_DIR,
            None,
            Defaults::TABLE,
            Defaults::ID_COLUMN,
            Defaults::RANK_COLUMN,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "url-template", .. }));
    }

    #[test]
    fn test_rejects_injection_in_table_name() {
        let err = ExportConfig::new(
            10,
            100,
            Defaults::PLACE_URL_TEMPLATE,
            Defaults::SITE_ROOT,
            Defaults::OUTPUT_DIR,
            None,
            "places; DROP TABLE places",
            Defaults::ID_COLUMN,
            Defaults::RANK_COLUMN,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "table", .. }));
    }

    #[test]
    fn test_site_root_trailing_slash_trimmed() {
        let config = ExportConfig::new(
            10,
            100,
            Defaults::PLACE_URL_TEMPLATE,
            "https://www.niromap.com/",
            Defaults::OUTPUT_DIR,
            None,
            Defaults::TABLE,
            Defaults::ID_COLUMN,
            Defaults::RANK_COLUMN,
        )
        .unwrap();
        assert_eq!(config.site_root, "https://www.niromap.com");
    }
}
