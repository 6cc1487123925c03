use clap::Parser;

use crate::config::Defaults;

/// CLI entry point for the one-shot export. Every flag defaults to the
/// production value, so a plain invocation reproduces the standard run.
#[derive(Parser, Debug)]
#[command(name = "place-sitemap")]
#[command(about = "Export place pages from Postgres into sitemaps.org sitemap files")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = Defaults::PAGE_SIZE,
        help = "Rows per sitemap file (sitemaps.org caps a urlset at 50,000 URLs)"
    )]
    pub page_size: u64,

    #[arg(
        long,
        default_value_t = Defaults::MAX_OFFSET,
        help = "Maximum row offset to scan; the loop always runs to this bound"
    )]
    pub max_offset: u64,

    #[arg(
        long,
        default_value = Defaults::PLACE_URL_TEMPLATE,
        help = "Place URL template; {id} is replaced with the row identifier"
    )]
    pub url_template: String,

    #[arg(
        long,
        default_value = Defaults::SITE_ROOT,
        help = "Absolute URL prefix the generated files are served under"
    )]
    pub site_root: String,

    #[arg(
        short,
        long,
        default_value = Defaults::OUTPUT_DIR,
        help = "Directory receiving sitemap.xml and the sitemaps/ subdirectory"
    )]
    pub output_dir: String,

    #[arg(
        long,
        help = "lastmod date stamped on every entry (YYYY-MM-DD, defaults to today)"
    )]
    pub lastmod: Option<String>,

    #[arg(long, default_value = Defaults::TABLE, help = "Source table")]
    pub table: String,

    #[arg(long, default_value = Defaults::ID_COLUMN, help = "Identifier column")]
    pub id_column: String,

    #[arg(
        long,
        default_value = Defaults::RANK_COLUMN,
        help = "Ranking column; rows are exported in descending order of it"
    )]
    pub rank_column: String,
}

impl Cli {
    /// Parse CLI arguments so the rest of the program can rely on
    /// structured options. On error, clap prints help and exits.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
