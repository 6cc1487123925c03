use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Namespace shared by sitemap and sitemap-index documents.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Streams a sitemaps.org `urlset` document to disk.
///
/// Entries are written as they arrive; `finish` closes the root element
/// and flushes, returning the number of URLs written. Dropping the
/// writer without calling `finish` leaves a truncated document.
pub struct UrlsetWriter {
    writer: BufWriter<File>,
    url_count: usize,
}

impl UrlsetWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(writer, r#"<urlset xmlns="{}">"#, SITEMAP_NS)?;

        Ok(Self { writer, url_count: 0 })
    }

    pub fn add_url(&mut self, loc: &str, lastmod: &str) -> std::io::Result<()> {
        writeln!(self.writer, "  <url>")?;
        writeln!(self.writer, "    <loc>{}</loc>", escape_xml(loc))?;
        writeln!(self.writer, "    <lastmod>{}</lastmod>", escape_xml(lastmod))?;
        writeln!(self.writer, "  </url>")?;
        self.url_count += 1;
        Ok(())
    }

    pub fn finish(mut self) -> std::io::Result<usize> {
        writeln!(self.writer, "</urlset>")?;
        self.writer.flush()?;
        Ok(self.url_count)
    }
}

/// Streams a sitemaps.org `sitemapindex` document to disk, one
/// `<sitemap>` entry per generated page file.
pub struct SitemapIndexWriter {
    writer: BufWriter<File>,
    sitemap_count: usize,
}

impl SitemapIndexWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(writer, r#"<sitemapindex xmlns="{}">"#, SITEMAP_NS)?;

        Ok(Self {
            writer,
            sitemap_count: 0,
        })
    }

    pub fn add_sitemap(&mut self, loc: &str, lastmod: &str) -> std::io::Result<()> {
        writeln!(self.writer, "  <sitemap>")?;
        writeln!(self.writer, "    <loc>{}</loc>", escape_xml(loc))?;
        writeln!(self.writer, "    <lastmod>{}</lastmod>", escape_xml(lastmod))?;
        writeln!(self.writer, "  </sitemap>")?;
        self.sitemap_count += 1;
        Ok(())
    }

    pub fn finish(mut self) -> std::io::Result<usize> {
        writeln!(self.writer, "</sitemapindex>")?;
        self.writer.flush()?;
        Ok(self.sitemap_count)
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_urlset_writer() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path();

        let mut writer = UrlsetWriter::create(path).unwrap();
        writer
            .add_url("https://example.com/places/1", "2025-09-10")
            .unwrap();
        writer
            .add_url("https://example.com/places/2", "2025-09-10")
            .unwrap();
        let count = writer.finish().unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(content.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(content.contains("<loc>https://example.com/places/1</loc>"));
        assert!(content.contains("<lastmod>2025-09-10</lastmod>"));
        assert!(content.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_empty_urlset_is_still_valid() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path();

        let writer = UrlsetWriter::create(path).unwrap();
        let count = writer.finish().unwrap();
        assert_eq!(count, 0);

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("<urlset"));
        assert!(content.contains("</urlset>"));
        assert!(!content.contains("<url>"));
    }

    #[test]
    fn test_index_writer() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path();

        let mut writer = SitemapIndexWriter::create(path).unwrap();
        writer
            .add_sitemap("https://example.com/sitemaps/sitemap-1.xml", "2025-09-10")
            .unwrap();
        let count = writer.finish().unwrap();
        assert_eq!(count, 1);

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content
            .contains(r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(content.contains("<loc>https://example.com/sitemaps/sitemap-1.xml</loc>"));
        assert!(content.trim_end().ends_with("</sitemapindex>"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path();

        let mut writer = UrlsetWriter::create(path).unwrap();
        writer
            .add_url("https://example.com/places?a=1&b=<2>", "2025-09-10")
            .unwrap();
        writer.finish().unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("<loc>https://example.com/places?a=1&amp;b=&lt;2&gt;</loc>"));
    }
}
