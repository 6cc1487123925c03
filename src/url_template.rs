//! Place URL construction. Each row identifier is substituted into a
//! fixed template, matching the URL scheme the site serves place pages
//! under.

use thiserror::Error;

#[derive(Error, Debug)]
#[error("template {0:?} does not contain an {{id}} placeholder")]
pub struct TemplateError(String);

/// A URL template with a single `{id}` placeholder.
///
/// The template is split once at parse time so per-row formatting is a
/// plain concatenation with no repeated scanning.
#[derive(Debug, Clone)]
pub struct UrlTemplate {
    prefix: String,
    suffix: String,
}

impl UrlTemplate {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        match template.split_once("{id}") {
            Some((prefix, suffix)) => Ok(Self {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
            None => Err(TemplateError(template.to_string())),
        }
    }

    /// Substitute one identifier, producing a fully-qualified place URL.
    pub fn format(&self, id: &str) -> String {
        format!("{}{}{}", self.prefix, id, self.suffix)
    }
}
