use crate::error::Result;
use crate::file_util::read_lines;
use std::path::Path;

/// a raw dork, eg `intitle:"index of"`, kept exactly as loaded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DorkTemplate(String);

impl DorkTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// loads newline separated dorks, order preserved
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<DorkTemplate>> {
    let lines = read_lines(path)?;
    Ok(lines.into_iter().map(DorkTemplate::new).collect())
}

/// same as [`load`] but a missing file only costs us the dorking phase
pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Vec<DorkTemplate> {
    match load(path.as_ref()) {
        Ok(templates) => {
            tracing::debug!(count = templates.len(), path = %path.as_ref().display(), "loaded dork templates");
            templates
        }
        Err(e) => {
            err!(format!("{e}, skipping google dorking"));
            Vec::new()
        }
    }
}
