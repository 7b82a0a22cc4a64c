use crate::error::{DorkError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search?q=";
pub const RELAY_URL: &str = "https://websniffer.cc/";

/// everything a dorking run can be tuned with
///
/// read from a toml file when `--config` is given, cli flags win over it
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search_url: String,
    pub relay_url: String,
    pub templates: PathBuf,
    pub proxies: Option<PathBuf>,
    pub timeout_secs: u64,
    pub delay_min_secs: u64,
    pub delay_max_secs: u64,
    pub delay_offset_ms: u64,
    pub output_dir: PathBuf,
    pub progress_every: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_url: GOOGLE_SEARCH_URL.to_string(),
            relay_url: RELAY_URL.to_string(),
            templates: PathBuf::from("wordlists/dorks.txt"),
            proxies: None,
            timeout_secs: 60,
            delay_min_secs: 1,
            delay_max_secs: 3,
            delay_offset_ms: 500,
            output_dir: PathBuf::from("."),
            progress_every: 10,
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DorkError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(DorkError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.delay_min_secs > self.delay_max_secs {
            return Err(DorkError::Configuration(format!(
                "delay_min_secs ({}) is larger than delay_max_secs ({})",
                self.delay_min_secs, self.delay_max_secs
            )));
        }
        if self.search_url.is_empty() || self.relay_url.is_empty() {
            return Err(DorkError::Configuration(
                "search_url and relay_url can not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// a settings value that never sleeps, handy for tests
    pub fn without_delay(mut self) -> Self {
        self.delay_min_secs = 0;
        self.delay_max_secs = 0;
        self.delay_offset_ms = 0;
        self
    }
}
