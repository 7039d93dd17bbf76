use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::fetcher::RetryPolicy;

const ENV_PREFIX: &str = "AGENT_SCRAPER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub full_agent_details: bool,
    #[serde(default = "default_export_formats")]
    pub export_formats: Vec<String>,
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

fn default_base_url() -> String {
    "https://www.realtor.com".into()
}

fn default_export_formats() -> Vec<String> {
    vec!["json".into(), "csv".into(), "xlsx".into()]
}

fn default_input_file() -> PathBuf {
    PathBuf::from("data/input.sample.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    0.8
}

/// Load a JSON settings file, then apply `AGENT_SCRAPER_*` environment
/// overrides. A missing or malformed file is an error.
pub fn load(path: &Path) -> Result<Settings> {
    debug!("Loading settings from {}", path.display());
    if !path.is_file() {
        bail!("Settings file not found: {}", path.display());
    }

    let settings: Settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Json))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("export_formats"),
        )
        .build()
        .with_context(|| format!("Failed to read settings from {}", path.display()))?
        .try_deserialize()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    // Catch a bad base URL up front rather than on the first listing page.
    settings.base_url()?;
    Ok(settings)
}

impl Settings {
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(self.base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid base_url: {}", self.base_url))
    }

    pub fn export_formats(&self) -> Vec<String> {
        normalize_formats(self.export_formats.iter().map(String::as_str))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            backoff_factor: self.backoff_factor,
        }
    }
}

/// Trimmed, lower-cased format identifiers, blanks dropped.
pub fn normalize_formats<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    ids.into_iter()
        .map(|id| id.trim().to_lowercase())
        .filter(|id| !id.is_empty())
        .collect()
}

/// Split a `--formats json,CSV , xml` style argument.
pub fn parse_format_list(list: &str) -> Vec<String> {
    normalize_formats(list.split(','))
}
