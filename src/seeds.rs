use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Accepted seed file shapes: a bare list or `{"urls": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeedFile {
    List(Vec<String>),
    Wrapped { urls: Vec<String> },
}

pub fn load_seed_urls(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Input file not found: {}", path.display()))?;
    parse_seed_urls(&text).with_context(|| format!("Invalid input file {}", path.display()))
}

/// Seed locations in file order, trimmed, blanks dropped.
pub fn parse_seed_urls(text: &str) -> Result<Vec<String>> {
    let file: SeedFile = serde_json::from_str(text)
        .context("expected a JSON list of URLs or an object with a \"urls\" list")?;
    let urls = match file {
        SeedFile::List(urls) | SeedFile::Wrapped { urls } => urls,
    };
    Ok(urls
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect())
}
