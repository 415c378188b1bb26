use crate::domain::DEFAULT_MAX_STATIONS;
use crate::infrastructure::asset_cache::DEFAULT_ASSETS;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Runtime settings, read from a JSON file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Largest station count accepted on the setup screen
    pub max_stations: usize,
    /// Where cache misses are fetched from
    pub origin: String,
    /// Deployment root under the origin
    pub base_path: String,
    pub cache_dir: String,
    pub cache_prefix: String,
    /// Bump whenever the asset list or its content changes
    pub cache_version: String,
    pub assets: Vec<String>,
    pub log_file: String,
    pub export_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_stations: DEFAULT_MAX_STATIONS,
            origin: "http://localhost:8080".to_string(),
            base_path: "/".to_string(),
            cache_dir: ".tally-cache".to_string(),
            cache_prefix: "bus-counter".to_string(),
            cache_version: "v2".to_string(),
            assets: DEFAULT_ASSETS.iter().map(|a| a.to_string()).collect(),
            log_file: "tally.log".to_string(),
            export_file: "tally.csv".to_string(),
        }
    }
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "./tally.json";

    /// Loads the config at `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Error reading config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Error parsing config file {}", path.display()))
    }
}
