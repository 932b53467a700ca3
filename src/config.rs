//! Runtime configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::locate::DEFAULT_BOUNDARY_URL;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Path to the editable county → EPSG registry CSV.
    pub registry_path: PathBuf,
    /// GeoJSON source for county boundary polygons.
    pub boundary_url: String,
    /// Timeout for the boundary download, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from("data/indiana_county_epsg.csv"),
            boundary_url: DEFAULT_BOUNDARY_URL.to_string(),
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Explicitly given config files must exist; without one, defaults
    /// apply.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
