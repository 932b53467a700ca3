//! County → EPSG reference-system registry.
//!
//! Backed by an editable CSV (`County, EPSG_Code, Verified, Notes`) so
//! codes can be verified against epsg.io and corrected without a code
//! change. `load` re-reads the file on every call; nothing is cached and
//! the file is never written by this component.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::info;

use crate::models::County;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to open registry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry file: {0}")]
    Csv(#[from] csv::Error),

    #[error("registry is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("invalid EPSG code '{value}' for county {county}")]
    InvalidCode { county: County, value: String },

    #[error("duplicate registry entry for county {0}")]
    DuplicateCounty(County),
}

/// One row of the registry CSV.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistryEntry {
    pub county: County,
    pub epsg_code: u32,
    /// Human verification flag. Unverified entries are still used for
    /// transforms; the flag only feeds the verification summary.
    pub verified: bool,
    pub notes: String,
}

/// In-memory snapshot of the registry CSV.
pub struct CrsRegistry {
    entries: HashMap<County, RegistryEntry>,
}

impl CrsRegistry {
    /// Read the registry CSV. Always hits the filesystem, so callers
    /// that want to pick up manual edits simply call this again.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let county_idx = column(&headers, "County")?;
        let code_idx = column(&headers, "EPSG_Code")?;
        let verified_idx = column(&headers, "Verified")?;
        // Notes is informational and may be absent
        let notes_idx = headers.iter().position(|h| h == "Notes");

        let mut entries = HashMap::new();
        for result in reader.records() {
            let record = result?;
            let county = County::new(&record[county_idx]);

            let raw_code = &record[code_idx];
            let epsg_code: u32 = raw_code.parse().map_err(|_| RegistryError::InvalidCode {
                county: county.clone(),
                value: raw_code.to_string(),
            })?;
            if epsg_code == 0 {
                return Err(RegistryError::InvalidCode {
                    county,
                    value: raw_code.to_string(),
                });
            }

            let verified = record[verified_idx].eq_ignore_ascii_case("yes");
            let notes = notes_idx
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .to_string();

            let entry = RegistryEntry {
                county: county.clone(),
                epsg_code,
                verified,
                notes,
            };
            if entries.insert(county.clone(), entry).is_some() {
                return Err(RegistryError::DuplicateCounty(county));
            }
        }

        let registry = Self { entries };
        let (verified, total) = registry.verification_summary();
        info!(
            "Loaded {} registry entries from {} ({} verified)",
            total,
            path.display(),
            verified
        );
        Ok(registry)
    }

    pub fn lookup(&self, county: &County) -> Option<&RegistryEntry> {
        self.entries.get(county)
    }

    /// `(verified, total)` entry counts.
    pub fn verification_summary(&self) -> (usize, usize) {
        let verified = self.entries.values().filter(|e| e.verified).count();
        (verified, self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }
}

fn column(headers: &csv::StringRecord, name: &'static str) -> Result<usize, RegistryError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(RegistryError::MissingColumn(name))
}
