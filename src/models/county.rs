//! County identifiers with canonical-key normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical key for one of Indiana's 92 counties.
///
/// Keys are uppercase with spaces replaced by underscores (`"ST_JOSEPH"`),
/// matching the join key used by the EPSG registry CSV. Construction
/// normalizes common display spellings, so `"La Porte"`, `"la porte"` and
/// `"LA_PORTE"` all produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct County(String);

impl County {
    /// Normalize a display or user-supplied name into the canonical key.
    ///
    /// Periods are dropped and `"Saint"` collapses to `"ST"`, so
    /// `"St Joseph"`, `"St. Joseph"` and `"Saint Joseph"` all map to
    /// `"ST_JOSEPH"`.
    pub fn new(name: &str) -> Self {
        let key = name
            .trim()
            .to_uppercase()
            .replace('.', "")
            .replace(' ', "_");

        let key = match key.strip_prefix("SAINT_") {
            Some(rest) => format!("ST_{}", rest),
            None => key,
        };

        County(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-facing form: `"ST_JOSEPH"` becomes `"St Joseph"`.
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for County {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for County {
    fn from(name: &str) -> Self {
        County::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_spaces() {
        assert_eq!(County::new("Marion").as_str(), "MARION");
        assert_eq!(County::new("la porte").as_str(), "LA_PORTE");
        assert_eq!(County::new("LA_PORTE").as_str(), "LA_PORTE");
    }

    #[test]
    fn normalizes_saint_joseph_spellings() {
        for spelling in ["St Joseph", "St. Joseph", "Saint Joseph", "ST_JOSEPH"] {
            assert_eq!(County::new(spelling).as_str(), "ST_JOSEPH", "{}", spelling);
        }
    }

    #[test]
    fn display_name_round_trips() {
        assert_eq!(County::new("ST_JOSEPH").display_name(), "St Joseph");
        assert_eq!(County::new("MARION").display_name(), "Marion");
        assert_eq!(County::new("La Porte").display_name(), "La Porte");
    }
}
