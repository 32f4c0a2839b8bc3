use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::alias;
use crate::error::EngineError;
use crate::matcher::DEFAULT_THRESHOLD;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Immutable matching vocabulary injected into the normalizer.
///
/// `Default` carries the hand-curated domain tables; tests and configs can
/// substitute or extend them without touching any global state.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Whole-word abbreviation → expansion (multi-word, space separated).
    pub abbreviations: BTreeMap<String, String>,
    /// Generic facility/administrative vocabulary removed from key tokens.
    pub stopwords: BTreeSet<String>,
}

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("sdh", "sub divisional hospital"),
    ("chc", "community health centre"),
    ("phc", "primary health centre"),
    ("rh", "rural hospital"),
    ("shc", "sub health centre"),
    ("dh", "district hospital"),
    ("uphc", "urban primary health centre"),
    ("mphc", "mini primary health centre"),
];

const STOPWORDS: &[&str] = &[
    "ooat", "clinic", "centre", "center", "hospital", "govt", "government",
    "and", "the", "for", "health", "community", "district", "primary", "sub",
    "urban", "rural", "divisional", "mini", "medical", "college",
    "rehabilitation", "addiction", "drug", "deaddiction", "care", "jail",
    "central", "new", "old", "general", "civil",
];

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            abbreviations: ABBREVIATIONS
                .iter()
                .map(|(a, e)| (a.to_string(), e.to_string()))
                .collect(),
            stopwords: STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Vocabulary {
    /// Layer config-level additions over the built-in tables.
    pub fn extend(&mut self, overrides: &VocabularyOverrides) {
        for (abbr, expansion) in &overrides.abbreviations {
            self.abbreviations
                .insert(abbr.trim().to_lowercase(), expansion.clone());
        }
        for word in &overrides.stopwords {
            self.stopwords.insert(word.trim().to_lowercase());
        }
    }
}

/// Additions to the built-in vocabulary, as they appear in the TOML config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabularyOverrides {
    #[serde(default)]
    pub abbreviations: BTreeMap<String, String>,
    #[serde(default)]
    pub stopwords: Vec<String>,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Header names for the postings CSV. Defaults match the compiled roster
/// sheet's layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub district: String,
    pub name: String,
    pub role: String,
    pub place_of_posting: String,
    pub facility_type: String,
    pub contact: String,
    pub gender: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            district: "district".into(),
            name: "name".into(),
            role: "designation".into(),
            place_of_posting: "place_of_posting".into(),
            facility_type: "facility_type".into(),
            contact: "contact".into(),
            gender: "gender".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MatchConfig {
    pub name: String,
    /// Facility directory JSON, relative to the config file.
    pub facilities: String,
    /// Postings roster CSV, relative to the config file.
    pub postings: String,
    /// Default output path for the enriched JSON.
    #[serde(default)]
    pub output: Option<String>,
    /// Minimum acceptable similarity score. Calibrated constant, not derived
    /// from data.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub vocabulary: VocabularyOverrides,
    /// Extra district aliases layered over the built-in override table.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(EngineError::ConfigValidation(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.facilities.trim().is_empty() {
            return Err(EngineError::ConfigValidation(
                "facilities path must not be empty".into(),
            ));
        }
        if self.postings.trim().is_empty() {
            return Err(EngineError::ConfigValidation(
                "postings path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Built-in vocabulary plus this config's additions.
    pub fn vocabulary(&self) -> Vocabulary {
        let mut vocab = Vocabulary::default();
        vocab.extend(&self.vocabulary);
        vocab
    }

    /// Built-in district alias overrides plus this config's additions.
    pub fn alias_overrides(&self) -> BTreeMap<String, String> {
        let mut overrides = alias::default_overrides();
        for (raw, canonical) in &self.aliases {
            overrides.insert(raw.trim().to_lowercase(), canonical.clone());
        }
        overrides
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "Punjab OOAT enrichment"
facilities = "data/facilities.json"
postings = "data/postings.csv"
"#;

    #[test]
    fn parse_minimal_with_defaults() {
        let config = MatchConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "Punjab OOAT enrichment");
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.columns.role, "designation");
        assert_eq!(config.columns.place_of_posting, "place_of_posting");
        assert!(config.output.is_none());
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn parse_overrides() {
        let input = r#"
name = "Tuned"
facilities = "f.json"
postings = "p.csv"
output = "out.json"
threshold = 0.25

[columns]
role = "post"
place_of_posting = "location"

[vocabulary]
stopwords = ["wellness"]

[vocabulary.abbreviations]
gh = "general hospital"

[aliases]
"mohali" = "SAS nagar Mohali"
"#;
        let config = MatchConfig::from_toml(input).unwrap();
        assert_eq!(config.threshold, 0.25);
        assert_eq!(config.columns.role, "post");
        // unspecified columns keep their defaults
        assert_eq!(config.columns.district, "district");

        let vocab = config.vocabulary();
        assert_eq!(
            vocab.abbreviations.get("gh").map(String::as_str),
            Some("general hospital")
        );
        // built-ins survive extension
        assert!(vocab.abbreviations.contains_key("chc"));
        assert!(vocab.stopwords.contains("wellness"));
        assert!(vocab.stopwords.contains("hospital"));

        let aliases = config.alias_overrides();
        assert_eq!(
            aliases.get("mohali").map(String::as_str),
            Some("SAS nagar Mohali")
        );
        // built-in override table survives extension
        assert_eq!(
            aliases.get("roopnagar").map(String::as_str),
            Some("Rupnagar")
        );
    }

    #[test]
    fn reject_threshold_out_of_range() {
        for bad in ["threshold = 0.0", "threshold = 1.5", "threshold = -0.1"] {
            let input = format!("{MINIMAL}\n{bad}\n");
            let err = MatchConfig::from_toml(&input).unwrap_err();
            assert!(err.to_string().contains("threshold"), "{err}");
        }
    }

    #[test]
    fn reject_empty_input_paths() {
        let input = r#"
name = "Bad"
facilities = ""
postings = "p.csv"
"#;
        let err = MatchConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("facilities"));
    }
}
