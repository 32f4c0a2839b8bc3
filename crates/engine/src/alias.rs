use std::collections::BTreeMap;

/// Hand-curated district aliases: roster spelling → directory spelling.
/// Covers known administrative renames and spelling divergences between the
/// two sources.
pub fn default_overrides() -> BTreeMap<String, String> {
    let table: &[(&str, &str)] = &[
        ("s.a.s nagar", "SAS nagar Mohali"),
        ("sbs nagar", "Shaheed Bhagat Singh Nagar"),
        ("roopnagar", "Rupnagar"),
        ("firozepur", "Ferozpur"),
        ("sri muktsar sahib", "Muktsar"),
        // Malerkotla was carved out of Sangrur; the directory still files its
        // facilities under Sangrur.
        ("malerkotla", "Sangrur"),
        ("pathankot", "Pathankot"),
        ("gurdaspur", "Gurdaspur"),
        ("fatehgarh sahib", "Fatehgarh Sahib"),
        ("jalandhar", "Jalandhar"),
        ("kapurthala", "Kapurthala"),
        ("faridkot", "Faridkot"),
        ("fazilka", "Fazilka"),
    ];
    table
        .iter()
        .map(|(raw, canonical)| (raw.to_string(), canonical.to_string()))
        .collect()
}

/// Maps raw district labels from the roster to the canonical district keys
/// used by the facility directory.
pub struct AliasResolver {
    /// lowercase-trimmed label → canonical district key.
    aliases: BTreeMap<String, String>,
}

impl AliasResolver {
    /// Build from the canonical district keys (each maps to itself, so a
    /// valid district can never become unreachable) plus the override table.
    /// Overrides win on collision.
    pub fn new<'a>(
        canonical_districts: impl IntoIterator<Item = &'a str>,
        overrides: &BTreeMap<String, String>,
    ) -> Self {
        let mut aliases = BTreeMap::new();
        for district in canonical_districts {
            let district = district.trim();
            aliases.insert(district.to_lowercase(), district.to_string());
        }
        for (raw, canonical) in overrides {
            aliases.insert(raw.trim().to_lowercase(), canonical.clone());
        }
        Self { aliases }
    }

    /// Case/space-insensitive lookup. An unknown label comes back trimmed but
    /// otherwise unchanged; it will simply miss the candidate index and the
    /// selector widens to the full facility set. Never errors.
    pub fn resolve(&self, raw_district: &str) -> String {
        let key = raw_district.trim().to_lowercase();
        match self.aliases.get(&key) {
            Some(canonical) => canonical.clone(),
            None => raw_district.trim().to_string(),
        }
    }
}
