use std::collections::{BTreeMap, BTreeSet};

use crate::model::Facility;
use crate::normalize::Normalizer;

/// Facilities grouped by lowercase-trimmed district, with each facility's
/// key-token set computed once up front. Candidates are indices into the
/// facility collection the index was built from.
pub struct CandidateIndex {
    by_district: BTreeMap<String, Vec<usize>>,
    key_tokens: Vec<BTreeSet<String>>,
}

impl CandidateIndex {
    pub fn build(facilities: &[Facility], normalizer: &Normalizer) -> Self {
        let mut by_district: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut key_tokens = Vec::with_capacity(facilities.len());
        for (i, facility) in facilities.iter().enumerate() {
            by_district
                .entry(facility.district.trim().to_lowercase())
                .or_default()
                .push(i);
            key_tokens.push(normalizer.key_tokens(&facility.name));
        }
        Self {
            by_district,
            key_tokens,
        }
    }

    /// Candidates for one district key; empty slice if the district is
    /// absent. Source order within the district.
    pub fn candidates(&self, district_key: &str) -> &[usize] {
        self.by_district
            .get(district_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every facility across every district: district order, source order
    /// within. The fallback search space when a district bucket is empty.
    pub fn all(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_district.values().flat_map(|v| v.iter().copied())
    }

    pub fn tokens(&self, facility: usize) -> &BTreeSet<String> {
        &self.key_tokens[facility]
    }

    pub fn district_count(&self) -> usize {
        self.by_district.len()
    }
}
