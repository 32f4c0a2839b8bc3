use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One canonical facility from the directory snapshot.
///
/// Only `district` and `name` are inspected by the engine; every other field
/// of the source record (coordinates, status, serial numbers, ...) rides
/// along in `extra` and is written back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub district: String,
    pub name: String,
    #[serde(default)]
    pub staff: Vec<StaffRecord>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Staff attributes carried by a posting. Opaque payload to the matching
/// engine; copied onto the matched facility verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub facility_type: String,
}

/// One staff-location claim from the roster.
#[derive(Debug, Clone)]
pub struct Posting {
    pub district: String,
    pub place_of_posting: String,
    pub staff: StaffRecord,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub postings: usize,
    pub matched: usize,
    pub matched_via_fallback: usize,
    pub unmatched: usize,
    pub districts: usize,
    /// Sorted distinct role labels across all attached staff.
    pub roles: Vec<String>,
}

/// Diagnostic record for a posting no candidate cleared the threshold for.
#[derive(Debug, Clone, Serialize)]
pub struct UnmatchedPosting {
    pub district: String,
    pub place_of_posting: String,
    pub staff_name: String,
    pub best_score: f64,
    /// Best candidate seen, even though rejected. `None` when every
    /// candidate scored 0.0 (or there were no candidates at all).
    pub best_candidate: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichResult {
    pub meta: RunMeta,
    pub summary: MatchSummary,
    pub facilities: Vec<Facility>,
    pub facilities_by_district: BTreeMap<String, Vec<Facility>>,
    pub unmatched: Vec<UnmatchedPosting>,
}
