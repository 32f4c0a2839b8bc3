use crate::alias::AliasResolver;
use crate::index::CandidateIndex;
use crate::model::Posting;
use crate::normalize::Normalizer;
use crate::score::jaccard;

/// Minimum overlap to accept a match. Calibrated against the real datasets;
/// overridable per run through the config.
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// One-shot decision for a single posting.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Matched {
        /// Index into the facility collection the candidate index was built
        /// from.
        facility: usize,
        score: f64,
        /// True when the posting's district resolved to an empty bucket and
        /// the search widened to every facility. Flagged, not silent, so
        /// callers can audit data quality.
        via_fallback: bool,
    },
    Unmatched {
        /// Best candidate seen and its score; `None` when nothing scored
        /// above 0.0.
        best: Option<(usize, f64)>,
    },
}

/// Resolve the posting's district, restrict to that bucket (or widen to all
/// facilities when it is empty), score every candidate, and accept the best
/// iff it clears `threshold`.
///
/// Ties keep the first candidate in index order: strict `>` during the scan.
pub fn select(
    posting: &Posting,
    index: &CandidateIndex,
    normalizer: &Normalizer,
    resolver: &AliasResolver,
    threshold: f64,
) -> Selection {
    let district_key = resolver.resolve(&posting.district).trim().to_lowercase();
    let restricted = index.candidates(&district_key);
    let via_fallback = restricted.is_empty();

    let posting_tokens = normalizer.key_tokens(&posting.place_of_posting);

    let mut best: Option<usize> = None;
    let mut best_score = 0.0_f64;

    let mut consider = |facility: usize| {
        let score = jaccard(&posting_tokens, index.tokens(facility));
        if score > best_score {
            best_score = score;
            best = Some(facility);
        }
    };

    if via_fallback {
        index.all().for_each(&mut consider);
    } else {
        restricted.iter().copied().for_each(&mut consider);
    }

    match best {
        Some(facility) if best_score >= threshold => Selection::Matched {
            facility,
            score: best_score,
            via_fallback,
        },
        _ => Selection::Unmatched {
            best: best.map(|facility| (facility, best_score)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{self, AliasResolver};
    use crate::config::Vocabulary;
    use crate::model::{Facility, StaffRecord};
    use std::collections::BTreeMap;

    fn facility(district: &str, name: &str) -> Facility {
        Facility {
            district: district.into(),
            name: name.into(),
            staff: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    fn posting(district: &str, place: &str) -> Posting {
        Posting {
            district: district.into(),
            place_of_posting: place.into(),
            staff: StaffRecord {
                name: "A. Counsellor".into(),
                role: "Counsellor".into(),
                contact: String::new(),
                gender: String::new(),
                facility_type: String::new(),
            },
        }
    }

    struct Fixture {
        facilities: Vec<Facility>,
        index: CandidateIndex,
        normalizer: Normalizer,
        resolver: AliasResolver,
    }

    fn fixture(facilities: Vec<Facility>) -> Fixture {
        let normalizer = Normalizer::new(&Vocabulary::default());
        let index = CandidateIndex::build(&facilities, &normalizer);
        let resolver = AliasResolver::new(
            facilities.iter().map(|f| f.district.as_str()),
            &alias::default_overrides(),
        );
        Fixture {
            facilities,
            index,
            normalizer,
            resolver,
        }
    }

    fn select_in(fx: &Fixture, p: &Posting) -> Selection {
        select(p, &fx.index, &fx.normalizer, &fx.resolver, DEFAULT_THRESHOLD)
    }

    #[test]
    fn matches_within_district() {
        let fx = fixture(vec![
            facility("Kapurthala", "Community Health Centre Phagwara"),
            facility("Kapurthala", "SDH Sultanpur Lodhi"),
            facility("Mansa", "CHC Sardulgarh"),
        ]);
        let sel = select_in(&fx, &posting("Kapurthala", "CHC Phagwara"));
        match sel {
            Selection::Matched {
                facility,
                score,
                via_fallback,
            } => {
                assert_eq!(fx.facilities[facility].name, "Community Health Centre Phagwara");
                assert!(score >= DEFAULT_THRESHOLD);
                assert!(!via_fallback);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn alias_resolves_before_candidate_lookup() {
        let fx = fixture(vec![
            facility("SAS nagar Mohali", "District Hospital Mohali"),
            facility("Ludhiana", "DH Mohali Annexe Ludhiana"),
        ]);
        let sel = select_in(&fx, &posting("S.A.S Nagar", "Civil Hospital Mohali"));
        match sel {
            Selection::Matched {
                facility,
                via_fallback,
                ..
            } => {
                assert_eq!(fx.facilities[facility].district, "SAS nagar Mohali");
                assert!(!via_fallback, "alias hit must use the district path");
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn unknown_district_widens_to_all_facilities() {
        let fx = fixture(vec![facility(
            "Kapurthala",
            "Community Health Centre Phagwara",
        )]);
        let sel = select_in(&fx, &posting("Nowhere", "CHC Phagwara"));
        match sel {
            Selection::Matched { via_fallback, .. } => assert!(via_fallback),
            other => panic!("expected fallback match, got {other:?}"),
        }
    }

    #[test]
    fn below_threshold_keeps_best_for_diagnostics() {
        let fx = fixture(vec![facility(
            "Mansa",
            "Community Health Centre Sardulgarh Jhunir Road",
        )]);
        // one shared token out of many: non-zero but below 0.15
        let sel = select(
            &posting("Mansa", "Sardulgarh Alpha Beta Gamma Delta Epsilon Zeta"),
            &fx.index,
            &fx.normalizer,
            &fx.resolver,
            0.5,
        );
        match sel {
            Selection::Unmatched { best: Some((facility, score)) } => {
                assert_eq!(fx.facilities[facility].district, "Mansa");
                assert!(score > 0.0 && score < 0.5);
            }
            other => panic!("expected unmatched-with-best, got {other:?}"),
        }
    }

    #[test]
    fn zero_overlap_reports_no_best_candidate() {
        let fx = fixture(vec![facility("Kapurthala", "CHC Phagwara")]);
        let sel = select_in(&fx, &posting("Unknown District", "xyz"));
        assert_eq!(sel, Selection::Unmatched { best: None });
    }

    #[test]
    fn no_facilities_at_all_is_unmatched_not_a_failure() {
        let fx = fixture(Vec::new());
        let sel = select_in(&fx, &posting("Kapurthala", "CHC Phagwara"));
        assert_eq!(sel, Selection::Unmatched { best: None });
    }

    #[test]
    fn tie_keeps_first_in_index_order() {
        let fx = fixture(vec![
            facility("Mansa", "OOAT Clinic Budhlada"),
            facility("Mansa", "CHC Budhlada"),
        ]);
        // both candidates reduce to {budhlada}; source order decides
        let sel = select_in(&fx, &posting("Mansa", "Budhlada"));
        match sel {
            Selection::Matched { facility, score, .. } => {
                assert_eq!(facility, 0);
                assert_eq!(score, 1.0);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }
}
