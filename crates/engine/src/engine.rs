use crate::aggregate;
use crate::alias::AliasResolver;
use crate::config::MatchConfig;
use crate::error::EngineError;
use crate::index::CandidateIndex;
use crate::matcher::{self, Selection};
use crate::model::{EnrichResult, Facility, MatchSummary, Posting, RunMeta, UnmatchedPosting};
use crate::normalize::Normalizer;

/// Run the enrichment: match every posting against the facility snapshot and
/// attach accepted staff records to their facility.
///
/// Precondition: the snapshot must be pristine. A facility that already
/// carries staff means the caller is re-running over enriched output, which
/// would double-append, so that input is rejected up front.
pub fn run(
    config: &MatchConfig,
    mut facilities: Vec<Facility>,
    postings: &[Posting],
) -> Result<EnrichResult, EngineError> {
    if let Some(dirty) = facilities.iter().find(|f| !f.staff.is_empty()) {
        return Err(EngineError::StaffAlreadyAttached {
            facility: dirty.name.clone(),
        });
    }

    let vocabulary = config.vocabulary();
    let normalizer = Normalizer::new(&vocabulary);
    let resolver = AliasResolver::new(
        facilities.iter().map(|f| f.district.as_str()),
        &config.alias_overrides(),
    );
    let index = CandidateIndex::build(&facilities, &normalizer);

    let mut matched = 0usize;
    let mut matched_via_fallback = 0usize;
    let mut unmatched = Vec::new();

    for posting in postings {
        match matcher::select(posting, &index, &normalizer, &resolver, config.threshold) {
            Selection::Matched {
                facility,
                via_fallback,
                ..
            } => {
                facilities[facility].staff.push(posting.staff.clone());
                matched += 1;
                if via_fallback {
                    matched_via_fallback += 1;
                }
            }
            Selection::Unmatched { best } => {
                unmatched.push(UnmatchedPosting {
                    district: posting.district.clone(),
                    place_of_posting: posting.place_of_posting.clone(),
                    staff_name: posting.staff.name.clone(),
                    best_score: best.map(|(_, score)| score).unwrap_or(0.0),
                    best_candidate: best.map(|(facility, _)| facilities[facility].name.clone()),
                });
            }
        }
    }

    let facilities_by_district = aggregate::group_by_district(&facilities);
    let roles = aggregate::distinct_roles(&facilities);

    Ok(EnrichResult {
        meta: RunMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            threshold: config.threshold,
        },
        summary: MatchSummary {
            postings: postings.len(),
            matched,
            matched_via_fallback,
            unmatched: unmatched.len(),
            districts: facilities_by_district.len(),
            roles,
        },
        facilities,
        facilities_by_district,
        unmatched,
    })
}
