use std::collections::BTreeSet;

/// Jaccard similarity: |a ∩ b| / |a ∪ b|.
///
/// 0.0 when either set is empty ("no signal" scores as no match, and the
/// division by zero never happens). Symmetric, range [0, 1], 1.0 for
/// identical non-empty sets.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
