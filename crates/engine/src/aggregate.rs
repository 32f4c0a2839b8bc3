use std::collections::{BTreeMap, BTreeSet};

use crate::model::Facility;

/// Rebuild the district → facilities grouping from the final collection.
/// Keys are the canonical district strings as recorded in the directory.
pub fn group_by_district(facilities: &[Facility]) -> BTreeMap<String, Vec<Facility>> {
    let mut groups: BTreeMap<String, Vec<Facility>> = BTreeMap::new();
    for facility in facilities {
        groups
            .entry(facility.district.clone())
            .or_default()
            .push(facility.clone());
    }
    groups
}

/// Sorted distinct role labels across all attached staff records.
pub fn distinct_roles(facilities: &[Facility]) -> Vec<String> {
    let mut roles: BTreeSet<String> = BTreeSet::new();
    for facility in facilities {
        for staff in &facility.staff {
            roles.insert(staff.role.clone());
        }
    }
    roles.into_iter().collect()
}
