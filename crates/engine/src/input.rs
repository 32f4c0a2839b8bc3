//! Loaders for the two input snapshots. Everything here is glue: the engine
//! itself only ever sees typed record collections.

use serde::Deserialize;

use crate::config::ColumnMapping;
use crate::error::EngineError;
use crate::model::{Facility, Posting, StaffRecord};

#[derive(Deserialize)]
struct DirectoryFile {
    facilities: Vec<Facility>,
}

/// Parse the facility directory JSON (`{ "facilities": [...] }`). Unknown
/// top-level keys (metadata, precomputed groupings) are ignored; unknown
/// per-facility fields are preserved for the output.
pub fn load_facilities_json(data: &str) -> Result<Vec<Facility>, EngineError> {
    let file: DirectoryFile =
        serde_json::from_str(data).map_err(|e| EngineError::JsonParse(e.to_string()))?;
    Ok(file.facilities)
}

/// Known role-label misspellings and variants in the roster sheet.
const ROLE_CANON: &[(&str, &str)] = &[
    ("counsellor", "Counsellor"),
    ("clinical psychologist", "Clinical Psychologist"),
    ("psychologist", "Psychologist"),
    ("psychiatric social worker", "Psychiatric Social Worker"),
    ("psychiatrict social worker", "Psychiatric Social Worker"),
    ("medical/psychiatric social worker", "Psychiatric Social Worker"),
    ("social worker", "Social Worker"),
];

/// Trim, default a blank label to "Counsellor", and fold known typos onto
/// their canonical spelling. Unrecognized labels pass through trimmed.
fn canonical_role(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "Counsellor".to_string();
    }
    let lower = trimmed.to_lowercase();
    ROLE_CANON
        .iter()
        .find(|(variant, _)| *variant == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Load the postings roster from CSV.
///
/// Reproduces the source sheet's quirks: the district column uses merged
/// cells, so blank districts carry the previous row's value forward; rows
/// missing the staff name or the place of posting are skipped; every field
/// is whitespace-trimmed.
pub fn load_postings_csv(
    csv_data: &str,
    columns: &ColumnMapping,
) -> Result<Vec<Posting>, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EngineError::CsvParse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, EngineError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| EngineError::MissingColumn {
                column: name.to_string(),
            })
    };

    let district_idx = idx(&columns.district)?;
    let name_idx = idx(&columns.name)?;
    let role_idx = idx(&columns.role)?;
    let place_idx = idx(&columns.place_of_posting)?;
    let facility_type_idx = idx(&columns.facility_type)?;
    let contact_idx = idx(&columns.contact)?;
    let gender_idx = idx(&columns.gender)?;

    let mut postings = Vec::new();
    let mut last_district = String::new();

    for record in reader.records() {
        let record = record.map_err(|e| EngineError::CsvParse(e.to_string()))?;
        let get = |i: usize| record.get(i).unwrap_or("").trim().to_string();

        let district = get(district_idx);
        let district = if district.is_empty() {
            last_district.clone()
        } else {
            last_district = district.clone();
            district
        };

        let name = get(name_idx);
        let place_of_posting = get(place_idx);
        if name.is_empty() || place_of_posting.is_empty() {
            continue;
        }

        postings.push(Posting {
            district,
            place_of_posting,
            staff: StaffRecord {
                name,
                role: canonical_role(&get(role_idx)),
                contact: get(contact_idx),
                gender: get(gender_idx),
                facility_type: get(facility_type_idx),
            },
        });
    }

    Ok(postings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "district,name,designation,place_of_posting,facility_type,contact,gender";

    #[test]
    fn load_facilities_preserves_extra_fields() {
        let json = r#"{
  "facilities": [
    {
      "sn": 1,
      "district": "Kapurthala",
      "name": "CHC Phagwara",
      "latitude": 31.22,
      "longitude": 75.77,
      "status": "Functional"
    }
  ],
  "metadata": { "total": 1 }
}"#;
        let facilities = load_facilities_json(json).unwrap();
        assert_eq!(facilities.len(), 1);
        let f = &facilities[0];
        assert_eq!(f.district, "Kapurthala");
        assert_eq!(f.name, "CHC Phagwara");
        assert!(f.staff.is_empty());
        assert_eq!(f.extra["status"], "Functional");
        assert_eq!(f.extra["latitude"], 31.22);
    }

    #[test]
    fn load_facilities_rejects_malformed_json() {
        let err = load_facilities_json("{").unwrap_err();
        assert!(matches!(err, EngineError::JsonParse(_)));
    }

    #[test]
    fn district_forward_fill() {
        let csv = format!(
            "{HEADER}\n\
             Kapurthala,R. Kaur,Counsellor,CHC Phagwara,CHC,98765,F\n\
             ,S. Singh,Psychologist,SDH Sultanpur Lodhi,SDH,87654,M\n\
             Mansa,T. Devi,Counsellor,CHC Sardulgarh,CHC,76543,F\n"
        );
        let postings = load_postings_csv(&csv, &ColumnMapping::default()).unwrap();
        assert_eq!(postings.len(), 3);
        assert_eq!(postings[1].district, "Kapurthala");
        assert_eq!(postings[2].district, "Mansa");
    }

    #[test]
    fn incomplete_rows_skipped() {
        let csv = format!(
            "{HEADER}\n\
             Kapurthala,R. Kaur,Counsellor,CHC Phagwara,CHC,98765,F\n\
             Kapurthala,,Counsellor,CHC Phagwara,CHC,,\n\
             Kapurthala,S. Singh,Counsellor,,CHC,,\n"
        );
        let postings = load_postings_csv(&csv, &ColumnMapping::default()).unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].staff.name, "R. Kaur");
    }

    #[test]
    fn role_canonicalization() {
        let csv = format!(
            "{HEADER}\n\
             Mansa,A,Psychiatrict Social Worker,CHC Sardulgarh,CHC,,\n\
             Mansa,B,,CHC Sardulgarh,CHC,,\n\
             Mansa,C,Peer Educator,CHC Sardulgarh,CHC,,\n"
        );
        let postings = load_postings_csv(&csv, &ColumnMapping::default()).unwrap();
        assert_eq!(postings[0].staff.role, "Psychiatric Social Worker");
        assert_eq!(postings[1].staff.role, "Counsellor");
        // unknown labels pass through
        assert_eq!(postings[2].staff.role, "Peer Educator");
    }

    #[test]
    fn fields_are_trimmed() {
        let csv = format!(
            "{HEADER}\n\
             Mansa , R. Kaur , Counsellor , CHC Sardulgarh , CHC , 98765 , F \n"
        );
        let postings = load_postings_csv(&csv, &ColumnMapping::default()).unwrap();
        let p = &postings[0];
        assert_eq!(p.district, "Mansa");
        assert_eq!(p.place_of_posting, "CHC Sardulgarh");
        assert_eq!(p.staff.contact, "98765");
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "district,name,place_of_posting\nMansa,A,CHC Sardulgarh\n";
        let err = load_postings_csv(csv, &ColumnMapping::default()).unwrap_err();
        match err {
            EngineError::MissingColumn { column } => assert_eq!(column, "designation"),
            other => panic!("expected MissingColumn, got {other}"),
        }
    }

    #[test]
    fn custom_column_mapping() {
        let mapping = ColumnMapping {
            role: "post".into(),
            place_of_posting: "location".into(),
            ..ColumnMapping::default()
        };
        let csv = "district,name,post,location,facility_type,contact,gender\n\
                   Mansa,A,Counsellor,CHC Sardulgarh,CHC,,\n";
        let postings = load_postings_csv(csv, &mapping).unwrap();
        assert_eq!(postings[0].place_of_posting, "CHC Sardulgarh");
    }
}
