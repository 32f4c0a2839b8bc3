//! `rostermatch convert` — build the facility directory JSON from a
//! spreadsheet CSV export.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::{CliError, EXIT_PARSE, EXIT_RUNTIME};

#[derive(Args)]
pub struct ConvertArgs {
    /// Facility spreadsheet CSV export
    pub input: PathBuf,

    /// Output file (omit for stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// CSV delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Header of the district column
    #[arg(long, default_value = "district")]
    pub district_col: String,

    /// Header of the facility-name column
    #[arg(long, default_value = "name")]
    pub name_col: String,

    /// Header of the latitude column
    #[arg(long, default_value = "latitude")]
    pub latitude_col: String,

    /// Header of the longitude column
    #[arg(long, default_value = "longitude")]
    pub longitude_col: String,

    /// Header of the remarks column (optional in the export)
    #[arg(long, default_value = "remarks")]
    pub remarks_col: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryFacility {
    pub sn: usize,
    pub district: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DirectoryMetadata {
    pub total: usize,
    pub districts: usize,
    pub functional: usize,
    pub non_functional: usize,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
pub struct DirectoryFile {
    pub facilities: Vec<DirectoryFacility>,
    pub facilities_by_district: BTreeMap<String, Vec<DirectoryFacility>>,
    pub metadata: DirectoryMetadata,
}

/// Operational status as recorded in the freeform remarks column.
fn derive_status(remarks: &str) -> &'static str {
    let remarks = remarks.to_lowercase();
    if remarks.contains("non") && remarks.contains("functional") {
        "Non-Functional"
    } else if remarks.contains("functional") {
        "Functional"
    } else {
        "Unknown"
    }
}

/// Parse the export. Rows missing the district or either coordinate are
/// skipped (header junk, blank spacer rows); the skip count is returned for
/// the console note.
pub fn build_directory(csv_data: &str, args: &ConvertArgs) -> Result<(DirectoryFile, usize), CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(args.delimiter as u8)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CliError::new(EXIT_PARSE, format!("CSV parse error: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, CliError> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            CliError::new(EXIT_PARSE, format!("missing column '{name}'"))
        })
    };

    let district_idx = idx(&args.district_col)?;
    let name_idx = idx(&args.name_col)?;
    let latitude_idx = idx(&args.latitude_col)?;
    let longitude_idx = idx(&args.longitude_col)?;
    let remarks_idx = headers.iter().position(|h| h == &args.remarks_col);

    let mut facilities = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record =
            record.map_err(|e| CliError::new(EXIT_PARSE, format!("CSV parse error: {e}")))?;
        let get = |i: usize| record.get(i).unwrap_or("").trim().to_string();

        let district = get(district_idx);
        let latitude = get(latitude_idx).parse::<f64>();
        let longitude = get(longitude_idx).parse::<f64>();
        let (latitude, longitude) = match (district.is_empty(), latitude, longitude) {
            (false, Ok(lat), Ok(lon)) => (lat, lon),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let remarks = remarks_idx.map(|i| get(i)).unwrap_or_default();

        facilities.push(DirectoryFacility {
            sn: facilities.len() + 1,
            district,
            name: get(name_idx),
            latitude,
            longitude,
            status: derive_status(&remarks),
        });
    }

    let mut facilities_by_district: BTreeMap<String, Vec<DirectoryFacility>> = BTreeMap::new();
    for facility in &facilities {
        facilities_by_district
            .entry(facility.district.clone())
            .or_default()
            .push(facility.clone());
    }

    let metadata = DirectoryMetadata {
        total: facilities.len(),
        districts: facilities_by_district.len(),
        functional: facilities.iter().filter(|f| f.status == "Functional").count(),
        non_functional: facilities
            .iter()
            .filter(|f| f.status == "Non-Functional")
            .count(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    };

    Ok((
        DirectoryFile {
            facilities,
            facilities_by_district,
            metadata,
        },
        skipped,
    ))
}

pub fn cmd_convert(args: ConvertArgs) -> Result<(), CliError> {
    let csv_data = std::fs::read_to_string(&args.input).map_err(|e| {
        CliError::new(
            EXIT_RUNTIME,
            format!("cannot read {}: {e}", args.input.display()),
        )
    })?;

    let (directory, skipped) = build_directory(&csv_data, &args)?;

    let json_str = serde_json::to_string_pretty(&directory)
        .map_err(|e| CliError::new(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &json_str).map_err(|e| {
                CliError::new(EXIT_RUNTIME, format!("cannot write output: {e}"))
            })?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json_str}"),
    }

    let m = &directory.metadata;
    eprintln!(
        "converted {} facilities across {} districts ({} functional, {} non-functional)",
        m.total, m.districts, m.functional, m.non_functional,
    );
    if skipped > 0 {
        eprintln!("note: skipped {skipped} row(s) missing district or coordinates");
    }

    Ok(())
}
