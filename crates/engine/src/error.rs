use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, empty input path, etc.).
    ConfigValidation(String),
    /// Missing required column in the postings CSV.
    MissingColumn { column: String },
    /// CSV read/parse error.
    CsvParse(String),
    /// Facility directory JSON parse error.
    JsonParse(String),
    /// The facility snapshot already carries staff records. Re-running on
    /// enriched output would double-append, so a pristine snapshot is
    /// required.
    StaffAlreadyAttached { facility: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { column } => {
                write!(f, "postings: missing column '{column}'")
            }
            Self::CsvParse(msg) => write!(f, "CSV parse error: {msg}"),
            Self::JsonParse(msg) => write!(f, "facility JSON parse error: {msg}"),
            Self::StaffAlreadyAttached { facility } => {
                write!(
                    f,
                    "facility '{facility}' already has staff attached; supply a pristine snapshot"
                )
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
