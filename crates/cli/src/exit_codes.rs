//! CLI exit code registry.
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success; every posting matched                           |
//! | 1    | Run completed but unmatched postings remain (like diff)  |
//! | 2    | CLI usage error (bad args; emitted by clap)              |
//! | 3    | Invalid run config                                       |
//! | 4    | Runtime/IO error                                         |
//! | 5    | Input parse error (facility JSON or roster CSV)          |

/// Run completed; some postings could not be matched to any facility.
pub const EXIT_UNMATCHED: u8 = 1;

/// Config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// IO or engine runtime failure.
pub const EXIT_RUNTIME: u8 = 4;

/// Input data failed to parse.
pub const EXIT_PARSE: u8 = 5;
