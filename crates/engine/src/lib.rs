//! `rostermatch-engine` — fuzzy facility/staff-posting matching engine.
//!
//! Pure engine crate: receives pre-loaded records, returns an enriched
//! facility collection. No CLI or terminal dependencies.

pub mod aggregate;
pub mod alias;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod input;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod score;

pub use config::{MatchConfig, Vocabulary};
pub use engine::run;
pub use error::EngineError;
pub use model::{EnrichResult, Facility, Posting, StaffRecord};
