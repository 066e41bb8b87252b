//! Splits applicant strings such as `天津理工大学计算机科学与工程学院江小白学生`
//! into an organization, a person name and a role flag.
//!
//! The pipeline is: raw string → [`Segmenter`] → token sequence →
//! [`classify`] → [`finalize`] → [`ApplicantResult`].

pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod keywords;
pub mod parse;
pub mod registry;
pub mod samples;
pub mod segment;

pub use applicant_types::{ApplicantResult, Role};
pub use classify::{Classification, classify};
pub use config::CustomKeywords;
pub use error::{Error, Result};
pub use format::{Fields, OutputPattern, finalize, strip_separators};
pub use keywords::KeywordSet;
pub use parse::{Engine, parse, parse_tokens};
pub use registry::{KeywordRegistry, SharedRegistry};
pub use segment::{DictionarySegmenter, Segmenter};
