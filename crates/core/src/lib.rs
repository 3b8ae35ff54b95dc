//! `veritext-core`: validation and verdict building blocks.
//!
//! This crate is **pure**: no I/O, no async, no HTTP. It knows what a valid
//! submission looks like and how a raw classifier answer becomes an
//! [`AnalysisResult`]. Talking to the classifier is `veritext-ai`'s job.

pub mod analysis;
pub mod error;
pub mod text;
pub mod verdict;

pub use analysis::{AnalysisDetails, AnalysisResult, PercentPair, reconcile, DEFAULT_SOURCE_LABEL};
pub use error::{ContractViolation, ValidationError};
pub use text::{MIN_TEXT_CHARS, ValidText, validate};
pub use verdict::{Prediction, ProbabilityPair};
