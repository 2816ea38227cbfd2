//! Validation pipeline for uploaded estimation requests.
//!
//! This crate provides:
//! - Rule trait and implementations for upload checks
//! - Validator for composing rules
//! - Parsers for the numeric form fields (height, actual weight)
//!
//! ## Architecture
//! Every ingestion path runs the same stages before anything is stored:
//! 1. Rules reject bad payloads (oversized, empty, wrong extension)
//! 2. Field parsers reject missing or non-positive numeric inputs
//! 3. Only fully validated requests reach the artifact store and predictor
//!
//! All checks are pure: no I/O, and image bytes are never inspected.

pub mod fields;
pub mod rules;
pub mod traits;
pub mod validator;

// Re-export main types
pub use fields::{parse_height, parse_weight};
pub use traits::Rule;
pub use validator::Validator;
