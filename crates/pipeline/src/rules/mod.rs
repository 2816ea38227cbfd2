//! Rule implementations for the validation pipeline.
//!
//! This module contains the concrete checks that can be composed into a
//! Validator chain.

pub mod extension;
pub mod size_limit;

// Re-export for convenience
pub use extension::ExtensionRule;
pub use size_limit::SizeLimitRule;
