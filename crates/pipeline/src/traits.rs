//! Core trait for the validation pipeline.
//!
//! This module defines the Rule trait that allows composable,
//! extensible checks to be applied to uploaded artifacts.

use records::{ImageUpload, Result};

/// Core trait for validating an uploaded image.
///
/// All rules must implement this trait to be used in the Validator chain.
///
/// ## Design Note
/// - `Send + Sync` allows rules to be shared across concurrent requests
/// - Rules are pure checks: they never mutate the upload or touch I/O,
///   and they never inspect image content — only size and metadata
pub trait Rule: Send + Sync {
    /// Returns the name of this rule (for logging/debugging)
    fn name(&self) -> &str;

    /// Check one upload against this rule.
    ///
    /// # Returns
    /// * `Ok(())` - The upload passes
    /// * `Err(ServiceError::Validation)` - The upload is rejected
    fn check(&self, upload: &ImageUpload) -> Result<()>;
}
