//! The Validator chains multiple rules over an upload.
//!
//! This module provides the main Validator struct that applies
//! rules in order using the builder pattern.

use crate::traits::Rule;
use records::{ImageUpload, Result};
use tracing;

/// Chains validation rules into a single check.
///
/// ## Usage
/// ```ignore
/// let validator = Validator::new()
///     .add_rule(SizeLimitRule::new(10 * 1024 * 1024))
///     .add_rule(ExtensionRule::new([".jpg", ".jpeg", ".png"]));
///
/// validator.validate(&upload)?;
/// ```
pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
}

impl Validator {
    /// Create a new empty Validator.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule to the chain (builder pattern).
    pub fn add_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Apply all rules in order; the first failing rule decides the error.
    pub fn validate(&self, upload: &ImageUpload) -> Result<()> {
        for rule in &self.rules {
            tracing::debug!(
                rule = rule.name(),
                filename = %upload.filename,
                bytes = upload.len(),
                "applying validation rule"
            );
            rule.check(upload)?;
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
