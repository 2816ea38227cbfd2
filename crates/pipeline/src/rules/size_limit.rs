//! Rule enforcing the maximum payload size.

use crate::traits::Rule;
use records::{ImageUpload, Result, ServiceError};

/// Rejects uploads larger than the configured maximum, and empty uploads.
pub struct SizeLimitRule {
    max_bytes: usize,
}

impl SizeLimitRule {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl Rule for SizeLimitRule {
    fn name(&self) -> &str {
        "SizeLimitRule"
    }

    fn check(&self, upload: &ImageUpload) -> Result<()> {
        if upload.is_empty() {
            return Err(ServiceError::validation(format!(
                "empty image payload: {}",
                upload.filename
            )));
        }
        if upload.len() > self.max_bytes {
            return Err(ServiceError::file_too_large(self.max_bytes));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_limit_passes() {
        let rule = SizeLimitRule::new(1_000);
        assert!(rule
            .check(&ImageUpload::new("a.jpg", vec![0u8; 1_000]))
            .is_ok());
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let rule = SizeLimitRule::new(1_000);
        let err = rule
            .check(&ImageUpload::new("a.jpg", vec![0u8; 1_001]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("1000 bytes"));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let rule = SizeLimitRule::new(1_000);
        let err = rule.check(&ImageUpload::new("a.jpg", vec![])).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
