//! Rule enforcing the image extension allow-list.
//!
//! Only the declared filename is consulted; the payload itself is never
//! sniffed.

use crate::traits::Rule;
use records::{ImageUpload, Result, ServiceError};

/// Rejects uploads whose extension is not in the allow-list.
///
/// Extensions are compared lowercased and with the leading dot (the form
/// the allow-list is configured in, e.g. `.jpg`). A filename without any
/// extension is rejected outright.
pub struct ExtensionRule {
    allowed: Vec<String>,
}

impl ExtensionRule {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for ExtensionRule {
    fn name(&self) -> &str {
        "ExtensionRule"
    }

    fn check(&self, upload: &ImageUpload) -> Result<()> {
        let ext = upload
            .extension()
            .ok_or_else(|| ServiceError::unsupported_format(&upload.filename))?;

        if self.allowed.iter().any(|allowed| *allowed == ext) {
            Ok(())
        } else {
            Err(ServiceError::unsupported_format(&upload.filename))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> ExtensionRule {
        ExtensionRule::new([".jpg", ".jpeg", ".png"])
    }

    #[test]
    fn test_allowed_extensions_pass() {
        let rule = rule();
        assert!(rule.check(&ImageUpload::new("front.jpg", vec![1])).is_ok());
        assert!(rule.check(&ImageUpload::new("side.PNG", vec![1])).is_ok());
    }

    #[test]
    fn test_disallowed_extension_is_rejected() {
        let rule = rule();
        let err = rule
            .check(&ImageUpload::new("notes.txt", vec![1]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        let rule = rule();
        let err = rule.check(&ImageUpload::new("image", vec![1])).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
