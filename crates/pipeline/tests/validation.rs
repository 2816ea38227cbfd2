//! Integration tests for the validation pipeline.
//!
//! These tests verify that the rule chain and field parsers behave like
//! the real ingestion configuration: a 10 MB limit and the image
//! extension allow-list.

use pipeline::rules::{ExtensionRule, SizeLimitRule};
use pipeline::{parse_height, Validator};
use records::{ImageUpload, ServiceError};

const MAX_BYTES: usize = 10 * 1024 * 1024;

fn production_validator() -> Validator {
    Validator::new()
        .add_rule(SizeLimitRule::new(MAX_BYTES))
        .add_rule(ExtensionRule::new([".jpg", ".jpeg", ".png"]))
}

#[test]
fn accepts_a_realistic_pair_of_uploads() {
    let validator = production_validator();

    let front = ImageUpload::new("front_20240112.jpg", vec![0u8; 12_000]);
    let side = ImageUpload::new("side_20240112.png", vec![0u8; 15_000]);

    assert!(validator.validate(&front).is_ok());
    assert!(validator.validate(&side).is_ok());
    assert!(parse_height(Some("175.5")).is_ok());
}

#[test]
fn rejects_disallowed_extension_regardless_of_content() {
    let validator = production_validator();

    // The payload bytes are perfectly fine; only the name matters
    let upload = ImageUpload::new("script.txt", vec![0u8; 100]);
    let err = validator.validate(&upload).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn rejects_payload_over_the_limit_regardless_of_content() {
    let validator = Validator::new()
        .add_rule(SizeLimitRule::new(1_024))
        .add_rule(ExtensionRule::new([".jpg"]));

    let upload = ImageUpload::new("huge.jpg", vec![0u8; 2_048]);
    let err = validator.validate(&upload).unwrap_err();
    assert!(err.to_string().contains("too large"));
}

#[test]
fn extension_check_is_case_insensitive() {
    let validator = production_validator();
    let upload = ImageUpload::new("IMG_0042.JPEG", vec![0u8; 10]);
    assert!(validator.validate(&upload).is_ok());
}

#[test]
fn height_validation_is_central_for_all_paths() {
    // Zero and negative heights never reach the predictor
    for bad in ["0", "-1", "0.0", "nonsense", ""] {
        assert!(parse_height(Some(bad)).is_err(), "{bad:?} should be rejected");
    }
    assert!(parse_height(None).is_err());
}
