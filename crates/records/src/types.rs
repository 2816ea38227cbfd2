//! Core domain types for the weight estimation service.
//!
//! Ephemeral types (`ImageUpload`, `EstimationRequest`, `PredictionOutcome`)
//! live only for the duration of one pipeline invocation. Persisted types
//! (`EstimationRecord`, `TrainingSample`) are created once, immutable
//! afterwards except for deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unique identifier for a persisted record (uuid string once assigned)
pub type RecordId = String;

// =============================================================================
// Ephemeral request types
// =============================================================================

/// A single uploaded image: the client-supplied filename plus raw bytes.
///
/// The payload is opaque to the pipeline; nothing ever inspects the image
/// content, only its size and declared extension.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased extension including the leading dot (e.g. `.jpg`),
    /// or `None` when the filename carries no extension at all.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
    }
}

/// One two-image estimation request as accepted by the core pipeline.
#[derive(Debug, Clone)]
pub struct EstimationRequest {
    pub front: ImageUpload,
    pub side: ImageUpload,
    /// Height in centimeters, already validated as positive and finite
    pub height: f64,
}

/// What the predictor reports back for a single call.
///
/// The error indicator of the predictor contract is the `Err` side of the
/// client's `Result`; an `Ok` outcome always carries a usable weight.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    /// Estimated or echoed height in centimeters
    pub height: Option<f64>,
    /// Estimated weight in kilograms, exactly as reported
    pub weight: f64,
    /// Confidence score in [0, 1] when the predictor reports one
    pub confidence: Option<f64>,
}

// =============================================================================
// Persisted record types
// =============================================================================

/// A persisted weight estimation outcome ("estimations" collection).
///
/// `id` and `created_at` are assigned by the persistence gateway on insert
/// when unset; an empty `id` / `None` timestamp marks a not-yet-inserted
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationRecord {
    #[serde(default)]
    pub id: RecordId,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Confidence reported by the predictor, absent in fallback mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Paths of the stored image artifacts backing this estimation
    #[serde(default)]
    pub image_paths: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl EstimationRecord {
    /// Build a record ready for insertion; identity and timestamp are left
    /// for the persistence gateway to assign.
    pub fn new(
        height: f64,
        weight: f64,
        accuracy: Option<f64>,
        image_paths: Vec<String>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            height,
            weight,
            accuracy,
            image_paths,
            created_at: None,
        }
    }
}

/// A ground-truth contribution record ("training_data" collection).
///
/// Never consumed by the prediction path; only listed/exported for
/// training collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    #[serde(default)]
    pub id: RecordId,
    pub height: f64,
    pub actual_weight: f64,
    pub front_image_path: String,
    pub side_image_path: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TrainingSample {
    pub fn new(
        height: f64,
        actual_weight: f64,
        front_image_path: impl Into<String>,
        side_image_path: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            height,
            actual_weight,
            front_image_path: front_image_path.into(),
            side_image_path: side_image_path.into(),
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased_with_dot() {
        let upload = ImageUpload::new("Front.JPG", vec![1, 2, 3]);
        assert_eq!(upload.extension(), Some(".jpg".to_string()));

        let upload = ImageUpload::new("side.jpeg", vec![]);
        assert_eq!(upload.extension(), Some(".jpeg".to_string()));
    }

    #[test]
    fn test_extension_missing() {
        let upload = ImageUpload::new("noext", vec![1]);
        assert_eq!(upload.extension(), None);

        // A bare trailing dot carries no extension either
        let upload = ImageUpload::new("file.", vec![1]);
        assert_eq!(upload.extension(), None);
    }

    #[test]
    fn test_record_starts_without_identity() {
        let record = EstimationRecord::new(175.0, 68.2, None, vec!["a.jpg".into()]);
        assert!(record.id.is_empty());
        assert!(record.created_at.is_none());
        assert_eq!(record.image_paths.len(), 1);
    }

    #[test]
    fn test_record_json_round_trip() {
        let mut record = EstimationRecord::new(180.0, 72.5, Some(0.9), vec![]);
        record.id = "abc-123".into();
        record.created_at = Some(Utc::now());

        let json = serde_json::to_string(&record).unwrap();
        let back: EstimationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "abc-123");
        assert_eq!(back.weight, 72.5);
        assert_eq!(back.accuracy, Some(0.9));
    }

    #[test]
    fn test_accuracy_absent_is_skipped_in_json() {
        let record = EstimationRecord::new(170.0, 63.0, None, vec![]);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("accuracy"));
    }
}
