//! # Estimation Orchestrator
//!
//! This module coordinates the estimation request pipeline:
//! 1. Validate the uploaded artifacts and numeric fields
//! 2. Persist the image payloads to the artifact store
//! 3. Call the predictor (remote endpoint or deterministic fallback)
//! 4. Build the result record
//! 5. Persist the record, honoring the endpoint's durability policy
//!
//! A request terminates early with an error at any failed stage; only the
//! persistence stage can fail without failing the request, and only under
//! the `BestEffort` policy.

use anyhow::{Context, Result as AnyResult};
use tracing::{info, warn};

use pipeline::rules::{ExtensionRule, SizeLimitRule};
use pipeline::{parse_height, parse_weight, Validator};
use predictor::PredictorClient;
use records::{EstimationRecord, ImageUpload, Result, TrainingSample};
use storage::{ArtifactStore, DocumentStore, EstimationRepo, TrainingRepo};

use crate::config::AppConfig;

/// What an insert failure after a successful prediction means for the
/// request.
///
/// The single-image upload path fails fast (the client sees an error even
/// though the weight was computed); the two-image estimate path prefers
/// availability of the already-computed prediction over write durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityPolicy {
    /// Insert failure is fatal to the request
    FailFast,
    /// Insert failure is logged; the client still gets the result
    BestEffort,
}

/// Main orchestrator driving the estimation pipeline.
pub struct EstimationOrchestrator {
    validator: Validator,
    max_file_bytes: usize,
    artifacts: ArtifactStore,
    training_artifacts: ArtifactStore,
    predictor: PredictorClient,
    estimations: EstimationRepo,
    training: TrainingRepo,
    estimate_durability: DurabilityPolicy,
    upload_durability: DurabilityPolicy,
}

impl EstimationOrchestrator {
    /// Wire an orchestrator from explicit parts.
    ///
    /// Durability defaults match the documented per-endpoint asymmetry:
    /// best-effort on the two-image estimate path, fail-fast on the
    /// single-image upload path.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        validator: Validator,
        max_file_bytes: usize,
        artifacts: ArtifactStore,
        training_artifacts: ArtifactStore,
        predictor: PredictorClient,
        estimations: EstimationRepo,
        training: TrainingRepo,
    ) -> Self {
        Self {
            validator,
            max_file_bytes,
            artifacts,
            training_artifacts,
            predictor,
            estimations,
            training,
            estimate_durability: DurabilityPolicy::BestEffort,
            upload_durability: DurabilityPolicy::FailFast,
        }
    }

    /// Override the per-endpoint durability policies.
    pub fn with_durability(
        mut self,
        estimate: DurabilityPolicy,
        upload: DurabilityPolicy,
    ) -> Self {
        self.estimate_durability = estimate;
        self.upload_durability = upload;
        self
    }

    /// Build the full pipeline from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> AnyResult<Self> {
        let validator = Validator::new()
            .add_rule(SizeLimitRule::new(config.max_file_bytes))
            .add_rule(ExtensionRule::new(config.allowed_extensions.clone()));

        let predictor = PredictorClient::new(config.predictor.clone())
            .context("failed to build prediction client")?;

        let store = DocumentStore::new(&config.data_dir);

        Ok(Self::new(
            validator,
            config.max_file_bytes,
            ArtifactStore::new(&config.upload_dir),
            ArtifactStore::new(config.upload_dir.join("training")),
            predictor,
            EstimationRepo::new(&store),
            TrainingRepo::new(&store),
        ))
    }

    /// Per-image upload limit, used by the multipart reader to stop early.
    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Two-image estimation: the core pipeline.
    ///
    /// Returns the estimated weight in kilograms. The result record is
    /// persisted under the estimate path's durability policy.
    pub async fn estimate_weight(
        &self,
        front: ImageUpload,
        side: ImageUpload,
        height_raw: Option<&str>,
    ) -> Result<f64> {
        self.validator.validate(&front)?;
        self.validator.validate(&side)?;
        let height = parse_height(height_raw)?;
        info!(
            height,
            front_bytes = front.len(),
            side_bytes = side.len(),
            "estimation request validated"
        );

        let front_path = self.artifacts.save(&front.bytes, &front.filename)?;
        let side_path = self.artifacts.save(&side.bytes, &side.filename)?;
        info!(front = %front_path.display(), side = %side_path.display(), "artifacts stored");

        let outcome = self
            .predictor
            .predict_pair(&front.bytes, &side.bytes, height)
            .await?;
        info!(weight = outcome.weight, confidence = ?outcome.confidence, "prediction complete");

        let record = EstimationRecord::new(
            height,
            outcome.weight,
            outcome.confidence,
            vec![
                front_path.display().to_string(),
                side_path.display().to_string(),
            ],
        );
        self.persist_estimation(record, self.estimate_durability)?;

        Ok(outcome.weight)
    }

    /// Legacy single-image upload: validate, store, predict, persist.
    ///
    /// Returns the persisted record (the response echoes its identity and
    /// timestamps). Persistence failures are fatal here by default.
    pub async fn upload_single(&self, image: ImageUpload) -> Result<EstimationRecord> {
        self.validator.validate(&image)?;
        info!(bytes = image.len(), "single-image upload validated");

        let path = self.artifacts.save(&image.bytes, &image.filename)?;
        let outcome = self.predictor.predict_single(&image.bytes).await?;
        info!(weight = outcome.weight, height = ?outcome.height, "prediction complete");

        let record = EstimationRecord::new(
            outcome.height.unwrap_or_default(),
            outcome.weight,
            outcome.confidence,
            vec![path.display().to_string()],
        );
        self.persist_estimation(record, self.upload_durability)
    }

    /// Fetch one estimation record by id.
    pub fn get_estimation(&self, id: &str) -> Result<EstimationRecord> {
        self.estimations.get(id)
    }

    /// Page of estimation records, newest first. `limit <= 0` is unbounded.
    pub fn list_estimations(&self, limit: i64, offset: usize) -> Result<Vec<EstimationRecord>> {
        self.estimations.list(limit, offset)
    }

    /// Delete an estimation record, then clean up its artifacts.
    ///
    /// Record deletion is authoritative; artifact removal afterwards is
    /// best-effort and never fails the operation.
    pub fn delete_estimation(&self, id: &str) -> Result<()> {
        let record = self.estimations.get(id)?;
        self.estimations.delete(id)?;
        for path in &record.image_paths {
            self.artifacts.delete(path);
        }
        info!(id, "estimation deleted");
        Ok(())
    }

    /// Store a ground-truth training contribution.
    ///
    /// The sample never feeds back into prediction; it is only listed and
    /// exported for training collaborators. Persistence is always fatal on
    /// failure here since the stored sample is the whole point.
    pub async fn save_training_sample(
        &self,
        front: ImageUpload,
        side: ImageUpload,
        height_raw: Option<&str>,
        actual_weight_raw: Option<&str>,
    ) -> Result<TrainingSample> {
        self.validator.validate(&front)?;
        self.validator.validate(&side)?;
        let height = parse_height(height_raw)?;
        let actual_weight = parse_weight(actual_weight_raw)?;

        let front_path = self.training_artifacts.save(&front.bytes, &front.filename)?;
        let side_path = self.training_artifacts.save(&side.bytes, &side.filename)?;

        let sample = TrainingSample::new(
            height,
            actual_weight,
            front_path.display().to_string(),
            side_path.display().to_string(),
        );
        let sample = self.training.insert(sample)?;
        info!(id = %sample.id, "training sample stored");
        Ok(sample)
    }

    /// Page of training samples, newest first.
    pub fn list_training_samples(&self, limit: i64) -> Result<Vec<TrainingSample>> {
        self.training.list(limit)
    }

    /// Every training sample, for export to training collaborators.
    pub fn export_training_samples(&self) -> Result<Vec<TrainingSample>> {
        self.training.export()
    }

    fn persist_estimation(
        &self,
        record: EstimationRecord,
        policy: DurabilityPolicy,
    ) -> Result<EstimationRecord> {
        match self.estimations.insert(record.clone()) {
            Ok(inserted) => Ok(inserted),
            Err(err) => match policy {
                DurabilityPolicy::FailFast => Err(err),
                DurabilityPolicy::BestEffort => {
                    warn!("failed to persist estimation record, returning computed result: {err}");
                    Ok(record)
                }
            },
        }
    }
}
