//! HTTP handlers for the estimation API.
//!
//! Handlers are thin: collect the multipart form, hand it to the
//! orchestrator, and shape the outcome through the envelope module. All
//! branching and failure handling lives in the pipeline itself.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use records::{EstimationRecord, TrainingSample};

use crate::envelope::respond;
use crate::multipart::collect_form;
use crate::orchestrator::EstimationOrchestrator;

// =============================================================================
// Response DTOs
// =============================================================================

#[derive(Debug, Serialize)]
struct WeightData {
    weight: f64,
}

/// Client-facing view of an estimation record
#[derive(Debug, Serialize)]
pub struct EstimationResult {
    pub id: String,
    pub height: f64,
    pub weight: f64,
    pub accuracy: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&EstimationRecord> for EstimationResult {
    fn from(record: &EstimationRecord) -> Self {
        Self {
            id: record.id.clone(),
            height: record.height,
            weight: record.weight,
            accuracy: record.accuracy.unwrap_or(0.0),
            created_at: record.created_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSampleSaved {
    id: String,
    height: f64,
    actual_weight: f64,
    created_at: DateTime<Utc>,
}

impl From<&TrainingSample> for TrainingSampleSaved {
    fn from(sample: &TrainingSample) -> Self {
        Self {
            id: sample.id.clone(),
            height: sample.height,
            actual_weight: sample.actual_weight,
            created_at: sample.created_at.unwrap_or_default(),
        }
    }
}

/// Export shape consumed by the model training tooling
#[derive(Debug, Serialize)]
struct TrainingExportEntry {
    front_image_path: String,
    side_image_path: String,
    height: f64,
    actual_weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    limit: Option<i64>,
    offset: Option<usize>,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/estimate-weight
pub async fn estimate_weight(
    orchestrator: web::Data<EstimationOrchestrator>,
    payload: Multipart,
) -> HttpResponse {
    let result = async {
        let mut form = collect_form(payload, orchestrator.max_file_bytes()).await?;
        let front = form.take_file("front_image")?;
        let side = form.take_file("side_image")?;
        let height = form.text("height").map(str::to_string);
        orchestrator
            .estimate_weight(front, side, height.as_deref())
            .await
    }
    .await;

    respond(
        result.map(|weight| WeightData { weight }),
        Some("weight estimated successfully"),
    )
}

/// POST /api/upload (legacy single-image path)
pub async fn upload_image(
    orchestrator: web::Data<EstimationOrchestrator>,
    payload: Multipart,
) -> HttpResponse {
    let result = async {
        let mut form = collect_form(payload, orchestrator.max_file_bytes()).await?;
        let image = form.take_file("image")?;
        orchestrator.upload_single(image).await
    }
    .await;

    respond(result.map(|record| EstimationResult::from(&record)), None)
}

/// GET /api/estimate/{id}
pub async fn get_estimation(
    orchestrator: web::Data<EstimationOrchestrator>,
    id: web::Path<String>,
) -> HttpResponse {
    let result = orchestrator
        .get_estimation(&id)
        .map(|record| EstimationResult::from(&record));
    respond(result, None)
}

/// GET /api/estimations
pub async fn list_estimations(
    orchestrator: web::Data<EstimationOrchestrator>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(10);
    let offset = query.offset.unwrap_or(0);

    let result = orchestrator.list_estimations(limit, offset).map(|records| {
        records
            .iter()
            .map(EstimationResult::from)
            .collect::<Vec<_>>()
    });
    respond(result, None)
}

/// DELETE /api/estimate/{id}
pub async fn delete_estimation(
    orchestrator: web::Data<EstimationOrchestrator>,
    id: web::Path<String>,
) -> HttpResponse {
    let id = id.into_inner();
    let result = orchestrator
        .delete_estimation(&id)
        .map(|()| serde_json::json!({ "id": id }));
    respond(result, Some("estimation deleted successfully"))
}

/// POST /api/training-data
pub async fn save_training_sample(
    orchestrator: web::Data<EstimationOrchestrator>,
    payload: Multipart,
) -> HttpResponse {
    let result = async {
        let mut form = collect_form(payload, orchestrator.max_file_bytes()).await?;
        let front = form.take_file("front_image")?;
        let side = form.take_file("side_image")?;
        let height = form.text("height").map(str::to_string);
        let actual_weight = form.text("actual_weight").map(str::to_string);
        orchestrator
            .save_training_sample(front, side, height.as_deref(), actual_weight.as_deref())
            .await
    }
    .await;

    respond(
        result.map(|sample| TrainingSampleSaved::from(&sample)),
        Some("training data saved successfully"),
    )
}

/// GET /api/training-data
pub async fn list_training_samples(
    orchestrator: web::Data<EstimationOrchestrator>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(50);
    respond(orchestrator.list_training_samples(limit), None)
}

/// GET /api/training-data/export
pub async fn export_training_samples(
    orchestrator: web::Data<EstimationOrchestrator>,
) -> HttpResponse {
    let result = orchestrator.export_training_samples().map(|samples| {
        samples
            .into_iter()
            .map(|sample| TrainingExportEntry {
                front_image_path: sample.front_image_path,
                side_image_path: sample.side_image_path,
                height: sample.height,
                actual_weight: sample.actual_weight,
            })
            .collect::<Vec<_>>()
    });
    respond(result, None)
}
