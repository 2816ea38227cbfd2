//! Prediction client for the external weight estimation service.
//!
//! This crate talks to the configured prediction endpoint over HTTP
//! multipart and maps its JSON responses into `PredictionOutcome`. It
//! handles:
//! - Request building for the two-image and legacy single-image contracts
//! - A fixed 30-second timeout and bounded retry with exponential backoff
//! - Error mapping for transport failures, non-success statuses, and
//!   error fields embedded in an otherwise well-formed response
//! - A deterministic local fallback when no endpoint is configured
//!
//! The fallback exists so the pipeline is testable and operable without
//! the external service. It is not a statistical estimator and its
//! arithmetic is frozen; see `fallback`.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use records::{PredictionOutcome, ServiceError};

pub mod fallback;

/// Default timeout applied to every outbound prediction call
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// Errors that can occur when interacting with the prediction service
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("failed to build prediction client: {0}")]
    Build(String),

    #[error("failed to reach prediction service: {0}")]
    Transport(String),

    #[error("prediction service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("prediction service reported: {0}")]
    ErrorField(String),

    #[error("invalid response from prediction service: {0}")]
    InvalidResponse(String),
}

impl PredictorError {
    /// Transport failures and server-side statuses are worth retrying;
    /// client errors and embedded error fields are not.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<PredictorError> for ServiceError {
    fn from(err: PredictorError) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}

/// Wire shape of the prediction service's JSON response
#[derive(Debug, Deserialize)]
struct PredictorResponse {
    height: Option<f64>,
    weight: Option<f64>,
    confidence: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

/// Configuration for the prediction client, injected at construction and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Base URL of the prediction service; `None` selects fallback mode
    pub base_url: Option<String>,
    /// Explicit override forcing fallback mode even with an endpoint set
    pub force_fallback: bool,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            force_fallback: false,
            timeout: PREDICT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl PredictorConfig {
    pub fn remote(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    pub fn local_fallback() -> Self {
        Self::default()
    }
}

/// Client for the external prediction service.
///
/// One mode is selected at construction: remote when a base URL is
/// configured (and fallback is not forced), deterministic local fallback
/// otherwise.
#[derive(Debug, Clone)]
pub struct PredictorClient {
    http: reqwest::Client,
    config: PredictorConfig,
}

impl PredictorClient {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `PredictorError::Build` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: PredictorConfig) -> Result<Self, PredictorError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| PredictorError::Build(err.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn is_fallback(&self) -> bool {
        self.config.force_fallback || self.config.base_url.is_none()
    }

    /// Two-image prediction: both images plus the measured height.
    ///
    /// Remote mode posts multipart fields `front_image`, `side_image` and
    /// `height` and passes weight/confidence through exactly as reported.
    ///
    /// # Errors
    ///
    /// Returns `PredictorError` when the service is unreachable after
    /// retries, answers with a non-success status, or embeds an error
    /// field in its response.
    pub async fn predict_pair(
        &self,
        front: &[u8],
        side: &[u8],
        height: f64,
    ) -> Result<PredictionOutcome, PredictorError> {
        if self.is_fallback() {
            warn!("no prediction endpoint configured, using deterministic fallback");
            return Ok(fallback::pair(height, front.len(), side.len()));
        }

        let url = self.endpoint();
        info!(url = %url, height, "requesting weight prediction");

        let response = (|| async {
            let form = reqwest::multipart::Form::new()
                .part(
                    "front_image",
                    reqwest::multipart::Part::bytes(front.to_vec()).file_name("front_image.jpg"),
                )
                .part(
                    "side_image",
                    reqwest::multipart::Part::bytes(side.to_vec()).file_name("side_image.jpg"),
                )
                .text("height", height.to_string());
            self.send(&url, form).await
        })
        .retry(&self.retry_policy())
        .when(|err: &PredictorError| err.is_retryable())
        .await?;

        let weight = response.weight.ok_or_else(|| {
            PredictorError::InvalidResponse("response carries no weight".into())
        })?;
        debug!(weight, confidence = ?response.confidence, "prediction received");

        Ok(PredictionOutcome {
            height: response.height.or(Some(height)),
            weight,
            confidence: response.confidence,
        })
    }

    /// Legacy single-image prediction; the service estimates height too.
    ///
    /// # Errors
    ///
    /// Same failure mapping as [`predict_pair`](Self::predict_pair).
    pub async fn predict_single(
        &self,
        image: &[u8],
    ) -> Result<PredictionOutcome, PredictorError> {
        if self.is_fallback() {
            warn!("no prediction endpoint configured, using deterministic fallback");
            return Ok(fallback::single(image.len()));
        }

        let url = self.endpoint();
        info!(url = %url, "requesting single-image prediction");

        let response = (|| async {
            let form = reqwest::multipart::Form::new().part(
                "image",
                reqwest::multipart::Part::bytes(image.to_vec()).file_name("image.jpg"),
            );
            self.send(&url, form).await
        })
        .retry(&self.retry_policy())
        .when(|err: &PredictorError| err.is_retryable())
        .await?;

        let weight = response.weight.ok_or_else(|| {
            PredictorError::InvalidResponse("response carries no weight".into())
        })?;

        Ok(PredictionOutcome {
            height: response.height,
            weight,
            confidence: response.confidence,
        })
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or_default();
        format!("{}/predict", base.trim_end_matches('/'))
    }

    fn retry_policy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_max_times(self.config.max_retries)
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(2))
    }

    /// One attempt: post the form, check the status, decode the body, and
    /// surface any embedded error field.
    async fn send(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> Result<PredictorResponse, PredictorError> {
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| PredictorError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: PredictorResponse = response
            .json()
            .await
            .map_err(|err| PredictorError::InvalidResponse(err.to_string()))?;

        if let Some(message) = decoded.error.as_deref().filter(|m| !m.is_empty()) {
            return Err(PredictorError::ErrorField(message.to_string()));
        }

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};

    // ============================================================================
    // Mock prediction service
    // ============================================================================

    async fn predict_ok(_body: web::Bytes) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "height": 176.0,
            "weight": 71.4,
            "confidence": 0.93
        }))
    }

    async fn predict_unavailable(_body: web::Bytes) -> HttpResponse {
        HttpResponse::ServiceUnavailable().body("model not loaded")
    }

    async fn predict_embedded_error(_body: web::Bytes) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "error": "no person detected in image"
        }))
    }

    /// Start a mock predictor on a random port and return its base URL.
    ///
    /// Mirrors the pattern of binding a throwaway upstream to 127.0.0.1:0
    /// so tests exercise the real HTTP path.
    macro_rules! start_mock {
        ($handler:ident) => {{
            let server = HttpServer::new(|| {
                App::new().route("/predict", web::post().to($handler))
            })
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .expect("failed to bind mock predictor");
            let addr = server.addrs()[0];
            actix_web::rt::spawn(server.run());
            format!("http://{addr}")
        }};
    }

    fn remote_client(base: &str, retries: usize) -> PredictorClient {
        let mut config = PredictorConfig::remote(base);
        config.max_retries = retries;
        PredictorClient::new(config).unwrap()
    }

    // ============================================================================
    // Fallback mode
    // ============================================================================

    #[tokio::test]
    async fn test_fallback_pair_matches_frozen_formula() {
        let client = PredictorClient::new(PredictorConfig::local_fallback()).unwrap();

        let front = vec![0u8; 12_000];
        let side = vec![0u8; 15_000];
        let outcome = client.predict_pair(&front, &side, 175.5).await.unwrap();

        assert!((outcome.weight - 67.95).abs() < 1e-9);
        assert_eq!(outcome.height, Some(175.5));
        assert_eq!(outcome.confidence, None);
    }

    #[tokio::test]
    async fn test_fallback_pair_is_deterministic() {
        let client = PredictorClient::new(PredictorConfig::local_fallback()).unwrap();

        let front = vec![7u8; 1_234];
        let side = vec![9u8; 5_678];
        let first = client.predict_pair(&front, &side, 168.0).await.unwrap();
        let second = client.predict_pair(&front, &side, 168.0).await.unwrap();

        assert_eq!(first.weight, second.weight);
    }

    #[tokio::test]
    async fn test_force_fallback_overrides_endpoint() {
        let mut config = PredictorConfig::remote("http://127.0.0.1:1");
        config.force_fallback = true;
        let client = PredictorClient::new(config).unwrap();

        // Would fail with a transport error if the endpoint were contacted
        let outcome = client.predict_single(&[0u8; 100]).await.unwrap();
        assert!(outcome.weight > 0.0);
    }

    #[tokio::test]
    async fn test_fallback_single_is_deterministic() {
        let client = PredictorClient::new(PredictorConfig::local_fallback()).unwrap();

        let image = vec![1u8; 4_321];
        let first = client.predict_single(&image).await.unwrap();
        let second = client.predict_single(&image).await.unwrap();

        assert_eq!(first, second);
        assert!(first.height.is_some());
    }

    // ============================================================================
    // Remote mode
    // ============================================================================

    #[actix_web::test]
    async fn test_remote_success_passes_values_through() {
        let base = start_mock!(predict_ok);
        let client = remote_client(&base, 0);
        let outcome = client.predict_pair(b"front", b"side", 175.5).await.unwrap();

        assert_eq!(outcome.weight, 71.4);
        assert_eq!(outcome.height, Some(176.0));
        assert_eq!(outcome.confidence, Some(0.93));
    }

    #[actix_web::test]
    async fn test_remote_error_status_is_upstream_error() {
        let base = start_mock!(predict_unavailable);
        let client = remote_client(&base, 0);
        let err = client.predict_pair(b"f", b"s", 170.0).await.unwrap_err();

        assert!(matches!(err, PredictorError::Status { status: 503, .. }));
        let service_err: ServiceError = err.into();
        assert!(matches!(service_err, ServiceError::Upstream(_)));
    }

    #[actix_web::test]
    async fn test_remote_embedded_error_field_is_surfaced() {
        let base = start_mock!(predict_embedded_error);
        let client = remote_client(&base, 0);
        let err = client.predict_single(b"image").await.unwrap_err();

        assert!(matches!(err, PredictorError::ErrorField(_)));
        assert!(err.to_string().contains("no person detected"));
    }

    #[tokio::test]
    async fn test_remote_unreachable_is_transport_error() {
        // Port 1 is never listening; fail fast with no retries
        let client = remote_client("http://127.0.0.1:1", 0);
        let err = client.predict_pair(b"f", b"s", 170.0).await.unwrap_err();

        assert!(matches!(err, PredictorError::Transport(_)));
    }

    #[test]
    fn test_retry_classification() {
        assert!(PredictorError::Transport("refused".into()).is_retryable());
        assert!(PredictorError::Status {
            status: 500,
            body: String::new()
        }
        .is_retryable());
        assert!(!PredictorError::Status {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(!PredictorError::ErrorField("bad image".into()).is_retryable());
    }
}
