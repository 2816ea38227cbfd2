//! Weight estimation API server.
//!
//! Wires the estimation pipeline behind an actix-web application: a
//! health endpoint plus the estimation and training-contribution routes,
//! all under the `/api` scope, every response shaped by the single
//! envelope formatter.
//!
//! ## Submodules
//!
//! - [`orchestrator`] — the estimation request pipeline
//! - [`handlers`] — thin HTTP handlers over the orchestrator
//! - [`envelope`] — uniform response envelope and status mapping
//! - [`multipart`] — inbound multipart form collection
//! - [`config`] — environment-driven configuration

pub mod config;
pub mod envelope;
pub mod handlers;
pub mod multipart;
pub mod orchestrator;

// Re-export main types
pub use config::AppConfig;
pub use envelope::Envelope;
pub use orchestrator::{DurabilityPolicy, EstimationOrchestrator};

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use tracing::info;

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Route table, shared by the real server and the test harness.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .route("/estimate-weight", web::post().to(handlers::estimate_weight))
            .route("/upload", web::post().to(handlers::upload_image))
            .route("/estimations", web::get().to(handlers::list_estimations))
            .route("/estimate/{id}", web::get().to(handlers::get_estimation))
            .route("/estimate/{id}", web::delete().to(handlers::delete_estimation))
            .route("/training-data", web::post().to(handlers::save_training_sample))
            .route("/training-data", web::get().to(handlers::list_training_samples))
            .route(
                "/training-data/export",
                web::get().to(handlers::export_training_samples),
            ),
    );
}

/// Build the pipeline from the configuration and serve it until shutdown.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let orchestrator = EstimationOrchestrator::from_config(&config)?;
    if config.predictor.base_url.is_none() || config.predictor.force_fallback {
        info!("no predictor endpoint configured, running in fallback mode");
    } else {
        info!(url = ?config.predictor.base_url, "using remote predictor");
    }

    let orchestrator = web::Data::new(orchestrator);
    let bind_addr = config.bind_addr.clone();
    info!("starting weight estimation server on {bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(orchestrator.clone())
            .configure(routes)
    })
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {bind_addr}"))?
    .run()
    .await
    .context("server terminated abnormally")
}
