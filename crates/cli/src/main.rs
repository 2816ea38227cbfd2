//! weighctl - operator tool for the weight estimation service.
//!
//! Runs the same pipeline as the server against the locally configured
//! stores, so records can be inspected, cleaned up, and exported without
//! going through HTTP. With no `PREDICTOR_URL` configured, `estimate`
//! uses the deterministic fallback.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use records::ImageUpload;
use server::{AppConfig, EstimationOrchestrator};

/// Weight estimation service - operator CLI
#[derive(Parser)]
#[command(name = "weighctl")]
#[command(about = "Inspect and exercise the weight estimation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored estimation records, newest first
    List {
        /// Number of records to show (0 for all)
        #[arg(long, default_value = "10")]
        limit: i64,

        /// Records to skip from the newest end
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Show one estimation record by id
    Show {
        #[arg(long)]
        id: String,
    },

    /// Delete an estimation record and its artifacts
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Export all training samples as JSON
    ExportTraining {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run a weight estimation from two local image files
    Estimate {
        /// Front-view image path
        #[arg(long)]
        front: PathBuf,

        /// Side-view image path
        #[arg(long)]
        side: PathBuf,

        /// Height in centimeters
        #[arg(long)]
        height: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env();
    let orchestrator = EstimationOrchestrator::from_config(&config)
        .context("Failed to build the estimation pipeline")?;

    match cli.command {
        Commands::List { limit, offset } => handle_list(&orchestrator, limit, offset)?,
        Commands::Show { id } => handle_show(&orchestrator, &id)?,
        Commands::Delete { id } => handle_delete(&orchestrator, &id)?,
        Commands::ExportTraining { out } => handle_export(&orchestrator, out.as_deref())?,
        Commands::Estimate {
            front,
            side,
            height,
        } => handle_estimate(&orchestrator, &front, &side, height).await?,
    }

    Ok(())
}

/// Handle the 'list' command
fn handle_list(orchestrator: &EstimationOrchestrator, limit: i64, offset: usize) -> Result<()> {
    let records = orchestrator
        .list_estimations(limit, offset)
        .context("Failed to list estimations")?;

    if records.is_empty() {
        println!("No estimation records stored.");
        return Ok(());
    }

    println!("{}", "Estimation records:".bold().blue());
    for record in &records {
        let when = record
            .created_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{} {}  height {:.1} cm  weight {:.2} kg  ({})",
            "•".green(),
            record.id,
            record.height,
            record.weight,
            when
        );
    }
    Ok(())
}

/// Handle the 'show' command
fn handle_show(orchestrator: &EstimationOrchestrator, id: &str) -> Result<()> {
    let record = orchestrator
        .get_estimation(id)
        .with_context(|| format!("No estimation with id {id}"))?;

    println!("{}", format!("Estimation {}", record.id).bold().blue());
    println!("{} Height: {:.1} cm", "•".green(), record.height);
    println!("{} Weight: {:.2} kg", "•".green(), record.weight);
    if let Some(accuracy) = record.accuracy {
        println!("{} Confidence: {:.2}", "•".green(), accuracy);
    }
    for path in &record.image_paths {
        println!("{} Artifact: {}", "•".cyan(), path);
    }
    if let Some(at) = record.created_at {
        println!("{} Created: {}", "•".cyan(), at.to_rfc3339());
    }
    Ok(())
}

/// Handle the 'delete' command
fn handle_delete(orchestrator: &EstimationOrchestrator, id: &str) -> Result<()> {
    orchestrator
        .delete_estimation(id)
        .with_context(|| format!("Failed to delete estimation {id}"))?;
    println!("{} Deleted estimation {id}", "✓".green());
    Ok(())
}

/// Handle the 'export-training' command
fn handle_export(orchestrator: &EstimationOrchestrator, out: Option<&Path>) -> Result<()> {
    let samples = orchestrator
        .export_training_samples()
        .context("Failed to export training samples")?;

    let json = serde_json::to_string_pretty(&samples)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Exported {} training samples to {}",
                "✓".green(),
                samples.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Handle the 'estimate' command
async fn handle_estimate(
    orchestrator: &EstimationOrchestrator,
    front: &Path,
    side: &Path,
    height: f64,
) -> Result<()> {
    let front_upload = read_upload(front)?;
    let side_upload = read_upload(side)?;

    let weight = orchestrator
        .estimate_weight(front_upload, side_upload, Some(&height.to_string()))
        .await
        .context("Estimation failed")?;

    println!(
        "{} Estimated weight for height {:.1} cm: {}",
        "✓".green(),
        height,
        format!("{weight:.2} kg").bold()
    );
    Ok(())
}

fn read_upload(path: &Path) -> Result<ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.jpg")
        .to_string();
    Ok(ImageUpload::new(filename, bytes))
}
