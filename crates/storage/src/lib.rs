//! # Storage Crate
//!
//! Durable storage for the weight estimation service.
//!
//! ## Main Components
//!
//! - **artifacts**: `ArtifactStore` for opaque image payloads, with
//!   collision-resistant naming and best-effort deletion
//! - **documents**: filesystem document store (one JSON document per
//!   record, one directory per collection)
//! - **gateway**: typed repositories bound to the `estimations` and
//!   `training_data` collections
//!
//! ## Example Usage
//!
//! ```ignore
//! use storage::{ArtifactStore, DocumentStore, EstimationRepo};
//!
//! let artifacts = ArtifactStore::new("./uploads");
//! let path = artifacts.save(&bytes, "front.jpg")?;
//!
//! let store = DocumentStore::new("./data");
//! let estimations = EstimationRepo::new(&store);
//! let record = estimations.insert(record)?;
//! ```

pub mod artifacts;
pub mod documents;
pub mod gateway;

// Re-export main types
pub use artifacts::ArtifactStore;
pub use documents::{Collection, Document, DocumentStore};
pub use gateway::{EstimationRepo, TrainingRepo, ESTIMATIONS, TRAINING_DATA};
