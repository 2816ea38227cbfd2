//! # Records Crate
//!
//! Domain types and the shared error taxonomy for the weight estimation
//! service.
//!
//! ## Main Components
//!
//! - **types**: ephemeral request types and persisted record shapes
//! - **error**: the `ServiceError` taxonomy every pipeline stage reports in
//!
//! Every other crate in the workspace builds on these definitions; nothing
//! here performs I/O.

pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, ServiceError};
pub use types::{
    // Type aliases
    RecordId,
    // Ephemeral types
    EstimationRequest,
    ImageUpload,
    PredictionOutcome,
    // Persisted types
    EstimationRecord,
    TrainingSample,
};
