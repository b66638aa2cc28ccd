//! Error types for the coastal analysis service

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoastalError {
    // Authentication errors
    #[error("Authentication failed for project '{project}': {reason}")]
    AuthenticationFailed { project: String, reason: String },

    // Input validation errors
    #[error("No region drawn. Draw a polygon on the map and try again")]
    MissingGeometry,

    #[error("Unsupported geometry type '{found}'. Draw a polygon")]
    UnsupportedGeometry { found: String },

    #[error("Invalid polygon ring: {reason}")]
    InvalidRing { reason: String },

    #[error("Year {year} is outside the Landsat 8 archive range {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Invalid year range: start year {start} is after end year {end}")]
    InvalidYearRange { start: i32, end: i32 },

    // Classifier errors
    #[error("Classification failed: {reason}")]
    ClassificationFailed { reason: String },

    #[error("Training set is empty: at least one labeled region is required")]
    EmptyTrainingSet,

    // Export errors
    #[error("Export job not found: {id}")]
    ExportNotFound { id: String },

    #[error("Export job {id} already reached a terminal state")]
    ExportAlreadyFinished { id: String },

    // Remote service errors
    #[error("Imagery engine unavailable: {reason}. Try: {remediation}")]
    EngineUnavailable { reason: String, remediation: String },

    #[error("Remote fault during {operation}: {message}")]
    RemoteFault { operation: String, message: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoastalError>;
