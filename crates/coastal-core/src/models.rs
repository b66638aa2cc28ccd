pub mod classify;
pub mod collection;
pub mod export;
pub mod geometry;

pub use classify::{
    ClassifierSpec, LandCoverClass, TrainingRegion, TrainingSpec, VisParams, CLASS_PALETTE,
    LABEL_PROPERTY, SPECTRAL_BANDS,
};
pub use collection::{
    is_clear_pixel, CloudMask, CollectionQuery, ImageRef, YearRange, LANDSAT_COLLECTION,
    MAX_YEAR, MIN_YEAR,
};
pub use export::{ExportId, ExportRequest, ExportStatus, RasterFormat, TaskState};
pub use geometry::{Geometry, GeometryType};
