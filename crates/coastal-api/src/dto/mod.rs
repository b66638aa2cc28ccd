mod request;
mod response;

pub use request::{AnalyzeRequest, ExportStartRequest};
pub use response::{
    AnalyzeResponse, CancelResponse, ExportStartResponse, ExportStatusResponse, HealthResponse,
    LegendEntry,
};
