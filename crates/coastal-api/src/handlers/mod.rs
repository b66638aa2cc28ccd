mod analyze;
mod export;
mod health;

pub use analyze::handle_analyze;
pub use export::{cancel_export, get_export_status, start_export};
pub use health::health_check;
