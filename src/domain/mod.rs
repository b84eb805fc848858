// Domain layer - Pure models and classification rules
pub mod dashboard;
pub mod evidence;
pub mod query_mode;
pub mod severity;
pub mod telemetry;
