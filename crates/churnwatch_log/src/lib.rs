pub mod error;
pub mod log;

pub use error::LogError;
pub use log::ProductionLog;
