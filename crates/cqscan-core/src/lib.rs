// Scan driver, configuration and report output for cqscan
pub mod config;
pub mod error;
pub mod export;
pub mod scan;

pub use config::Config;
pub use error::Error;
pub use export::{Exporter, ReportFormat};
pub use scan::{scan_file, scan_str, ScanReport};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
