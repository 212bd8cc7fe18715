// Dependency compliance classification
// Parses Maven dependency report lines and checks them against the CQ approval tables

pub mod classifier;
pub mod error;
pub mod models;
pub mod parsers;
pub mod tables;

pub use classifier::{Classifier, MalformedPolicy, SpecialCaseRule, TrustMode, TrustPolicy};
pub use error::{CoordinateError, Result};
pub use models::{ClassificationRecord, ClassificationSummary, Coordinate, CqStatus, Scope};
pub use parsers::{parse_coordinate, parse_report_line, LineOutcome, DEFAULT_MARKER};
pub use tables::{ApprovalTable, ApprovalTables};
