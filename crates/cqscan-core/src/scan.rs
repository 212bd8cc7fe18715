use crate::{Error, Result};
use chrono::{DateTime, Utc};
use cqscan_deps::{ClassificationRecord, ClassificationSummary, Classifier};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Result of classifying one dependency report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Where the lines came from (file path, or a label for in-memory input)
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ClassificationSummary,
    pub records: Vec<ClassificationRecord>,
}

impl ScanReport {
    pub fn new(source: impl Into<String>, records: Vec<ClassificationRecord>) -> Self {
        Self {
            source: source.into(),
            generated_at: Utc::now(),
            summary: ClassificationSummary::new(&records),
            records,
        }
    }
}

/// Classify a dependency report file
pub fn scan_file<P: AsRef<Path>>(path: P, classifier: &Classifier) -> Result<ScanReport> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    // Maven output isn't always UTF-8 (Latin-1 project names on Windows);
    // a bad byte only spoils its own line, which is usually chatter anyway
    let bytes = std::fs::read(path)?;
    let contents = String::from_utf8_lossy(&bytes);
    if matches!(contents, std::borrow::Cow::Owned(_)) {
        warn!("{} is not valid UTF-8, invalid bytes were replaced", path.display());
    }

    scan_str(&path.display().to_string(), &contents, classifier)
}

/// Classify report text that is already in memory
pub fn scan_str(source: &str, contents: &str, classifier: &Classifier) -> Result<ScanReport> {
    let records = classifier.classify_report(contents)?;
    let report = ScanReport::new(source, records);

    info!(
        "Classified {} dependencies from {} ({} need review)",
        report.summary.total_count,
        source,
        report.summary.needs_review()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqscan_deps::{CqStatus, MalformedPolicy};

    #[test]
    fn test_scan_str_summarizes() {
        let text = "[INFO]    some.unknown:thing:jar:1.0:compile\n\
                    [INFO]    junit:junit:jar:4.12:test\n";
        let report = scan_str("inline", text, &Classifier::default()).unwrap();

        assert_eq!(report.source, "inline");
        assert_eq!(report.summary.total_count, 2);
        assert_eq!(report.summary.ok_count, 1);
        assert_eq!(report.records[0].status, CqStatus::Missing);
    }

    #[test]
    fn test_missing_file() {
        let err = scan_file("/definitely/not/here/deps.txt", &Classifier::default()).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn test_abort_on_malformed_propagates() {
        let classifier = Classifier::default().with_malformed_policy(MalformedPolicy::Abort);
        let err = scan_str("inline", "[INFO] broken:compile\n", &classifier).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }
}
