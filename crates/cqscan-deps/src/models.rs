use serde::{Deserialize, Serialize};
use std::fmt;

/// Maven dependency scopes we care about for compliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Compile,  // shipped with the product
    Test,     // test classpath only
    Provided, // supplied by the container at runtime
}

impl Scope {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "compile" => Some(Scope::Compile),
            "test" => Some(Scope::Test),
            "provided" => Some(Scope::Provided),
            _ => None,
        }
    }

    pub fn all() -> Vec<Scope> {
        vec![Scope::Compile, Scope::Test, Scope::Provided]
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Compile => write!(f, "compile"),
            Scope::Test => write!(f, "test"),
            Scope::Provided => write!(f, "provided"),
        }
    }
}

/// A parsed `group:artifact:packaging[:classifier]:version:scope` coordinate
///
/// Only constructed through the tokenizer in `parsers`, so it always has at
/// least three non-empty components and a recognized scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    raw: String,
    parts: Vec<String>,
    scope: Scope,
}

impl Coordinate {
    pub(crate) fn new(raw: &str, parts: Vec<String>, scope: Scope) -> Self {
        Self {
            raw: raw.to_string(),
            parts,
            scope,
        }
    }

    pub fn group(&self) -> &str {
        &self.parts[0]
    }

    pub fn artifact(&self) -> &str {
        &self.parts[1]
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Everything except version and scope, e.g. `org.foo:bar:jar`
    pub fn group_artifact_packaging(&self) -> String {
        self.parts[..self.parts.len() - 2].join(":")
    }

    /// Everything except the scope, e.g. `org.foo:bar:jar:1.0`
    pub fn group_artifact_packaging_version(&self) -> String {
        self.parts[..self.parts.len() - 1].join(":")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Compliance status of a single dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CqStatus {
    /// No approval on record, needs manual review
    #[serde(rename = "CQ_MISSING")]
    Missing,
    /// Belongs to a trusted organization
    #[serde(rename = "CQ_OK_ECLIPSE")]
    OkEclipse,
    /// Known special case with its own sentinel reference
    #[serde(rename = "CQ_BATIK")]
    Batik,
    /// Artifact family approved, but not this version
    #[serde(rename = "CQ_BAD_VERSION")]
    BadVersion,
    /// Exact version approved
    #[serde(rename = "CQ_OK")]
    Ok,
    /// Coordinate could not be parsed
    #[serde(rename = "CQ_MALFORMED")]
    Malformed,
}

impl CqStatus {
    pub fn tag(&self) -> &'static str {
        match self {
            CqStatus::Missing => "CQ_MISSING",
            CqStatus::OkEclipse => "CQ_OK_ECLIPSE",
            CqStatus::Batik => "CQ_BATIK",
            CqStatus::BadVersion => "CQ_BAD_VERSION",
            CqStatus::Ok => "CQ_OK",
            CqStatus::Malformed => "CQ_MALFORMED",
        }
    }

    pub fn all() -> [CqStatus; 6] {
        [
            CqStatus::Ok,
            CqStatus::OkEclipse,
            CqStatus::Batik,
            CqStatus::BadVersion,
            CqStatus::Missing,
            CqStatus::Malformed,
        ]
    }
}

impl fmt::Display for CqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One output row of the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub short_name: String,
    pub status: CqStatus,
    pub coordinate: String,
    pub reference: String,
    pub line: usize, // 1-based line in the input report
}

impl fmt::Display for ClassificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reference may be empty; the trailing separator stays so columns line up for cut/awk
        write!(
            f,
            "{} {} {} {}",
            self.short_name, self.status, self.coordinate, self.reference
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub total_count: usize,
    pub ok_count: usize,
    pub ok_eclipse_count: usize,
    pub batik_count: usize,
    pub bad_version_count: usize,
    pub missing_count: usize,
    pub malformed_count: usize,
}

impl ClassificationSummary {
    pub fn new(records: &[ClassificationRecord]) -> Self {
        let count = |status: CqStatus| records.iter().filter(|r| r.status == status).count();

        Self {
            total_count: records.len(),
            ok_count: count(CqStatus::Ok),
            ok_eclipse_count: count(CqStatus::OkEclipse),
            batik_count: count(CqStatus::Batik),
            bad_version_count: count(CqStatus::BadVersion),
            missing_count: count(CqStatus::Missing),
            malformed_count: count(CqStatus::Malformed),
        }
    }

    pub fn count_for(&self, status: CqStatus) -> usize {
        match status {
            CqStatus::Ok => self.ok_count,
            CqStatus::OkEclipse => self.ok_eclipse_count,
            CqStatus::Batik => self.batik_count,
            CqStatus::BadVersion => self.bad_version_count,
            CqStatus::Missing => self.missing_count,
            CqStatus::Malformed => self.malformed_count,
        }
    }

    /// Records that still need someone to look at them
    pub fn needs_review(&self) -> usize {
        self.bad_version_count + self.missing_count + self.malformed_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: CqStatus) -> ClassificationRecord {
        ClassificationRecord {
            short_name: "thing".to_string(),
            status,
            coordinate: "some.unknown:thing:jar:1.0".to_string(),
            reference: String::new(),
            line: 1,
        }
    }

    #[test]
    fn test_scope_from_suffix() {
        assert_eq!(Scope::from_suffix("compile"), Some(Scope::Compile));
        assert_eq!(Scope::from_suffix("provided"), Some(Scope::Provided));
        assert_eq!(Scope::from_suffix("runtime"), None);
        assert_eq!(Scope::from_suffix("Compile"), None);
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(CqStatus::Ok.to_string(), "CQ_OK");
        assert_eq!(CqStatus::BadVersion.to_string(), "CQ_BAD_VERSION");
        assert_eq!(
            serde_json::to_string(&CqStatus::OkEclipse).unwrap(),
            "\"CQ_OK_ECLIPSE\""
        );
    }

    #[test]
    fn test_record_display_keeps_empty_reference_column() {
        let line = record(CqStatus::Missing).to_string();
        assert_eq!(line, "thing CQ_MISSING some.unknown:thing:jar:1.0 ");
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            record(CqStatus::Ok),
            record(CqStatus::Ok),
            record(CqStatus::Missing),
            record(CqStatus::BadVersion),
        ];
        let summary = ClassificationSummary::new(&records);
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.ok_count, 2);
        assert_eq!(summary.count_for(CqStatus::Missing), 1);
        assert_eq!(summary.needs_review(), 2);
    }
}
