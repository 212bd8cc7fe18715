use crate::error::{CoordinateError, Result};
use crate::models::{ClassificationRecord, Coordinate, CqStatus, Scope};
use crate::parsers::{parse_report_line, LineOutcome, DEFAULT_MARKER};
use crate::tables::ApprovalTables;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do with dependencies from trusted organizations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustMode {
    /// Tag them `CQ_OK_ECLIPSE`; table matches can still override
    #[default]
    Tag,
    /// Leave them out of the report entirely
    Skip,
}

/// What to do with a candidate line whose coordinate doesn't parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Emit a `CQ_MALFORMED` record and keep going
    #[default]
    Report,
    /// Log it and keep going
    Skip,
    /// Stop the run with an error
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPolicy {
    pub groups: Vec<String>,
    pub mode: TrustMode,
}

impl TrustPolicy {
    /// Group prefixes match on whole segments: `org.eclipse.scout` covers
    /// `org.eclipse.scout.rt` but not `org.eclipse.scoutx`. A trailing `.`
    /// on a configured prefix is ignored.
    pub fn matches(&self, group: &str) -> bool {
        self.groups.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('.');
            !prefix.is_empty()
                && (group == prefix
                    || (group.starts_with(prefix) && group[prefix.len()..].starts_with('.')))
        })
    }
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            groups: vec![
                "org.eclipse.scout".to_string(),
                "org.eclipse.platform".to_string(),
            ],
            mode: TrustMode::default(),
        }
    }
}

/// A named one-off: a vendor family in a legacy packaging with its own reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialCaseRule {
    pub artifact_prefix: String,
    pub packaging_suffix: String,
    pub reference: String,
}

impl SpecialCaseRule {
    pub fn matches(&self, group_artifact_packaging: &str) -> bool {
        group_artifact_packaging.starts_with(&self.artifact_prefix)
            && group_artifact_packaging.ends_with(&self.packaging_suffix)
    }
}

impl Default for SpecialCaseRule {
    fn default() -> Self {
        Self {
            artifact_prefix: "org.apache.xmlgraphics:batik-".to_string(),
            packaging_suffix: ":jar".to_string(),
            reference: "CQ-BATIK-ORBIT".to_string(),
        }
    }
}

/// Classifies dependency report lines against the approval tables
///
/// Classification is pure: the tables and rules are only read.
#[derive(Debug, Clone)]
pub struct Classifier {
    marker: String,
    scopes: Vec<Scope>,
    tables: ApprovalTables,
    trust: TrustPolicy,
    special_case: Option<SpecialCaseRule>,
    on_malformed: MalformedPolicy,
}

impl Classifier {
    pub fn new(tables: ApprovalTables) -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            scopes: Scope::all(),
            tables,
            trust: TrustPolicy::default(),
            special_case: Some(SpecialCaseRule::default()),
            on_malformed: MalformedPolicy::default(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<Scope>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_trust(mut self, trust: TrustPolicy) -> Self {
        self.trust = trust;
        self
    }

    pub fn with_special_case(mut self, rule: Option<SpecialCaseRule>) -> Self {
        self.special_case = rule;
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn tables(&self) -> &ApprovalTables {
        &self.tables
    }

    pub fn malformed_policy(&self) -> MalformedPolicy {
        self.on_malformed
    }

    /// Classify one coordinate
    ///
    /// Returns `None` only when the coordinate belongs to a trusted organization
    /// and trusted dependencies are skipped. The returned record has line 0.
    pub fn classify(&self, coord: &Coordinate) -> Option<ClassificationRecord> {
        let gap = coord.group_artifact_packaging();
        let gapv = coord.group_artifact_packaging_version();

        // Each rule is checked in turn and a later match overrides an earlier one
        let mut status = CqStatus::Missing;
        let mut reference = String::new();

        if self.trust.matches(coord.group()) {
            if self.trust.mode == TrustMode::Skip {
                debug!("Skipping trusted dependency {}", gapv);
                return None;
            }
            status = CqStatus::OkEclipse;
        }

        if let Some(rule) = &self.special_case {
            if rule.matches(&gap) {
                status = CqStatus::Batik;
                reference = rule.reference.clone();
            }
        }

        if let Some(found) = self.tables.unversioned.get(&gap) {
            status = CqStatus::BadVersion;
            reference = found.to_string();
        }

        if let Some(found) = self.tables.versioned.get(&gapv) {
            status = CqStatus::Ok;
            reference = found.to_string();
        }

        Some(ClassificationRecord {
            short_name: coord.artifact().to_string(),
            status,
            coordinate: gapv,
            reference,
            line: 0,
        })
    }

    /// Tokenize and classify a single report line (1-based `line_no`)
    pub fn classify_line(&self, line_no: usize, line: &str) -> Result<Option<ClassificationRecord>> {
        match parse_report_line(line, &self.marker, &self.scopes) {
            Ok(LineOutcome::Skipped) => Ok(None),
            Ok(LineOutcome::Dependency(coord)) => Ok(self.classify(&coord).map(|mut record| {
                debug!("Line {}: {} -> {}", line_no, coord, record.status);
                record.line = line_no;
                record
            })),
            Err(err) => self.handle_malformed(line_no, line, err),
        }
    }

    /// Classify a whole report, keeping input order
    pub fn classify_report(&self, text: &str) -> Result<Vec<ClassificationRecord>> {
        let mut records = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            if let Some(record) = self.classify_line(idx + 1, line)? {
                records.push(record);
            }
        }

        Ok(records)
    }

    fn handle_malformed(
        &self,
        line_no: usize,
        line: &str,
        err: CoordinateError,
    ) -> Result<Option<ClassificationRecord>> {
        match self.on_malformed {
            MalformedPolicy::Abort => Err(err.at_line(line_no)),
            MalformedPolicy::Skip => {
                warn!("Skipping line {}: {} ({})", line_no, err, line.trim());
                Ok(None)
            }
            MalformedPolicy::Report => {
                warn!("Line {}: {} ({})", line_no, err, line.trim());
                let token = err.token().to_string();
                Ok(Some(ClassificationRecord {
                    short_name: token.clone(),
                    status: CqStatus::Malformed,
                    coordinate: token,
                    reference: String::new(),
                    line: line_no,
                }))
            }
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ApprovalTables::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::ApprovalTable;

    const LANG3_CQ: &str = "https://dev.eclipse.org/ipzilla/show_bug.cgi?id=10282";

    fn classify(line: &str) -> Option<ClassificationRecord> {
        Classifier::default().classify_line(1, line).unwrap()
    }

    fn tables(unversioned: Vec<(&str, &str)>, versioned: Vec<(&str, &str)>) -> ApprovalTables {
        ApprovalTables {
            unversioned: ApprovalTable::from_entries("unversioned", unversioned),
            versioned: ApprovalTable::from_entries("versioned", versioned),
        }
    }

    #[test]
    fn test_exact_version_is_ok() {
        let record = classify("[INFO]    org.apache.commons:commons-lang3:jar:3.1:compile").unwrap();
        assert_eq!(
            record.to_string(),
            format!("commons-lang3 CQ_OK org.apache.commons:commons-lang3:jar:3.1 {}", LANG3_CQ)
        );
        assert_eq!(record.line, 1);
    }

    #[test]
    fn test_unknown_version_is_bad_version() {
        let record = classify("[INFO]    org.apache.commons:commons-lang3:jar:9.9:compile").unwrap();
        assert_eq!(
            record.to_string(),
            format!(
                "commons-lang3 CQ_BAD_VERSION org.apache.commons:commons-lang3:jar:9.9 {}",
                LANG3_CQ
            )
        );
    }

    #[test]
    fn test_unknown_artifact_is_missing() {
        let record = classify("[INFO]    some.unknown:thing:jar:1.0:compile").unwrap();
        assert_eq!(record.to_string(), "thing CQ_MISSING some.unknown:thing:jar:1.0 ");
        assert!(record.reference.is_empty());
    }

    #[test]
    fn test_runtime_scope_yields_nothing() {
        assert!(classify("[INFO]    org.apache.commons:commons-lang3:jar:3.1:runtime").is_none());
    }

    #[test]
    fn test_versioned_match_beats_unversioned_entry() {
        let classifier = Classifier::new(tables(
            vec![("org.foo:bar:jar", "family")],
            vec![("org.foo:bar:jar:1.0", "exact")],
        ));

        let record = classifier
            .classify_line(3, "[INFO] org.foo:bar:jar:1.0:test")
            .unwrap()
            .unwrap();
        assert_eq!(record.status, CqStatus::Ok);
        assert_eq!(record.reference, "exact");
        assert_eq!(record.line, 3);
    }

    #[test]
    fn test_special_case_rule() {
        let record = classify("[INFO] org.apache.xmlgraphics:batik-dom:jar:1.6:compile").unwrap();
        assert_eq!(record.status, CqStatus::Batik);
        assert_eq!(record.reference, "CQ-BATIK-ORBIT");

        // other packaging doesn't qualify
        let record = classify("[INFO] org.apache.xmlgraphics:batik-dom:pom:1.6:compile").unwrap();
        assert_eq!(record.status, CqStatus::Missing);
    }

    #[test]
    fn test_special_case_is_overridden_by_tables() {
        let classifier = Classifier::new(tables(
            vec![("org.apache.xmlgraphics:batik-dom:jar", "family")],
            vec![("org.apache.xmlgraphics:batik-dom:jar:1.7", "exact")],
        ));

        let bad = classifier
            .classify_line(1, "[INFO] org.apache.xmlgraphics:batik-dom:jar:1.6:compile")
            .unwrap()
            .unwrap();
        assert_eq!(bad.status, CqStatus::BadVersion);
        assert_eq!(bad.reference, "family");

        let ok = classifier
            .classify_line(2, "[INFO] org.apache.xmlgraphics:batik-dom:jar:1.7:compile")
            .unwrap()
            .unwrap();
        assert_eq!(ok.status, CqStatus::Ok);
    }

    #[test]
    fn test_special_case_can_be_disabled() {
        let classifier = Classifier::default().with_special_case(None);
        let record = classifier
            .classify_line(1, "[INFO] org.apache.xmlgraphics:batik-dom:jar:1.6:compile")
            .unwrap()
            .unwrap();
        assert_eq!(record.status, CqStatus::Missing);
    }

    #[test]
    fn test_trusted_group_is_tagged() {
        let record = classify("[INFO] org.eclipse.scout.rt:org.eclipse.scout.rt.client:jar:5.2.0:compile").unwrap();
        assert_eq!(record.status, CqStatus::OkEclipse);
        assert!(record.reference.is_empty());

        // prefix must end on a segment boundary
        let record = classify("[INFO] org.eclipse.scoutx:thing:jar:1.0:compile").unwrap();
        assert_eq!(record.status, CqStatus::Missing);
    }

    #[test]
    fn test_trusted_group_with_trailing_dot() {
        let trust = TrustPolicy {
            groups: vec!["org.eclipse.".to_string()],
            mode: TrustMode::Tag,
        };
        assert!(trust.matches("org.eclipse"));
        assert!(trust.matches("org.eclipse.scout.rt"));
        assert!(!trust.matches("org.eclipsex"));

        // a lone dot must not trust everything
        let trust = TrustPolicy {
            groups: vec![".".to_string()],
            mode: TrustMode::Tag,
        };
        assert!(!trust.matches("org.foo"));
    }

    #[test]
    fn test_trusted_group_can_still_be_overridden() {
        let classifier = Classifier::new(tables(vec![], vec![("org.eclipse.scout:tool:jar:1.0", "exact")]));
        let record = classifier
            .classify_line(1, "[INFO] org.eclipse.scout:tool:jar:1.0:compile")
            .unwrap()
            .unwrap();
        assert_eq!(record.status, CqStatus::Ok);
    }

    #[test]
    fn test_trusted_group_skip_short_circuits() {
        let classifier = Classifier::new(tables(vec![], vec![("org.eclipse.scout:tool:jar:1.0", "exact")]))
            .with_trust(TrustPolicy {
                groups: vec!["org.eclipse.scout".to_string()],
                mode: TrustMode::Skip,
            });

        let record = classifier
            .classify_line(1, "[INFO] org.eclipse.scout:tool:jar:1.0:compile")
            .unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_malformed_is_reported_by_default() {
        let record = classify("[INFO] lonely:compile").unwrap();
        assert_eq!(record.status, CqStatus::Malformed);
        assert_eq!(record.coordinate, "lonely:compile");
        assert!(record.reference.is_empty());
    }

    #[test]
    fn test_malformed_skip_and_abort() {
        let skip = Classifier::default().with_malformed_policy(MalformedPolicy::Skip);
        assert_eq!(skip.classify_line(1, "[INFO] lonely:compile").unwrap(), None);

        let abort = Classifier::default().with_malformed_policy(MalformedPolicy::Abort);
        let err = abort.classify_line(7, "[INFO] lonely:compile").unwrap_err();
        assert!(matches!(err, CoordinateError::AtLine { line: 7, .. }));
        assert!(err.to_string().starts_with("Line 7:"));
    }

    #[test]
    fn test_classify_report_keeps_order_and_line_numbers() {
        let report = "\
[INFO] Scanning for projects...
[INFO] The following files have been resolved:
[INFO]    some.unknown:thing:jar:1.0:compile
[INFO]    org.apache.commons:commons-lang3:jar:3.1:test
[INFO]    org.apache.commons:commons-lang3:jar:3.1:runtime
[WARNING] org.apache.commons:commons-lang3:jar:3.1:compile
[INFO]    junit:junit:jar:4.11:test
[INFO] BUILD SUCCESS
";
        let records = Classifier::default().classify_report(report).unwrap();
        let summary: Vec<(usize, &str, CqStatus)> = records
            .iter()
            .map(|r| (r.line, r.short_name.as_str(), r.status))
            .collect();

        assert_eq!(
            summary,
            vec![
                (3, "thing", CqStatus::Missing),
                (4, "commons-lang3", CqStatus::Ok),
                (7, "junit", CqStatus::BadVersion),
            ]
        );
    }

    #[test]
    fn test_classification_does_not_touch_tables() {
        let classifier = Classifier::default();
        let before = classifier.tables().clone();
        classifier
            .classify_report("[INFO] a.b:c:jar:1:compile\n[INFO] junit:junit:jar:4.12:test\n")
            .unwrap();
        assert_eq!(classifier.tables(), &before);
    }
}
