use crate::{scan::ScanReport, Error, Result};
use cqscan_deps::CqStatus;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One `<name> <status> <coordinate> <reference>` line per record
    #[default]
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "md" | "markdown" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Renders scan reports
pub struct Exporter;

impl Exporter {
    pub fn render(report: &ScanReport, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(Self::to_text(report)),
            ReportFormat::Json => Self::to_json(report),
            ReportFormat::Csv => Ok(Self::to_csv(report)),
            ReportFormat::Markdown => Ok(Self::to_markdown(report)),
        }
    }

    /// Write a report to a file, picking the format from the extension when none is given
    pub fn write_to_file<P: AsRef<Path>>(
        report: &ScanReport,
        path: P,
        format: Option<ReportFormat>,
    ) -> Result<()> {
        let path = path.as_ref();

        let format = match format {
            Some(format) => format,
            None => path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(ReportFormat::from_extension)
                .ok_or_else(|| {
                    let known: Vec<String> = [
                        ReportFormat::Text,
                        ReportFormat::Json,
                        ReportFormat::Csv,
                        ReportFormat::Markdown,
                    ]
                    .iter()
                    .map(|f| format!(".{}", f.extension()))
                    .collect();
                    Error::ExportError(format!(
                        "Could not determine report format from extension. Use {}",
                        known.join(", ")
                    ))
                })?,
        };

        let content = Self::render(report, format)?;

        let mut file = File::create(path)
            .map_err(|e| Error::ExportError(format!("Failed to create file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    /// Plain space-separated lines, meant for cut/sort/uniq downstream
    pub fn to_text(report: &ScanReport) -> String {
        let mut output = String::new();
        for record in &report.records {
            output.push_str(&record.to_string());
            output.push('\n');
        }
        output
    }

    pub fn to_json(report: &ScanReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    pub fn to_csv(report: &ScanReport) -> String {
        let mut output = String::from("Line,Name,Status,Coordinate,Reference\n");

        for record in &report.records {
            output.push_str(&format!(
                "{},{},{},{},{}\n",
                record.line,
                Self::escape_csv(&record.short_name),
                record.status,
                Self::escape_csv(&record.coordinate),
                Self::escape_csv(&record.reference),
            ));
        }

        output
    }

    pub fn to_markdown(report: &ScanReport) -> String {
        let mut output = String::new();

        output.push_str("# Dependency CQ Report\n\n");
        output.push_str(&format!("Source: `{}`\n\n", report.source));
        output.push_str(&format!(
            "Generated: {}\n\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str("| Name | Status | Coordinate | Reference |\n");
        output.push_str("|------|--------|------------|-----------|\n");
        for record in &report.records {
            let reference = if record.reference.starts_with("http") {
                format!("[link]({})", record.reference)
            } else {
                record.reference.clone()
            };
            output.push_str(&format!(
                "| {} | {} | `{}` | {} |\n",
                record.short_name, record.status, record.coordinate, reference
            ));
        }

        output.push_str("\n## Summary\n\n");
        output.push_str(&format!("- Total: {}\n", report.summary.total_count));
        for status in CqStatus::all() {
            let count = report.summary.count_for(status);
            if count > 0 {
                output.push_str(&format!("- {}: {}\n", status, count));
            }
        }
        output.push_str(&format!("- Needs review: {}\n", report.summary.needs_review()));

        output
    }

    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
