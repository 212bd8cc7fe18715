use anyhow::Context;
use clap::Parser;
use cqscan_core::{scan_file, Config, Exporter, ReportFormat};
use cqscan_deps::{CqStatus, MalformedPolicy};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cqscan")]
#[command(version, about = "Classify Maven dependency reports against CQ approval tables", long_about = None)]
struct Cli {
    /// Dependency report produced by `mvn dependency:list` or `dependency:tree`
    #[arg(required_unless_present = "dump_config")]
    report: Option<PathBuf>,

    /// Config file (defaults to <config dir>/cqscan/config.toml when present)
    #[arg(short, long, env = "CQSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (defaults to the --output extension, then text)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do with dependency lines that can't be parsed
    #[arg(long, value_enum)]
    on_malformed: Option<OnMalformed>,

    /// Leave trusted-organization artifacts out of the report
    #[arg(long)]
    skip_trusted: bool,

    /// Print status counts to stderr after the report
    #[arg(long)]
    summary: bool,

    /// Print the effective config, approval tables included, and exit
    #[arg(long)]
    dump_config: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
    Markdown,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => ReportFormat::Text,
            Format::Json => ReportFormat::Json,
            Format::Csv => ReportFormat::Csv,
            Format::Markdown => ReportFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OnMalformed {
    Report,
    Skip,
    Abort,
}

impl From<OnMalformed> for MalformedPolicy {
    fn from(policy: OnMalformed) -> Self {
        match policy {
            OnMalformed::Report => MalformedPolicy::Report,
            OnMalformed::Skip => MalformedPolicy::Skip,
            OnMalformed::Abort => MalformedPolicy::Abort,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays a clean report
    let default_filter = match cli.verbose {
        0 => "cqscan_cli=warn,cqscan_core=warn,cqscan_deps=warn",
        1 => "cqscan_cli=info,cqscan_core=info,cqscan_deps=info",
        _ => "cqscan_cli=debug,cqscan_core=debug,cqscan_deps=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    config.apply_cli_overrides(cli.on_malformed.map(Into::into), cli.skip_trusted);

    if cli.dump_config {
        print!("{}", config.with_builtin_tables().to_toml()?);
        return Ok(());
    }

    let Some(report_path) = cli.report else {
        anyhow::bail!("No dependency report given. Try --help");
    };

    tracing::info!("Scanning {}", report_path.display());
    let classifier = config.build_classifier();
    let report = scan_file(&report_path, &classifier)?;

    match &cli.output {
        Some(path) => {
            Exporter::write_to_file(&report, path, cli.format.map(Into::into))
                .with_context(|| format!("Could not write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let format: ReportFormat = cli.format.map(Into::into).unwrap_or_default();
            let rendered = Exporter::render(&report, format)?;
            std::io::stdout().lock().write_all(rendered.as_bytes())?;
        }
    }

    if cli.summary {
        eprintln!("{} dependencies classified", report.summary.total_count);
        for status in CqStatus::all() {
            eprintln!("  {:<15} {}", status.tag(), report.summary.count_for(status));
        }
        eprintln!("  {:<15} {}", "needs review", report.summary.needs_review());
    }

    Ok(())
}
