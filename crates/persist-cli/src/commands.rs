use super::args::Cli;
use crate::types::{LogLevel, OutputFormat};
use anyhow::Result;
use is_terminal::IsTerminal;
use persist_runtime::{RunReport, Settings, SummaryConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let file_settings = Settings::load_from(&cli.config)?;
    let config = SummaryConfig::from_settings(file_settings.merge(cli.settings()))?;
    debug!("Resolved configuration: {:?}", config);

    let report = persist_runtime::run(&config)?;
    print_report(&report, cli.format)
}

/// Log events go to stderr; `RUST_LOG` overrides `--log-level`.
fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    // A second initialization (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Plain => {
            for line in render_plain(report) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

pub(crate) fn render_plain(report: &RunReport) -> Vec<String> {
    let mut lines = vec![
        format!("Location: {}", report.location),
        format!("Lineage: {}", report.lineage),
        format!("Input: {}", report.input.display()),
    ];
    if report.discovered.len() > 1 {
        lines.push(format!(
            "  ({} tables found, only the first is used)",
            report.discovered.len()
        ));
    }
    lines.push(format!("MRSD: {} ({})", report.mrsd, report.mrsd_date));
    lines.push(format!(
        "Records: {} read, {} at {}",
        report.rows_read, report.rows_matched, report.location
    ));
    lines.push(format!(
        "Groups: {}, time buckets: {}",
        report.groups, report.buckets
    ));
    lines.push("Wrote:".to_string());
    for path in &report.outputs {
        lines.push(format!("  {}", path.display()));
    }
    lines
}
