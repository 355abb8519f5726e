use super::CliError;
use anyhow::Context;
use iwfm_core::domain::ExtractionReport;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber. `RUST_LOG` wins over `--verbose`.
pub(super) fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(super) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON output")?;
    fs::write(path, json).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

pub(super) fn render_summary(title: &str, report: &ExtractionReport) -> String {
    let mut lines = vec![format!("{}: {} files written", title, report.files.len())];
    for outcome in &report.files {
        let kept = outcome
            .kept
            .map(|kept| format!(" ({} kept)", kept))
            .unwrap_or_default();
        lines.push(format!(
            "  {:<40} {}{}",
            outcome.role,
            outcome.output.display(),
            kept
        ));
    }
    lines.join("\n")
}
