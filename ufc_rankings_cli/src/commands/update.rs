//! The `update` subcommand: fetch, parse, and append a new rankings snapshot.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Args;
use ufc_rankings_lib::ufc_rankings_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use ufc_rankings_lib::{run_update, AppendOutcome, RankingsConfig, UpdateReport, DEFAULT_MIN_ROWS};

#[derive(Args)]
pub struct UpdateArgs {
    /// Site root to fetch `/rankings` from
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Abort without writing if fewer rows than this are parsed
    #[arg(long, default_value_t = DEFAULT_MIN_ROWS)]
    pub min_rows: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Parse and validate but do not write the history file
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for UpdateArgs {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_rows: DEFAULT_MIN_ROWS,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            dry_run: false,
        }
    }
}

impl UpdateArgs {
    fn config(&self, history: &Path) -> RankingsConfig {
        RankingsConfig::default()
            .with_base_url(&self.base_url)
            .with_history_path(history)
            .with_min_rows(self.min_rows)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

pub async fn run(args: &UpdateArgs, history: &Path) -> Result<()> {
    let config = args.config(history);
    let today = Local::now().date_naive();

    let report = run_update(&config, today, args.dry_run).await?;
    for line in status_lines(&report, &config) {
        println!("{}", line);
    }
    Ok(())
}

/// Human-readable lines describing a finished run.
fn status_lines(report: &UpdateReport, config: &RankingsConfig) -> Vec<String> {
    let mut lines = vec![format!(
        "Parsed {} rows, {} divisions, UFC updated {}",
        report.rows, report.divisions, report.ufc_last_updated
    )];

    if !report.skips.is_empty() {
        lines.push(format!(
            "Skipped {} non-ranking groupings and {} malformed rows.",
            report.skips.groupings_skipped, report.skips.rows_skipped
        ));
    }

    lines.push(match report.outcome {
        None => format!("Dry run: {} rows not written.", report.rows),
        Some(AppendOutcome::Created { rows, .. }) => format!(
            "Created {} with {} rows.",
            config.history_path.display(),
            rows
        ),
        Some(AppendOutcome::Appended { rows, update }) => {
            format!("Appended {} rows for UFC update date {}.", rows, update)
        }
        Some(AppendOutcome::Skipped { update }) => {
            format!("No UFC update since {}. Skipping append.", update)
        }
    });
    lines
}
