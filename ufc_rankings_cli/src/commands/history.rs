//! The `history` subcommand: list recorded rankings updates.

use std::path::Path;

use anyhow::Result;
use ufc_rankings_lib::HistoryStore;

use crate::output::{print_json, print_updates_csv, print_updates_table, OutputFormat};

pub fn run(history: &Path, format: &OutputFormat) -> Result<()> {
    let store = HistoryStore::new(history);
    if !store.exists() {
        println!(
            "No history at {}. Run 'ufc-rankings update' first.",
            history.display()
        );
        return Ok(());
    }

    let summaries = store.summaries()?;
    match format {
        OutputFormat::Table => print_updates_table(&summaries),
        OutputFormat::Json => print_json(&summaries),
        OutputFormat::Csv => print_updates_csv(&summaries)?,
    }
    Ok(())
}
