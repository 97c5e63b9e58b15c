use anyhow::Result;
use serde::Serialize;
use tabled::{Table, Tabled};
use ufc_rankings_lib::UpdateSummary;

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Tabled, Serialize)]
struct UpdateRow {
    #[tabled(rename = "UFC Updated")]
    #[serde(rename = "UFC Updated")]
    ufc_last_updated: String,
    #[tabled(rename = "First Seen")]
    #[serde(rename = "First Seen")]
    snapshot_date: String,
    #[tabled(rename = "Divisions")]
    #[serde(rename = "Divisions")]
    divisions: usize,
    #[tabled(rename = "Rows")]
    #[serde(rename = "Rows")]
    rows: usize,
}

fn build_update_rows(summaries: &[UpdateSummary]) -> Vec<UpdateRow> {
    summaries
        .iter()
        .map(|s| UpdateRow {
            ufc_last_updated: s.ufc_last_updated.to_string(),
            snapshot_date: s.snapshot_date.to_string(),
            divisions: s.divisions,
            rows: s.rows,
        })
        .collect()
}

pub fn print_updates_table(summaries: &[UpdateSummary]) {
    println!("{}", Table::new(build_update_rows(summaries)));
}

pub fn print_updates_csv(summaries: &[UpdateSummary]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_update_rows(summaries) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
