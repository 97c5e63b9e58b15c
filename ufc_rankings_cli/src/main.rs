mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ufc_rankings_lib::DEFAULT_HISTORY_PATH;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "ufc-rankings")]
#[command(about = "Record UFC rankings snapshots in an append-only CSV history")]
struct Cli {
    /// History CSV path
    #[arg(long, default_value = DEFAULT_HISTORY_PATH, global = true)]
    history: PathBuf,

    /// Output format for listings: table, json, or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Defaults to `update` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the rankings page and append it if the UFC has updated
    Update(commands::update::UpdateArgs),
    /// List the rankings updates already recorded
    History,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ufc_rankings=info".parse::<tracing_subscriber::filter::Directive>()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        None => commands::update::run(&commands::update::UpdateArgs::default(), &cli.history).await?,
        Some(Commands::Update(args)) => commands::update::run(args, &cli.history).await?,
        Some(Commands::History) => commands::history::run(&cli.history, &format)?,
    }

    Ok(())
}
