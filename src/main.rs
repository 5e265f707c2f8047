use std::path::PathBuf;

use clap::{Parser, Subcommand};
use timesheet_tools::config::RunConfig;
use timesheet_tools::io::csv_write;
use timesheet_tools::io::event_feed::JsonEventFeed;
use timesheet_tools::io::excel_read::XlsxMeetingLog;
use timesheet_tools::{ConsolidateError, ConsolidationPipeline, Result, RunOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    init_logging()?;
    match cli.command {
        Command::Consolidate(args) => execute_consolidate(args),
    }
}

fn execute_consolidate(args: ConsolidateArgs) -> Result<i32> {
    let mut config = RunConfig::load(&args.config)?;
    if let Some(events) = args.events {
        config.event_feed = events;
    }
    if let Some(output) = args.output {
        config.output = output;
    }

    let events = JsonEventFeed::new(&config.event_feed);
    let spreadsheet = XlsxMeetingLog::new(
        &config.spreadsheet.path,
        &config.spreadsheet.log_sheet,
        &config.spreadsheet.acronym_sheet,
    );

    let pipeline = ConsolidationPipeline::new(&config);
    match pipeline.run(&events, &spreadsheet)? {
        RunOutcome::Records(records) => {
            csv_write::write_csv(&config.output, &records)?;
            info!(record_count = records.len(), "run finished");
            println!(
                "Timesheet exported to {} ({} records)",
                config.output.display(),
                records.len()
            );
            Ok(0)
        }
        RunOutcome::EmptyEventSource => {
            eprintln!(
                "no events titled '{}' found between {} and {}; \
                 check the calendar export and try again",
                config.event_keyword, config.window.start, config.window.end
            );
            Ok(2)
        }
        RunOutcome::MissingOrEmptySpreadsheet => {
            eprintln!(
                "the shared meeting log at {} could not be read or holds no rows",
                config.spreadsheet.path.display()
            );
            Ok(3)
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ConsolidateError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate calendar events and the shared meeting log into a timesheet CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one consolidation pass and export the result.
    Consolidate(ConsolidateArgs),
}

#[derive(clap::Args)]
struct ConsolidateArgs {
    /// Path to the run configuration (JSON).
    #[arg(long)]
    config: PathBuf,

    /// Override the configured event feed export path.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Override the configured CSV destination path.
    #[arg(long)]
    output: Option<PathBuf>,
}
