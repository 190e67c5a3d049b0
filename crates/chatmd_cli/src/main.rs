//! `chatmd`: split a Telegram HTML chat export into one markdown file per message.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chatmd_core::DuplicatePolicy;
use chatmd_engine::{export_sources, ExportSettings, RunSummary};
use chatmd_logging::{chatmd_error, LogDestination};
use clap::Parser;
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Exported HTML files, in chat order (messages.html, messages2.html, ...).
    #[arg(value_name = "INPUT", default_value = "messages.html")]
    inputs: Vec<PathBuf>,

    /// Directory for the markdown files. Created if missing.
    #[arg(short, long, env = "CHATMD_OUTPUT", default_value = "telegram_messages")]
    output: PathBuf,

    /// Keep messages whose title repeats as `Title_1.md`, `Title_2.md`, ...
    /// instead of dropping them.
    #[arg(long)]
    number_duplicates: bool,

    /// Also write the log to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log every written and skipped message.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    fn settings(&self) -> ExportSettings {
        ExportSettings {
            output_dir: self.output.clone(),
            duplicate_policy: if self.number_duplicates {
                DuplicatePolicy::Number
            } else {
                DuplicatePolicy::Skip
            },
            ..ExportSettings::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    chatmd_logging::initialize(destination, cli.log_level());

    match run(&cli) {
        Ok(summary) => {
            println!(
                "\nConversion completed! Converted {} messages.",
                summary.converted
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            chatmd_error!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    export_sources(&cli.inputs, &cli.settings())
        .with_context(|| format!("converting into {:?}", cli.output))
}
