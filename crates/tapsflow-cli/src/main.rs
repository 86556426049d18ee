mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tapsflow_core::logging::init_logging;
use tapsflow_core::{process_file, select_changed_files, FileSummary, ProcessOptions};
use tracing::info;

use output::Format;

#[derive(Parser, Debug)]
#[command(
    name = "tapsflow",
    version = env!("TAPSFLOW_VERSION"),
    about = "Validate pipeline properties files and generate their task descriptors"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate properties files
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate the properties files added or modified in a sync, given as
    /// `STATUS PATH` pairs
    Sync {
        #[arg(required = true, num_args = 1..)]
        changes: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write pipeline artifacts for valid files
    #[arg(long)]
    write: bool,
    /// Root directory for the pipelines/ tree
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("warning: {err}");
    }

    match cli.command {
        Command::Validate { files, output } => run(&files, &output),
        Command::Sync { changes, output } => {
            let files = select_changed_files(&changes);
            info!("Selected {} properties file(s) from sync", files.len());
            run(&files, &output)
        }
    }
}

fn run(files: &[PathBuf], args: &OutputArgs) -> ExitCode {
    let options = ProcessOptions {
        write: args.write,
        output_root: args.output.clone(),
    };

    let mut summaries: Vec<FileSummary> = Vec::with_capacity(files.len());
    for file in files {
        match process_file(file, &options) {
            Ok(outcome) => summaries.push(outcome.summarize()),
            Err(err) => {
                print_summaries(&summaries, args.format);
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    print_summaries(&summaries, args.format);
    ExitCode::SUCCESS
}

fn print_summaries(summaries: &[FileSummary], format: Format) {
    if summaries.is_empty() && format == Format::Text {
        return;
    }
    match output::format_summaries(summaries, format) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("error: failed to render summary: {err}"),
    }
}
