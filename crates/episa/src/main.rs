use std::path::PathBuf;

use clap::{Parser, Subcommand};
use episa::commands::{self, DemoArgs, RunArgs, SampleArgs};
use episa::{LogTarget, init_logging};

#[derive(Parser, Debug)]
#[command(name = "episa", version)]
#[command(about = "Global sensitivity analysis for epileptogenicity models")]
struct Args {
    /// Path to the data directory (default: ~/.episa/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Log to a file in the data directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a sensitivity analysis on a YAML problem file
    Run(RunArgs),
    /// Generate samples for the inputs of a problem file
    Sample(SampleArgs),
    /// Run every method on the Ishigami benchmark
    Demo(DemoArgs),
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".episa")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let target = if args.log_file {
        LogTarget::File {
            data_dir: args.data_dir.unwrap_or_else(default_data_dir),
        }
    } else {
        LogTarget::Stderr
    };
    init_logging(&target, &args.log_level)?;

    match &args.command {
        Command::Run(run) => commands::run(run),
        Command::Sample(sample) => commands::sample(sample),
        Command::Demo(demo) => commands::demo(demo),
    }
}
