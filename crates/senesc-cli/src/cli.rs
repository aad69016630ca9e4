use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Marion Gauthier, Camille Chambon, Romain Barillot",
    version,
    about = "Senesc-Wheat CLI - A command-line interface for simulating tissue senescence and nutrient remobilisation in wheat.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Advance a plant stand by one or more senescence timesteps
    Run(RunArgs),

    /// Validate input tables and report every problematic record
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the roots input table (CSV)
    #[arg(long, value_name = "PATH")]
    pub roots: PathBuf,

    /// Path to the elements input table (CSV)
    #[arg(long, value_name = "PATH")]
    pub elements: PathBuf,

    /// Path to write the roots output table to (CSV)
    #[arg(long, value_name = "PATH")]
    pub out_roots: PathBuf,

    /// Path to write the elements output table to (CSV)
    #[arg(long, value_name = "PATH")]
    pub out_elements: PathBuf,

    /// Length of one timestep, in seconds
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub delta_t: f64,

    /// Number of consecutive timesteps to run
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..), value_name = "NUM")]
    pub steps: u64,

    /// Path to a TOML file overriding the default model parameters
    #[arg(short, long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Use the post-flowering root senescence regime
    #[arg(long)]
    pub postflowering: bool,

    /// Skip records that fail validation instead of aborting the run
    #[arg(long)]
    pub skip_invalid: bool,

    /// Green area threshold (m2) below which non-growing elements are
    /// declared dead. Zero disables forced death
    #[arg(long, value_name = "AREA")]
    pub min_green_area: Option<f64>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the roots input table (CSV)
    #[arg(long, value_name = "PATH")]
    pub roots: PathBuf,

    /// Path to the elements input table (CSV)
    #[arg(long, value_name = "PATH")]
    pub elements: PathBuf,
}
