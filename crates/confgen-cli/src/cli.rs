use crate::utils::parser;
use clap::{Args, Parser};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "confgen",
    author = "confgen contributors",
    version,
    about = "confgen - Generate a diverse ensemble of 3D conformers for a small molecule using distance geometry and force-field refinement.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output and progress bars except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Arguments controlling one generation run.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    // --- Core Arguments ---
    /// Input molecule as a V2000 MOL/SDF file. Only the first record is read.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output SD file receiving one record per generated conformer.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Embedding Overrides ---
    /// Number of embedding slots to attempt [default: 5000].
    #[arg(short = 'n', long, value_name = "NUM")]
    pub num_conformers: Option<usize>,

    /// Heavy-atom RMSD (Å) below which a new conformer counts as a duplicate.
    /// Zero or a negative value disables pruning [default: 0.5].
    #[arg(long = "prune-rms", value_name = "FLOAT", allow_negative_numbers = true)]
    pub prune_rms_threshold: Option<f64>,

    /// Seed for the embedding random number generator, decimal or 0x-prefixed hex [default: 0xf00d].
    #[arg(long, value_name = "SEED", value_parser = parser::parse_seed)]
    pub seed: Option<u64>,

    /// Embedding attempts per slot before the slot is skipped [default: 10].
    #[arg(long, value_name = "NUM")]
    pub max_attempts: Option<usize>,

    // --- Optimization Overrides ---
    /// Skip force-field optimization and keep the raw embedded coordinates.
    #[arg(long)]
    pub no_optimize: bool,

    /// Iteration limit of the force-field minimizer per conformer [default: 200].
    #[arg(long, value_name = "NUM")]
    pub max_iterations: Option<usize>,

    /// Force-field parameter file (TOML) replacing the built-in parameters.
    #[arg(long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    // --- Reporting ---
    /// Write a CSV report with the energy of every conformer.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}
