use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Filesystem import source: stream directory trees as JSON-lines records.
#[derive(Clone, Parser)]
#[command(name = "dirsource")]
#[command(about = "Walk a directory tree and print import records as JSON lines.")]
pub struct Cli {
    /// Config file with a [source] table. Default: `.dirsource.toml` in the working directory, if present.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging and a record counter on stderr).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// One record per file.
    Files(SourceArgs),
    /// One record per non-empty directory, then one per loose document.
    Tree(SourceArgs),
    /// Print the field labels and identifier schema of a mode.
    Fields {
        #[arg(value_enum)]
        mode: Mode,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Files,
    Tree,
}

/// Options shared by `files` and `tree`. Each one overrides the config file.
#[derive(Clone, Debug, Default, Args)]
pub struct SourceArgs {
    /// Search path.
    #[arg(long, short = 'p')]
    pub path: Option<PathBuf>,

    /// Environment variable holding the search path (also read from `.env`). Wins over --path.
    #[arg(long)]
    pub path_env: Option<String>,

    /// Filenames to include: globs, names or /regex/. Can specify multiple.
    #[arg(long, short = 'i', num_args = 1..)]
    pub include: Vec<String>,

    /// Filenames to exclude: globs, names or /regex/. Can specify multiple.
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Depth expressions, e.g. "== 0" or "< 3". Can specify multiple.
    #[arg(long, short = 'd', num_args = 1..)]
    pub depth: Vec<String>,

    /// Sort by this field (required for resuming from a high-water mark).
    #[arg(long)]
    pub high_water_field: Option<String>,

    /// Only emit entries whose high-water field is greater than this value.
    #[arg(long, requires = "high_water_field")]
    pub high_water: Option<String>,

    /// Skip unreadable paths instead of failing.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub skip_errors: Option<bool>,

    /// Document converter program (invoked as `<tool> <file> -t html5`).
    #[arg(long)]
    pub converter: Option<String>,
}
