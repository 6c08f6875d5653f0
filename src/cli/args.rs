//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Organisation hierarchy analytics: salary policy and reporting-line checks
#[derive(Parser, Debug)]
#[command(name = "orgcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Treat the first CSV line as data, not as a header
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Directory searched for .orgcheck.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run salary and reporting-line reports
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        salary: SalaryArgs,
        #[command(flatten)]
        depth: DepthArgs,
    },

    /// Report managers paid outside the salary band
    Salary {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        salary: SalaryArgs,
    },

    /// Report employees with too long a reporting line
    Depth {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        depth: DepthArgs,
    },

    /// Show the hierarchy as a tree
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Employee CSV file (default: configured input)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct SalaryArgs {
    /// Minimum percentage a manager earns above the reports' mean
    #[arg(long, allow_negative_numbers = true)]
    pub min_percent: Option<i32>,

    /// Maximum percentage a manager earns above the reports' mean
    #[arg(long, allow_negative_numbers = true)]
    pub max_percent: Option<i32>,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DepthArgs {
    /// Deepest allowed reporting line below the CEO
    #[arg(long, allow_negative_numbers = true)]
    pub max_depth: Option<i32>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Show config file locations
    Path,

    /// Write a commented config template
    Init {
        /// Write the global config instead of the local one
        #[arg(short, long)]
        global: bool,
    },
}
