//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Username reconnaissance across public platforms.
#[derive(Debug, Parser)]
#[command(name = "lookout", version, about)]
pub struct Cli {
    /// Probe definition file, overriding the configured one
    #[arg(long, global = true)]
    pub platforms: Option<PathBuf>,

    /// Directory holding case folders
    #[arg(long, global = true)]
    pub cases_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Investigate a username and store the result as a new case
    Scan(ScanArgs),
    /// Manage cases
    Case {
        #[command(subcommand)]
        command: CaseCommand,
    },
    /// List the loaded probe definitions
    Platforms,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Username to investigate
    #[arg(short, long)]
    pub username: String,

    /// Email address to look up alongside the username
    #[arg(short, long)]
    pub email: Option<String>,

    /// Phone number in international form, e.g. +447400123456
    #[arg(short, long)]
    pub phone: Option<String>,

    /// Date of birth (YYYY-MM-DD) to search for in public profile text
    #[arg(long)]
    pub dob: Option<String>,

    /// Name for the new case
    #[arg(long)]
    pub case_name: Option<String>,

    /// Analyst recorded on the case
    #[arg(long, default_value = "Unknown")]
    pub analyst: String,

    /// Print the full investigation as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum CaseCommand {
    /// Create an empty case and print its id
    Create {
        /// Case name
        name: String,
        /// Responsible analyst
        #[arg(long, default_value = "Unknown")]
        analyst: String,
    },
    /// Show whether a case has a stored investigation
    Status {
        /// Case id
        case_id: String,
    },
    /// Replace a case's analyst notes
    Note {
        /// Case id
        case_id: String,
        /// Note text
        text: String,
    },
}
