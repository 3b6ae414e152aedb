//! Command line interface definition

use banker_types::ColorChoice;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// banker - Banker's-algorithm deadlock avoidance
#[derive(Parser)]
#[command(name = "banker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Banker's-algorithm deadlock avoidance for shared resources")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write debug logs to the banker log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scenario file describing the starting allocation (defaults to the built-in example)
    #[arg(long, global = true, value_name = "PATH")]
    pub scenario: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show Available, Maximum, Allocation and Need
    Show,

    /// Check whether the current state is safe
    #[command(alias = "safety")]
    Check,

    /// Ask for resources on behalf of a process
    #[command(alias = "req")]
    Request {
        /// Process id (0-based)
        pid: usize,

        /// Units requested, one per resource class
        #[arg(required = true, num_args = 1..)]
        units: Vec<u32>,
    },

    /// Check a proposed finishing order
    Verify {
        /// Process ids in finishing order
        #[arg(required = true, num_args = 1..)]
        sequence: Vec<usize>,
    },

    /// Interactive menu: check safety and submit requests until exit
    Menu,
}

impl Commands {
    /// Name used for operation events and log correlation
    pub fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Check => "check",
            Self::Request { .. } => "request",
            Self::Verify { .. } => "verify",
            Self::Menu => "menu",
        }
    }
}
