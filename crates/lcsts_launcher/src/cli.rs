use crate::launcher::RunArgs;
use crate::script::ScriptArgs;
use crate::show::ShowArgs;
use crate::validate::CheckArgs;
use crate::{launcher, script, show, validate};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "LCSTS pointer-generator training launcher", long_about = None)]
pub struct Cli {
    /// Also write a daily-rotating log file into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the trainer (Default)
    Run(RunArgs),

    /// Print the trainer arguments
    Show(ShowArgs),

    /// Check config values and input files
    Check(CheckArgs),

    /// Export the launch as a shell script
    Script(ScriptArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Run(_) => "run",
            Commands::Show(_) => "show",
            Commands::Check(_) => "check",
            Commands::Script(_) => "script",
        }
    }

    pub fn execute(self) -> Result<ExitCode> {
        match self {
            Commands::Run(args) => launcher::run(args),
            Commands::Show(args) => show::run(args),
            Commands::Check(args) => validate::run(args),
            Commands::Script(args) => script::run(args),
        }
    }
}

impl Cli {
    /// The chosen subcommand; a bare invocation launches with defaults.
    pub fn selected(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}
