//! Launcher - starts `train.py` with the configured flags
//!
//! A [`LaunchPlan`] is the interpreter, the argument vector and the project
//! root. Running it spawns one child, waits for it and hands back its exit
//! status untouched.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, ExitStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::TrainConfig;
use crate::flags::{shell_quote, trainer_args};
use crate::logging;

pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_SCRIPT: &str = "train.py";
/// The trainer runs from the parent of the invocation directory.
pub const DEFAULT_PROJECT_ROOT: &str = "..";

/// Where and how the trainer is started
#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
    /// JSON config to use instead of the built-in LCSTS record
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Working directory of the trainer
    #[arg(long, default_value = DEFAULT_PROJECT_ROOT)]
    pub project_root: PathBuf,

    /// Python interpreter
    #[arg(long, default_value = DEFAULT_PYTHON)]
    pub python: String,

    /// Training entry point, relative to the project root
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    pub script: String,
}

impl Default for LaunchArgs {
    fn default() -> Self {
        Self {
            config: None,
            project_root: PathBuf::from(DEFAULT_PROJECT_ROOT),
            python: DEFAULT_PYTHON.to_string(),
            script: DEFAULT_SCRIPT.to_string(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Print the command instead of running it
    #[arg(long, action)]
    pub dry_run: bool,
}

/// Fully resolved trainer invocation.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    config: TrainConfig,
    program: String,
    args: Vec<String>,
    current_dir: PathBuf,
}

impl LaunchPlan {
    pub fn new(config: TrainConfig, target: &LaunchArgs) -> Self {
        let mut args = vec![target.script.clone()];
        args.extend(trainer_args(&config));
        Self {
            config,
            program: target.python.clone(),
            args,
            current_dir: target.project_root.clone(),
        }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Script path followed by the trainer flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// The child command. Only the child changes directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.current_dir);
        cmd
    }

    /// Shell-quoted `program args...`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Spawn the trainer with inherited stdio and wait for it.
    pub fn run(&self) -> Result<ExitStatus> {
        info!(
            "🚀 Launching {} {} in {}",
            self.program,
            self.args.first().map(String::as_str).unwrap_or_default(),
            self.current_dir.display()
        );
        let mut child = self.command().spawn().with_context(|| {
            format!(
                "Failed to start {} in {}",
                self.program,
                self.current_dir.display()
            )
        })?;
        let status = child.wait().context("Failed to wait for trainer")?;
        if status.success() {
            info!("✅ Trainer finished");
        } else {
            warn!("Trainer exited with {}", status);
        }
        Ok(status)
    }
}

/// Launcher exit code for a finished trainer: its own code, or 128+signal.
pub fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(1);
        }
    }
    1
}

/// Exit code to quit with after the `presses`-th Ctrl+C, or `None` to keep
/// waiting. The trainer gets the terminal's Ctrl+C itself, so the first
/// press only waits for its exit status. A second press abandons it.
pub fn on_interrupt(presses: usize) -> Option<i32> {
    if presses <= 1 {
        None
    } else {
        Some(130)
    }
}

fn install_interrupt_handler() {
    let presses = Arc::new(AtomicUsize::new(0));
    let c = presses.clone();
    let result = ctrlc::set_handler(move || {
        let count = c.fetch_add(1, Ordering::SeqCst) + 1;
        match on_interrupt(count) {
            None => {
                info!("🛑 Ctrl+C detected! Waiting for the trainer to exit...");
                info!("   (Press Ctrl+C again to leave it running and quit)");
            }
            Some(code) => {
                error!("⚠️  Force quit!");
                logging::flush();
                std::process::exit(code);
            }
        }
    });
    if let Err(e) = result {
        warn!("Could not install Ctrl+C handler: {}", e);
    }
}

pub fn run(args: RunArgs) -> Result<ExitCode> {
    let config = TrainConfig::resolve(args.launch.config.as_deref())?;
    let plan = LaunchPlan::new(config, &args.launch);

    if args.dry_run {
        println!("cd {}", shell_quote(&plan.current_dir().to_string_lossy()));
        println!("{}", plan.command_line());
        return Ok(ExitCode::SUCCESS);
    }

    install_interrupt_handler();
    let status = plan.run()?;
    Ok(ExitCode::from(exit_code(status)))
}
