//! Config sanity checks for the `check` command. Never used when launching.

use anyhow::Result;
use clap::Args;
use std::fmt;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::config::TrainConfig;
use crate::launcher::LaunchArgs;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    NotPositive(&'static str),
    BadModelName(String),
    OutOfRange { name: &'static str, value: f64 },
    MissingFile { name: &'static str, path: String },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::NotPositive(name) => write!(f, "{name} must be a positive integer"),
            Problem::BadModelName(name) => {
                write!(f, "model_name {name:?} must be a non-empty file name")
            }
            Problem::OutOfRange { name, value } => write!(f, "{name} = {value} is out of range"),
            Problem::MissingFile { name, path } => write!(f, "{name}: {path} not found"),
        }
    }
}

/// Checks that need nothing but the record itself.
pub fn check_values(config: &TrainConfig) -> Vec<Problem> {
    let positive = [
        ("batch_size", config.batch_size),
        ("hidden_units", config.hidden_units),
        ("embedding_size", config.embedding_size),
        ("attention_units", config.attention_units),
        ("encoder_depth", config.encoder_depth),
        ("decoder_depth", config.decoder_depth),
        ("encoder_max_time_steps", config.encoder_max_time_steps),
        ("decoder_max_time_steps", config.decoder_max_time_steps),
        ("display_freq", config.display_freq),
        ("save_freq", config.save_freq),
        ("valid_freq", config.valid_freq),
        ("encoder_vocab_size", config.encoder_vocab_size),
        ("decoder_vocab_size", config.decoder_vocab_size),
        ("max_epochs", config.max_epochs),
    ];
    let mut problems: Vec<Problem> = positive
        .into_iter()
        .filter(|(_, v)| *v == 0)
        .map(|(name, _)| Problem::NotPositive(name))
        .collect();

    let name = &config.model_name;
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        problems.push(Problem::BadModelName(name.clone()));
    }

    let opts = &config.options;
    if let Some(rate) = opts.dropout_rate {
        if !(0.0..1.0).contains(&rate) {
            problems.push(Problem::OutOfRange {
                name: "dropout_rate",
                value: rate,
            });
        }
    }
    for (name, value) in [
        ("learning_rate", opts.learning_rate),
        ("max_gradient_norm", opts.max_gradient_norm),
    ] {
        if let Some(v) = value {
            // also rejects NaN
            if !(v > 0.0) {
                problems.push(Problem::OutOfRange { name, value: v });
            }
        }
    }
    problems
}

/// Data and vocabulary files, resolved against the project root.
/// `model_dir` is left alone; the trainer creates it.
pub fn check_files(config: &TrainConfig, project_root: &Path) -> Vec<Problem> {
    config
        .input_files()
        .into_iter()
        .filter(|(_, path)| !project_root.join(path).is_file())
        .map(|(name, path)| Problem::MissingFile {
            name,
            path: path.display().to_string(),
        })
        .collect()
}

pub fn check(config: &TrainConfig, project_root: &Path) -> Vec<Problem> {
    let mut problems = check_values(config);
    problems.extend(check_files(config, project_root));
    problems
}

pub fn run(args: CheckArgs) -> Result<ExitCode> {
    let config = TrainConfig::resolve(args.launch.config.as_deref())?;
    let problems = check(&config, &args.launch.project_root);

    if problems.is_empty() {
        info!("✅ Config OK ({})", args.launch.project_root.display());
        return Ok(ExitCode::SUCCESS);
    }
    for p in &problems {
        warn!("{}", p);
        println!("❌ {}", p);
    }
    Ok(ExitCode::FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_values_pass() {
        assert!(check_values(&TrainConfig::lcsts_char()).is_empty());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = TrainConfig::lcsts_char();
        config.batch_size = 0;
        config.max_epochs = 0;
        config.model_name = "ckpt/summary".to_string();
        config.options.dropout_rate = Some(1.0);
        config.options.learning_rate = Some(f64::NAN);

        let problems = check_values(&config);
        assert_eq!(problems.len(), 5);
        assert_eq!(problems[0], Problem::NotPositive("batch_size"));
        assert_eq!(problems[1], Problem::NotPositive("max_epochs"));
        assert!(matches!(problems[2], Problem::BadModelName(_)));
        assert!(matches!(
            problems[3],
            Problem::OutOfRange { name: "dropout_rate", .. }
        ));
        assert!(matches!(
            problems[4],
            Problem::OutOfRange { name: "learning_rate", .. }
        ));
    }

    #[test]
    fn test_missing_files() -> Result<()> {
        let root = tempfile::tempdir()?;
        let config = TrainConfig::lcsts_char();
        // Everything missing; the shared vocab counts once per flag
        assert_eq!(check_files(&config, root.path()).len(), 6);

        for (_, path) in config.input_files() {
            let full = root.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap())?;
            std::fs::write(full, "")?;
        }
        assert!(check(&config, root.path()).is_empty());
        Ok(())
    }
}
