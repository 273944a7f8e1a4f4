//! Trainer Flags - renders a [`TrainConfig`] into `train.py` arguments

use crate::config::{TrainConfig, TrainerOptions};
use std::path::Path;

/// One command-line flag of the trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainerFlag {
    /// `--name value`
    Value { name: &'static str, value: String },
    /// absl boolean: `--name` or `--noname`
    Switch { name: &'static str, on: bool },
}

impl TrainerFlag {
    fn value(name: &'static str, value: impl ToString) -> Self {
        TrainerFlag::Value {
            name,
            value: value.to_string(),
        }
    }

    fn path(name: &'static str, path: &Path) -> Self {
        TrainerFlag::Value {
            name,
            value: path.to_string_lossy().into_owned(),
        }
    }

    /// Argument tokens for this flag, in order.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            TrainerFlag::Value { name, value } => vec![format!("--{name}"), value.clone()],
            TrainerFlag::Switch { name, on: true } => vec![format!("--{name}")],
            TrainerFlag::Switch { name, on: false } => vec![format!("--no{name}")],
        }
    }
}

/// All flags for `config`, core record first, then any set options.
pub fn trainer_flags(config: &TrainConfig) -> Vec<TrainerFlag> {
    let mut flags = vec![
        TrainerFlag::value("model_class", config.model_class.as_str()),
        TrainerFlag::value("batch_size", config.batch_size),
        TrainerFlag::value("hidden_units", config.hidden_units),
        TrainerFlag::value("embedding_size", config.embedding_size),
        TrainerFlag::value("attention_units", config.attention_units),
        TrainerFlag::value("encoder_depth", config.encoder_depth),
        TrainerFlag::value("decoder_depth", config.decoder_depth),
        TrainerFlag::value("encoder_max_time_steps", config.encoder_max_time_steps),
        TrainerFlag::value("decoder_max_time_steps", config.decoder_max_time_steps),
        TrainerFlag::value("display_freq", config.display_freq),
        TrainerFlag::value("save_freq", config.save_freq),
        TrainerFlag::value("valid_freq", config.valid_freq),
        TrainerFlag::path("model_dir", &config.model_dir),
        TrainerFlag::value("model_name", &config.model_name),
        TrainerFlag::path("source_vocabulary", &config.source_vocabulary),
        TrainerFlag::path("target_vocabulary", &config.target_vocabulary),
        TrainerFlag::path("source_train_data", &config.source_train_data),
        TrainerFlag::path("target_train_data", &config.target_train_data),
        TrainerFlag::path("source_valid_data", &config.source_valid_data),
        TrainerFlag::path("target_valid_data", &config.target_valid_data),
        TrainerFlag::value("encoder_vocab_size", config.encoder_vocab_size),
        TrainerFlag::value("decoder_vocab_size", config.decoder_vocab_size),
        TrainerFlag::value("cell_type", config.cell_type.as_str()),
        TrainerFlag::value("max_epochs", config.max_epochs),
    ];
    flags.extend(option_flags(&config.options));
    flags
}

fn option_flags(options: &TrainerOptions) -> Vec<TrainerFlag> {
    let mut flags = Vec::new();
    if let Some(lr) = options.learning_rate {
        flags.push(TrainerFlag::value("learning_rate", lr));
    }
    if let Some(opt) = options.optimizer_type {
        flags.push(TrainerFlag::value("optimizer_type", opt.as_str()));
    }
    if let Some(norm) = options.max_gradient_norm {
        flags.push(TrainerFlag::value("max_gradient_norm", norm));
    }
    if let Some(rate) = options.dropout_rate {
        flags.push(TrainerFlag::value("dropout_rate", rate));
    }
    let switches = [
        ("use_dropout", options.use_dropout),
        ("use_bidirectional", options.use_bidirectional),
        ("use_fp16", options.use_fp16),
    ];
    for (name, value) in switches {
        if let Some(on) = value {
            flags.push(TrainerFlag::Switch { name, on });
        }
    }
    if let Some(name) = &options.logger_name {
        flags.push(TrainerFlag::value("logger_name", name));
    }
    flags
}

/// Flat argument vector passed after the trainer script.
pub fn trainer_args(config: &TrainConfig) -> Vec<String> {
    trainer_flags(config)
        .iter()
        .flat_map(TrainerFlag::tokens)
        .collect()
}

/// Quote `arg` for a POSIX shell when it contains anything unsafe.
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
