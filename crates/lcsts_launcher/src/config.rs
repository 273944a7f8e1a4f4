//! Trainer Configuration
//!
//! The flat record handed to `train.py`, its built-in LCSTS constants,
//! and JSON (de)serialization.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Model architecture selected by the trainer
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelClass {
    PointerGenerator,
    Seq2seq,
}

impl ModelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelClass::PointerGenerator => "pointer_generator",
            ModelClass::Seq2seq => "seq2seq",
        }
    }
}

/// Recurrent cell used by encoder and decoder
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Gru,
    Lstm,
    Rnn,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Gru => "gru",
            CellType::Lstm => "lstm",
            CellType::Rnn => "rnn",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerType {
    Adam,
}

impl OptimizerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerType::Adam => "adam",
        }
    }
}

/// Optional hyperparameters read by the model code. Absent values are
/// left to the trainer's own defaults.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_type: Option<OptimizerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_gradient_norm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropout_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_dropout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_bidirectional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_fp16: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_name: Option<String>,
}

impl TrainerOptions {
    pub fn is_empty(&self) -> bool {
        *self == TrainerOptions::default()
    }
}

/// Configuration record passed to the external trainer.
///
/// Built once at start-up and moved into a [`crate::launcher::LaunchPlan`];
/// nothing on the launch path changes it afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrainConfig {
    pub model_class: ModelClass,
    // Model / training hyperparameters
    pub batch_size: usize,
    pub hidden_units: usize,
    pub embedding_size: usize,
    pub attention_units: usize,
    pub encoder_depth: usize,
    pub decoder_depth: usize,
    pub encoder_max_time_steps: usize,
    pub decoder_max_time_steps: usize,
    // Cadence (in steps)
    pub display_freq: usize,
    pub save_freq: usize,
    pub valid_freq: usize,
    // Checkpoint output
    pub model_dir: PathBuf,
    pub model_name: String,
    // Vocabularies and datasets
    pub source_vocabulary: PathBuf,
    pub target_vocabulary: PathBuf,
    pub source_train_data: PathBuf,
    pub target_train_data: PathBuf,
    pub source_valid_data: PathBuf,
    pub target_valid_data: PathBuf,
    pub encoder_vocab_size: usize,
    pub decoder_vocab_size: usize,
    pub cell_type: CellType,
    pub max_epochs: usize,

    #[serde(default, skip_serializing_if = "TrainerOptions::is_empty")]
    pub options: TrainerOptions,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::lcsts_char()
    }
}

impl TrainConfig {
    /// Pointer-generator on LCSTS with the character-level vocabulary.
    pub fn lcsts_char() -> Self {
        Self {
            model_class: ModelClass::PointerGenerator,
            batch_size: 128,
            hidden_units: 500,
            embedding_size: 300,
            attention_units: 500,
            encoder_depth: 3,
            decoder_depth: 3,
            encoder_max_time_steps: 150,
            decoder_max_time_steps: 30,
            display_freq: 5,
            save_freq: 2000,
            valid_freq: 400,
            model_dir: PathBuf::from("checkpoints/lcsts_char"),
            model_name: "summary.ckpt".to_string(),
            source_vocabulary: PathBuf::from("dataset/lcsts/char/vocab.json"),
            target_vocabulary: PathBuf::from("dataset/lcsts/char/vocab.json"),
            source_train_data: PathBuf::from("dataset/lcsts/char/train.source.txt"),
            target_train_data: PathBuf::from("dataset/lcsts/char/train.target.txt"),
            source_valid_data: PathBuf::from("dataset/lcsts/char/valid.source.txt"),
            target_valid_data: PathBuf::from("dataset/lcsts/char/valid.target.txt"),
            encoder_vocab_size: 4000,
            decoder_vocab_size: 4000,
            cell_type: CellType::Gru,
            max_epochs: 10000,
            options: TrainerOptions::default(),
        }
    }

    /// Load a full record from a JSON file. Every core field is required.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Built-in record, or the one stored at `path` when given.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::lcsts_char()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Data and vocabulary files the trainer will open, keyed by flag name.
    pub fn input_files(&self) -> [(&'static str, &Path); 6] {
        [
            ("source_vocabulary", self.source_vocabulary.as_path()),
            ("target_vocabulary", self.target_vocabulary.as_path()),
            ("source_train_data", self.source_train_data.as_path()),
            ("target_train_data", self.target_train_data.as_path()),
            ("source_valid_data", self.source_valid_data.as_path()),
            ("target_valid_data", self.target_valid_data.as_path()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_record() {
        let config = TrainConfig::lcsts_char();
        assert_eq!(config.model_class, ModelClass::PointerGenerator);
        assert_eq!(config.cell_type, CellType::Gru);
        assert_eq!(config.encoder_vocab_size, config.decoder_vocab_size);
        assert_eq!(config.source_vocabulary, config.target_vocabulary);
        assert!(config.options.is_empty());
        assert_eq!(TrainConfig::default(), config);
    }

    #[test]
    fn test_json_roundtrip_and_options() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");

        let mut config = TrainConfig::lcsts_char();
        config.options.learning_rate = Some(1e-3);
        config.options.use_bidirectional = Some(true);
        config.save(&path)?;

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(json["options"]["learning_rate"], 1e-3);
        assert_eq!(json["model_class"], "pointer_generator");
        assert!(json["options"].get("dropout_rate").is_none());

        assert_eq!(TrainConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_missing_core_field_rejected() {
        let mut json = serde_json::to_value(TrainConfig::lcsts_char()).unwrap();
        json.as_object_mut().unwrap().remove("batch_size");
        assert!(serde_json::from_value::<TrainConfig>(json).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut json = serde_json::to_value(TrainConfig::lcsts_char()).unwrap();
        json["beam_width"] = serde_json::json!(5);
        assert!(serde_json::from_value::<TrainConfig>(json).is_err());
    }

    #[test]
    fn test_builtin_json_has_no_options() {
        let json = serde_json::to_value(TrainConfig::lcsts_char()).unwrap();
        assert!(json.get("options").is_none());
        assert_eq!(json["cell_type"], "gru");
    }

    #[test]
    fn test_resolve_without_path() -> Result<()> {
        assert_eq!(TrainConfig::resolve(None)?, TrainConfig::lcsts_char());
        Ok(())
    }
}
