//! Launcher for the LCSTS pointer-generator summarization trainer.
//!
//! Builds the trainer's flag set and starts `train.py` from the project
//! root. The model itself lives in the Python trainer.

pub mod cli;
pub mod config;
pub mod flags;
pub mod launcher;
pub mod logging;
pub mod script;
pub mod show;
pub mod validate;

pub use config::{CellType, ModelClass, OptimizerType, TrainConfig, TrainerOptions};
pub use launcher::{LaunchArgs, LaunchPlan};
