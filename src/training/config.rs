use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::{backend::Backend, precision::Precision};

/// The immutable knobs of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    pub learning_rate: f64,
    pub reg_lambda: f64,
    pub hidden: usize,
    pub passes: usize,
    /// Seed of the parameter initialization.
    pub seed: u64,
}

/// Everything a run needs, as read from a JSON file.
///
/// Every field is optional, missing ones take the reference values of [`TrainingConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Amount of moons samples to generate.
    pub samples: usize,
    /// Standard deviation of the noise added to the samples.
    pub noise: f64,
    pub data_seed: u64,
    pub hidden: usize,
    pub learning_rate: f64,
    pub reg_lambda: f64,
    pub passes: usize,
    /// Report the loss every this many steps, `null` to never report.
    pub report_interval: Option<NonZeroUsize>,
    pub init_seed: u64,
    pub precision: Precision,
    pub backend: Backend,
    /// Where to write the run summary as JSON, if anywhere.
    pub history_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 5000,
            noise: 0.20,
            data_seed: 0,
            hidden: 1000,
            learning_rate: 0.01,
            reg_lambda: 0.01,
            passes: 20000,
            report_interval: NonZeroUsize::new(1000),
            init_seed: 0,
            precision: Precision::default(),
            backend: Backend::default(),
            history_path: None,
        }
    }
}

impl TrainingConfig {
    /// Parses a config from a JSON string.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("invalid training config")
    }

    /// Loads a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;

        Self::from_json_str(&content).with_context(|| format!("in '{}'", path.display()))
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            learning_rate: self.learning_rate,
            reg_lambda: self.reg_lambda,
            hidden: self.hidden,
            passes: self.passes,
            seed: self.init_seed,
        }
    }
}
