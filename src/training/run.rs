use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use super::{LossReport, Trainer, TrainingConfig};
use crate::{
    Result,
    dataset::Dataset,
    precision::{Precision, Scalar},
};

/// The outcome of a full training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub precision: Precision,
    pub reports: Vec<LossReport>,
    /// Accuracy over the training set once training is over, `None` if training diverged.
    pub accuracy: Option<f64>,
}

/// Generates the dataset, trains on it and measures the final accuracy, all as `config` says.
///
/// The precision is picked here once, every array of the run is stored with it. If training
/// diverges, the summary of the reports made until then is still written to the history file
/// before the error is returned.
pub fn run(config: &TrainingConfig) -> anyhow::Result<RunSummary> {
    let (summary, outcome) = match config.precision {
        Precision::F32 => run_with::<f32>(config)?,
        Precision::F64 => run_with::<f64>(config)?,
    };

    if let Some(path) = &config.history_path {
        write_summary(path, &summary)?;
        info!("run summary written to '{}'", path.display());
    }

    outcome.context("training diverged")?;
    Ok(summary)
}

fn run_with<F: Scalar>(config: &TrainingConfig) -> anyhow::Result<(RunSummary, Result<()>)> {
    let dataset = Dataset::<F>::moons(config.samples, config.noise, config.data_seed)
        .context("cannot generate the moons dataset")?;

    let mut trainer = Trainer::new(dataset, config.hyperparameters(), config.backend)
        .context("cannot build the trainer")?;

    let outcome = trainer
        .train(config.passes, config.report_interval)
        .map(|_| ());

    let accuracy = match outcome {
        Ok(()) => {
            let dataset = trainer.dataset();
            let accuracy = trainer.accuracy(dataset.x(), dataset.labels())?;
            info!("training accuracy: {:.2}%", accuracy * 100.0);
            Some(accuracy)
        }
        Err(_) => {
            warn!("no accuracy measured, {} reports kept", trainer.history().len());
            None
        }
    };

    let summary = RunSummary {
        precision: F::PRECISION,
        reports: trainer.history().to_vec(),
        accuracy,
    };

    Ok((summary, outcome))
}

/// Writes `summary` as pretty printed JSON.
pub fn write_summary(path: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("cannot write '{}'", path.display()))
}
