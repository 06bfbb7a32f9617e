mod config;
mod report;
mod run;
mod trainer;

pub use config::{Hyperparameters, TrainingConfig};
pub use report::LossReport;
pub use run::{run, write_summary, RunSummary};
pub use trainer::Trainer;
