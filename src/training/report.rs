use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The loss of the whole dataset measured after a given training step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossReport {
    pub iteration: usize,
    pub loss: f64,
}

impl Display for LossReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loss after iteration {}: {}", self.iteration, self.loss)
    }
}
