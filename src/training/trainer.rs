use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::{num::NonZeroUsize, time::Instant};

use super::{Hyperparameters, LossReport};
use crate::{
    arch::{check_hidden, loss::L2, Params, TwoLayerNet},
    backend::Backend,
    dataset::{Dataset, CLASSES, FEATURES},
    optimization::{GradientDescent, Optimizer},
    precision::Scalar,
    MlErr, Result,
};

/// Trains a two layer classifier on a fixed dataset with full-batch gradient descent.
///
/// The trainer exclusively owns the parameters; they are only ever changed by
/// [`Trainer::initialize`], [`Trainer::gradient_step`] and [`Trainer::set_params`].
pub struct Trainer<F: Scalar> {
    net: TwoLayerNet,
    params: Params<F>,
    optimizer: GradientDescent<F>,
    dataset: Dataset<F>,
    hyper: Hyperparameters,
    history: Vec<LossReport>,
}

impl<F: Scalar> Trainer<F> {
    /// Returns a new `Trainer` with freshly initialized parameters.
    ///
    /// # Arguments
    /// * `dataset` - The data every gradient step is computed over.
    /// * `hyper` - The hyperparameters of the run, `hyper.seed` seeds the initialization.
    /// * `backend` - Where element-wise kernels run.
    ///
    /// # Returns
    /// A new `Trainer`, or an error if the hidden width is zero or the dataset is empty.
    pub fn new(dataset: Dataset<F>, hyper: Hyperparameters, backend: Backend) -> Result<Self> {
        check_hidden(hyper.hidden)?;

        if dataset.is_empty() {
            return Err(MlErr::InvalidDimension {
                what: "dataset rows",
                got: 0,
                expected: 1,
            });
        }

        info!(
            "trainer ready: {} samples, {} hidden units, {} precision, {backend} backend",
            dataset.len(),
            hyper.hidden,
            F::PRECISION,
        );

        Ok(Self {
            net: TwoLayerNet::new(backend, L2::new(hyper.reg_lambda)),
            params: Params::sample(hyper.hidden, hyper.seed),
            optimizer: GradientDescent::new(hyper.learning_rate),
            dataset,
            hyper,
            history: Vec::new(),
        })
    }

    /// Resets the parameters: weights to `N(0, 1) / sqrt(fan_in)`, biases to zero.
    ///
    /// The loss history starts over as well.
    pub fn initialize(&mut self, seed: u64) {
        debug!("initializing parameters with seed {seed}");
        self.params = Params::sample(self.hyper.hidden, seed);
        self.history.clear();
    }

    /// Class probabilities for every row of `x`.
    ///
    /// # Returns
    /// An `N x 2` matrix whose rows sum to one, or an error if `x` isn't `N x 2` or the
    /// probabilities aren't finite.
    pub fn forward(&self, x: ArrayView2<F>) -> Result<Array2<F>> {
        check_features(&x)?;

        let probs = self.net.forward(&self.params, x).probs;
        if !probs.iter().all(|p| p.is_finite()) {
            return Err(MlErr::NonFiniteValue {
                what: "probabilities",
            });
        }

        Ok(probs)
    }

    /// Mean cross-entropy of the predictions for `x` against the one-hot labels `y`, plus the L2
    /// weight penalty.
    ///
    /// Runs a full forward pass, so it is meant for occasional diagnostics.
    pub fn loss(&self, x: ArrayView2<F>, y: ArrayView2<F>) -> Result<F> {
        check_features(&x)?;
        check_labels(&x, &y)?;

        let fwd = self.net.forward(&self.params, x);
        let loss = self.net.loss(&self.params, fwd.probs.view(), y);
        if !loss.is_finite() {
            return Err(MlErr::NonFiniteValue { what: "loss" });
        }

        Ok(loss)
    }

    /// The most likely class of every row of `x`.
    pub fn predict(&self, x: ArrayView2<F>) -> Result<Array1<usize>> {
        let probs = self.forward(x)?;
        Ok(argmax_rows(probs.view()))
    }

    /// The fraction of rows of `x` whose predicted class is the one in `labels`.
    pub fn accuracy(&self, x: ArrayView2<F>, labels: ArrayView1<usize>) -> Result<f64> {
        if labels.len() != x.nrows() {
            return Err(MlErr::InvalidDimension {
                what: "labels",
                got: labels.len(),
                expected: x.nrows(),
            });
        }

        let predicted = self.predict(x)?;
        let hits = predicted.iter().zip(labels).filter(|(p, l)| p == l).count();

        Ok(hits as f64 / labels.len() as f64)
    }

    /// Makes one gradient descent step over the whole dataset.
    ///
    /// The gradients of all four parameters are computed from the current snapshot before any of
    /// them is updated.
    pub fn gradient_step(&mut self) {
        let (x, y) = (self.dataset.x(), self.dataset.y());

        let fwd = self.net.forward(&self.params, x);
        let grads = self.net.backward(&self.params, x, y, &fwd);
        self.optimizer.update_params(&mut self.params, &grads);
    }

    /// Makes `num_passes` gradient steps.
    ///
    /// If `report_interval` is set, the loss over the dataset is measured after every step whose
    /// index is a multiple of it, starting with step 0, and printed to stdout. Every report is
    /// also appended to [`Trainer::history`].
    ///
    /// # Returns
    /// The losses reported by this call, or an error as soon as one of them is not finite. The
    /// reports made before the failure stay in the history.
    pub fn train(
        &mut self,
        num_passes: usize,
        report_interval: Option<NonZeroUsize>,
    ) -> Result<Vec<LossReport>> {
        let mut reports = Vec::new();
        let start = Instant::now();

        for i in 0..num_passes {
            self.gradient_step();

            let Some(interval) = report_interval else {
                continue;
            };

            if i % interval.get() == 0 {
                let loss = match self.loss(self.dataset.x(), self.dataset.y()) {
                    Ok(loss) => loss,
                    Err(e) => {
                        warn!(
                            "training diverged at iteration {i}: {e}, {} reports kept in the history",
                            self.history.len()
                        );
                        return Err(e);
                    }
                };

                let report = LossReport {
                    iteration: i,
                    loss: loss.as_f64(),
                };

                println!("{report}");
                info!("{report}");
                self.history.push(report);
                reports.push(report);
            }
        }

        let elapsed = start.elapsed();
        if num_passes > 0 {
            info!(
                "{num_passes} gradient steps in {elapsed:.2?} ({:.2?} per step)",
                elapsed.div_f64(num_passes as f64)
            );
        }

        Ok(reports)
    }

    /// Every loss reported since the trainer was built or last initialized.
    pub fn history(&self) -> &[LossReport] {
        &self.history
    }

    pub fn params(&self) -> &Params<F> {
        &self.params
    }

    /// Replaces the parameters, checking their shapes against the configured hidden width first.
    pub fn set_params(&mut self, params: Params<F>) -> Result<()> {
        params.check_shapes(self.hyper.hidden)?;
        self.params = params;
        Ok(())
    }

    pub fn dataset(&self) -> &Dataset<F> {
        &self.dataset
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    pub fn backend(&self) -> Backend {
        self.net.backend()
    }
}

fn check_features<F>(x: &ArrayView2<F>) -> Result<()> {
    if x.ncols() != FEATURES {
        return Err(MlErr::InvalidDimension {
            what: "features",
            got: x.ncols(),
            expected: FEATURES,
        });
    }

    Ok(())
}

fn check_labels<F>(x: &ArrayView2<F>, y: &ArrayView2<F>) -> Result<()> {
    if y.nrows() != x.nrows() {
        return Err(MlErr::InvalidDimension {
            what: "label rows",
            got: y.nrows(),
            expected: x.nrows(),
        });
    }

    if y.ncols() != CLASSES {
        return Err(MlErr::InvalidDimension {
            what: "label columns",
            got: y.ncols(),
            expected: CLASSES,
        });
    }

    Ok(())
}

/// Index of the largest value of every row, ties going to the lowest index.
fn argmax_rows<F: Scalar>(probs: ArrayView2<F>) -> Array1<usize> {
    probs.map_axis(Axis(1), |row| {
        row.indexed_iter()
            .fold((0, F::neg_infinity()), |(best, max), (i, &p)| {
                if p > max {
                    (i, p)
                } else {
                    (best, max)
                }
            })
            .0
    })
}
