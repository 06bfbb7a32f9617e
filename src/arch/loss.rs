use ndarray::{Array2, ArrayView2, Zip};

use super::Params;
use crate::precision::Scalar;

pub trait LossFn {
    /// The loss of `y_pred` against the expected `y`, averaged over the rows.
    fn loss<F: Scalar>(&self, y_pred: ArrayView2<F>, y: ArrayView2<F>) -> F;

    /// The gradient of `loss` with respect to the layer input that produced `y_pred`.
    fn loss_prime<F: Scalar>(&self, y_pred: ArrayView2<F>, y: ArrayView2<F>) -> Array2<F>;
}

/// Categorical cross-entropy over softmax probabilities.
#[derive(Default, Clone, Copy, Debug)]
pub struct CrossEntropy;

impl LossFn for CrossEntropy {
    /// Mean negative log-likelihood of the true classes.
    ///
    /// Entries where `y` is zero contribute nothing, even if the predicted probability
    /// underflowed to zero.
    fn loss<F: Scalar>(&self, y_pred: ArrayView2<F>, y: ArrayView2<F>) -> F {
        let n = F::cast(y.nrows() as f64);
        let nll = Zip::from(&y_pred)
            .and(&y)
            .fold(F::zero(), |acc, &p, &t| {
                if t == F::zero() {
                    acc
                } else {
                    acc - t * p.ln()
                }
            });

        nll / n
    }

    /// Softmax and cross-entropy differentiate together into `(p - y) / N` with respect to the
    /// logits, which is what this returns.
    fn loss_prime<F: Scalar>(&self, y_pred: ArrayView2<F>, y: ArrayView2<F>) -> Array2<F> {
        let n = F::cast(y.nrows() as f64);
        (&y_pred - &y).mapv_into(|d| d / n)
    }
}

/// L2 weight penalty, `(lambda / 2) * (sum(W1^2) + sum(W2^2)) / N`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct L2 {
    lambda: f64,
}

impl L2 {
    /// Returns a new `L2` with strength `lambda`.
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    /// The penalty for `params` on a batch of `n` rows.
    pub fn penalty<F: Scalar>(&self, params: &Params<F>, n: usize) -> F {
        F::cast(self.lambda / 2.0) * params.weights_sq_sum() / F::cast(n as f64)
    }

    /// The factor `lambda / N` that the penalty's gradient multiplies each weight by.
    pub fn grad_scale<F: Scalar>(&self, n: usize) -> F {
        F::cast(self.lambda / n as f64)
    }
}
