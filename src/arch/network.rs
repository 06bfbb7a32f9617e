use ndarray::{Array2, ArrayView2, Axis};

use super::{
    activations::{Softmax, Tanh},
    loss::{CrossEntropy, LossFn, L2},
    Grads, Params,
};
use crate::{backend::Backend, precision::Scalar};

/// What the forward pass leaves behind for the backward pass.
#[derive(Debug, Clone)]
pub struct Forward<F> {
    /// Hidden layer activations, `N x H`.
    pub a1: Array2<F>,
    /// Class probabilities, `N x 2`.
    pub probs: Array2<F>,
}

/// A dense `tanh` hidden layer followed by a dense softmax output layer, trained against
/// cross-entropy with an L2 penalty on the weights.
///
/// The network holds no parameters, they are handed in on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoLayerNet {
    backend: Backend,
    hidden_act: Tanh,
    output_act: Softmax,
    loss_fn: CrossEntropy,
    l2: L2,
}

impl TwoLayerNet {
    /// Returns a new `TwoLayerNet`.
    ///
    /// # Arguments
    /// * `backend` - Where the element-wise kernels run.
    /// * `l2` - The weight penalty added to the loss.
    pub fn new(backend: Backend, l2: L2) -> Self {
        Self {
            backend,
            l2,
            ..Default::default()
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Makes a forward pass through the network.
    ///
    /// `x` must be `N x 2` and `params` must have consistent shapes, the caller checks both.
    pub fn forward<F: Scalar>(&self, params: &Params<F>, x: ArrayView2<F>) -> Forward<F> {
        let mut a1 = x.dot(&params.w1) + &params.b1;
        self.hidden_act.forward(self.backend, &mut a1);

        let mut probs = a1.dot(&params.w2) + &params.b2;
        self.output_act.forward(self.backend, &mut probs);

        Forward { a1, probs }
    }

    /// The regularized loss of the probabilities `probs` against the one-hot labels `y`.
    pub fn loss<F: Scalar>(
        &self,
        params: &Params<F>,
        probs: ArrayView2<F>,
        y: ArrayView2<F>,
    ) -> F {
        self.loss_fn.loss(probs, y) + self.l2.penalty(params, y.nrows())
    }

    /// Backpropagates the loss of a forward pass, returning its gradient with respect to every
    /// parameter.
    ///
    /// # Arguments
    /// * `params` - The parameters `fwd` was computed with.
    /// * `x` - The input of the forward pass.
    /// * `y` - The one-hot labels.
    /// * `fwd` - The forward pass over `x`.
    pub fn backward<F: Scalar>(
        &self,
        params: &Params<F>,
        x: ArrayView2<F>,
        y: ArrayView2<F>,
        fwd: &Forward<F>,
    ) -> Grads<F> {
        let reg = self.l2.grad_scale::<F>(x.nrows());

        let delta2 = self.loss_fn.loss_prime(fwd.probs.view(), y);
        let mut dw2 = fwd.a1.t().dot(&delta2);
        dw2.scaled_add(reg, &params.w2);
        let db2 = delta2.sum_axis(Axis(0));

        let mut delta1 = delta2.dot(&params.w2.t());
        self.hidden_act.backward(self.backend, &mut delta1, &fwd.a1);
        let mut dw1 = x.t().dot(&delta1);
        dw1.scaled_add(reg, &params.w1);
        let db1 = delta1.sum_axis(Axis(0));

        Grads {
            w1: dw1,
            b1: db1,
            w2: dw2,
            b2: db2,
        }
    }
}
