use super::Optimizer;
use crate::{
    arch::{Grads, Params},
    precision::Scalar,
};

/// Gradient descent optimization algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent<F> {
    learning_rate: F,
}

impl<F: Scalar> GradientDescent<F> {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate: F::cast(learning_rate),
        }
    }
}

impl<F: Scalar> Optimizer<F> for GradientDescent<F> {
    /// Updates the parameters according to the algorithm's learning rule, that is, making a step in
    /// the opposite direction of the gradient, with a length of `learning_rate`.
    ///
    /// # Arguments
    /// * `params` - The parameters that are going to be modified.
    /// * `grads` - The gradient used for taking the step.
    fn update_params(&mut self, params: &mut Params<F>, grads: &Grads<F>) {
        let step = -self.learning_rate;

        params.w1.scaled_add(step, &grads.w1);
        params.b1.scaled_add(step, &grads.b1);
        params.w2.scaled_add(step, &grads.w2);
        params.b2.scaled_add(step, &grads.b2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_against_the_gradient() {
        let mut params = Params::<f64>::zeros(2);
        let mut grads = Params::<f64>::zeros(2);
        grads.w1.fill(1.0);
        grads.b1.fill(-2.0);
        grads.w2.fill(0.5);
        grads.b2.fill(4.0);

        let mut gd = GradientDescent::<f64>::new(0.25);
        gd.update_params(&mut params, &grads);

        assert!(params.w1.iter().all(|&w| w == -0.25));
        assert!(params.b1.iter().all(|&b| b == 0.5));
        assert!(params.w2.iter().all(|&w| w == -0.125));
        assert!(params.b2.iter().all(|&b| b == -1.0));
    }

    #[test]
    fn zero_gradient_leaves_params_alone() {
        let mut params = Params::<f32>::init(3, 1).unwrap();
        let before = params.clone();

        GradientDescent::<f32>::new(10.0).update_params(&mut params, &Params::zeros(3));
        assert_eq!(params, before);
    }
}
