use ndarray::{Array2, ArrayViewMut1};

use crate::{backend::Backend, precision::Scalar};

/// Hyperbolic tangent, the activation of the hidden layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tanh;

impl Tanh {
    pub fn f<F: Scalar>(z: F) -> F {
        z.tanh()
    }

    /// The derivative of `tanh`, written in terms of its output `a = tanh(z)`.
    pub fn df<F: Scalar>(a: F) -> F {
        F::one() - a * a
    }

    /// Applies the activation to every element of `z`.
    pub fn forward<F: Scalar>(&self, backend: Backend, z: &mut Array2<F>) {
        backend.map_inplace(z, Self::f);
    }

    /// Multiplies the incoming deltas `d` by the derivative of the activation.
    ///
    /// # Arguments
    /// * `backend` - Where to run the kernel.
    /// * `d` - The deltas flowing back into this layer's output.
    /// * `a` - The activations computed by `forward`.
    pub fn backward<F: Scalar>(&self, backend: Backend, d: &mut Array2<F>, a: &Array2<F>) {
        backend.zip_inplace(d, a, |d, &a| *d = *d * Self::df(a));
    }
}

/// Row-wise softmax, turning the output layer's logits into class probabilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct Softmax;

impl Softmax {
    /// Turns every row of `z` into a probability distribution.
    pub fn forward<F: Scalar>(&self, backend: Backend, z: &mut Array2<F>) {
        backend.rows_inplace(z, softmax_row);
    }
}

// The row maximum is subtracted before exponentiating so large logits don't overflow.
fn softmax_row<F: Scalar>(mut row: ArrayViewMut1<F>) {
    let max = row.fold(F::neg_infinity(), |m, &v| m.max(v));
    row.mapv_inplace(|v| (v - max).exp());

    let sum = row.sum();
    row.mapv_inplace(|v| v / sum);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    fn logits() -> Array2<f64> {
        Array2::from_shape_fn((50, 2), |(i, j)| (i as f64 - 25.0) * if j == 0 { 0.3 } else { -0.7 })
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        for backend in [Backend::Serial, Backend::Parallel] {
            let mut z = logits();
            Softmax.forward(backend, &mut z);

            for s in z.sum_axis(Axis(1)) {
                assert!((s - 1.0).abs() < 1e-12, "row sums to {s}");
            }
            assert!(z.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn softmax_survives_large_logits() {
        let mut z = array![[1000.0_f32, 1000.0], [-1000.0, 0.0]];
        Softmax.forward(Backend::Serial, &mut z);

        assert_eq!(z, array![[0.5, 0.5], [0.0, 1.0]]);
    }

    #[test]
    fn tanh_backward_scales_by_derivative() {
        let a = array![[0.0_f64, 0.5], [-0.5, 1.0]];
        let mut d = Array2::from_elem((2, 2), 2.0);
        Tanh.backward(Backend::Serial, &mut d, &a);

        assert_eq!(d, array![[2.0, 1.5], [1.5, 0.0]]);
    }

    #[test]
    fn tanh_derivative_matches_finite_difference() {
        let h = 1e-6;
        for z in [-2.0_f64, -0.3, 0.0, 0.8, 1.7] {
            let numeric = (Tanh::f(z + h) - Tanh::f(z - h)) / (2.0 * h);
            let analytic = Tanh::df(Tanh::f(z));
            assert!((numeric - analytic).abs() < 1e-8, "z = {z}");
        }
    }
}
