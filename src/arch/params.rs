use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::StandardNormal;

use crate::{
    dataset::{CLASSES, FEATURES},
    precision::Scalar,
    MlErr, Result,
};

/// The parameters of a two layer network with a hidden layer of width `H`.
///
/// The same struct holds the gradients of the loss with respect to each parameter, see [`Grads`].
#[derive(Debug, Clone, PartialEq)]
pub struct Params<F> {
    /// First layer weights, `2 x H`.
    pub w1: Array2<F>,
    /// First layer biases, `H`.
    pub b1: Array1<F>,
    /// Second layer weights, `H x 2`.
    pub w2: Array2<F>,
    /// Second layer biases, `2`.
    pub b2: Array1<F>,
}

/// Gradients share the exact layout of the parameters they belong to.
pub type Grads<F> = Params<F>;

/// Rejects a zero hidden width.
pub fn check_hidden(hidden: usize) -> Result<()> {
    if hidden == 0 {
        return Err(MlErr::InvalidDimension {
            what: "hidden width",
            got: 0,
            expected: 1,
        });
    }

    Ok(())
}

impl<F: Scalar> Params<F> {
    /// Initializes the parameters of a network with `hidden` hidden units.
    ///
    /// Weights are drawn from `N(0, 1) / sqrt(fan_in)` and biases start at zero. The draws are
    /// made in `f64` and then cast, so the same `seed` yields the same starting point for every
    /// precision up to rounding.
    ///
    /// # Arguments
    /// * `hidden` - The width of the hidden layer.
    /// * `seed` - The seed of the random number generator.
    ///
    /// # Returns
    /// The initialized parameters, or an error if `hidden` is zero.
    pub fn init(hidden: usize, seed: u64) -> Result<Self> {
        check_hidden(hidden)?;
        Ok(Self::sample(hidden, seed))
    }

    /// Same as `init`, for a `hidden` width that was already checked.
    pub(crate) fn sample(hidden: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let w1 = scaled_normal((FEATURES, hidden), &mut rng);
        let w2 = scaled_normal((hidden, CLASSES), &mut rng);

        Self {
            w1,
            b1: Array1::zeros(hidden),
            w2,
            b2: Array1::zeros(CLASSES),
        }
    }

    /// Returns parameters of the right shapes, all set to zero.
    pub fn zeros(hidden: usize) -> Self {
        Self {
            w1: Array2::zeros((FEATURES, hidden)),
            b1: Array1::zeros(hidden),
            w2: Array2::zeros((hidden, CLASSES)),
            b2: Array1::zeros(CLASSES),
        }
    }

    /// The width of the hidden layer.
    pub fn hidden(&self) -> usize {
        self.b1.len()
    }

    /// Checks every array against the shapes a network with `hidden` hidden units must have.
    pub fn check_shapes(&self, hidden: usize) -> Result<()> {
        check_hidden(hidden)?;

        let dims = [
            ("w1 rows", self.w1.nrows(), FEATURES),
            ("w1 columns", self.w1.ncols(), hidden),
            ("b1", self.b1.len(), hidden),
            ("w2 rows", self.w2.nrows(), hidden),
            ("w2 columns", self.w2.ncols(), CLASSES),
            ("b2", self.b2.len(), CLASSES),
        ];

        for (what, got, expected) in dims {
            if got != expected {
                return Err(MlErr::InvalidDimension {
                    what,
                    got,
                    expected,
                });
            }
        }

        Ok(())
    }

    /// The sum of the squares of every weight, biases excluded.
    pub fn weights_sq_sum(&self) -> F {
        let sq = |acc: F, &w: &F| acc + w * w;
        self.w1.fold(F::zero(), sq) + self.w2.fold(F::zero(), sq)
    }
}

fn scaled_normal<F: Scalar>(dim: (usize, usize), rng: &mut StdRng) -> Array2<F> {
    let scale = (dim.0 as f64).sqrt();
    Array2::<f64>::random_using(dim, StandardNormal, rng).mapv(|w| F::cast(w / scale))
}
