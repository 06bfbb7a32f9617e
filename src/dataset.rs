use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::RandomExt;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rand_distr::Normal;
use std::f64::consts::PI;

use crate::{precision::Scalar, MlErr, Result};

/// Width of every feature vector.
pub const FEATURES: usize = 2;

/// Number of classes, which is also the width of every one-hot label.
pub const CLASSES: usize = 2;

/// Generates the two interleaving half circles dataset.
///
/// The first `samples / 2` points lie on the outer moon and get label `0`, the rest lie on the
/// inner moon and get label `1`. Rows are shuffled and then perturbed with gaussian noise of
/// standard deviation `noise`, both driven by `seed`.
///
/// # Arguments
/// * `samples` - The total amount of points.
/// * `noise` - The standard deviation of the noise added to every coordinate.
/// * `seed` - The seed of the random number generator.
///
/// # Returns
/// The `samples x 2` feature matrix and the class index of every row, or an error if `noise` is
/// negative or not finite.
pub fn make_moons(samples: usize, noise: f64, seed: u64) -> Result<(Array2<f64>, Array1<usize>)> {
    let invalid = || MlErr::InvalidHyperparameter {
        name: "noise",
        value: noise,
    };
    if !noise.is_finite() || noise < 0.0 {
        return Err(invalid());
    }
    let noise_dist = Normal::new(0.0, noise).map_err(|_| invalid())?;

    let n_outer = samples / 2;
    let n_inner = samples - n_outer;

    let outer = half_circle(n_outer).map(|t| ([t.cos(), t.sin()], 0));
    let inner = half_circle(n_inner).map(|t| ([1.0 - t.cos(), 1.0 - t.sin() - 0.5], 1));
    let mut points: Vec<_> = outer.chain(inner).collect();

    let mut rng = StdRng::seed_from_u64(seed);
    points.shuffle(&mut rng);

    let mut x = Array2::<f64>::zeros((samples, FEATURES));
    let mut labels = Array1::<usize>::zeros(samples);
    for (i, ([a, b], label)) in points.into_iter().enumerate() {
        x[[i, 0]] = a;
        x[[i, 1]] = b;
        labels[i] = label;
    }

    let jitter: Array2<f64> = Array2::random_using(x.dim(), noise_dist, &mut rng);
    x += &jitter;

    debug!("generated {samples} moons samples (noise {noise}, seed {seed})");
    Ok((x, labels))
}

/// `n` evenly spaced angles over `[0, pi]`, both ends included.
fn half_circle(n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { PI / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| i as f64 * step)
}

/// One-hot encodes class indices.
///
/// # Arguments
/// * `labels` - The class index of every row.
/// * `classes` - The amount of classes, i.e. the width of the output.
///
/// # Returns
/// A `labels.len() x classes` matrix with a single `1.0` per row, or an error if a label is out of
/// range.
pub fn one_hot(labels: ArrayView1<usize>, classes: usize) -> Result<Array2<f64>> {
    let mut y = Array2::zeros((labels.len(), classes));

    for (i, &label) in labels.iter().enumerate() {
        if label >= classes {
            return Err(MlErr::InvalidDimension {
                what: "class label",
                got: label,
                expected: classes,
            });
        }

        y[[i, label]] = 1.0;
    }

    Ok(y)
}

/// A labelled classification dataset, stored with the precision of the run.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset<F> {
    x: Array2<F>,
    y: Array2<F>,
    labels: Array1<usize>,
}

impl<F: Scalar> Dataset<F> {
    /// Creates a new `Dataset`, casting the features to `F` and one-hot encoding the labels.
    ///
    /// # Arguments
    /// * `x` - The `N x 2` feature matrix.
    /// * `labels` - The class index of every row.
    ///
    /// # Returns
    /// A new `Dataset` or an error if the shapes don't agree.
    pub fn new(x: Array2<f64>, labels: Array1<usize>) -> Result<Self> {
        if x.ncols() != FEATURES {
            return Err(MlErr::InvalidDimension {
                what: "features",
                got: x.ncols(),
                expected: FEATURES,
            });
        }

        if labels.len() != x.nrows() {
            return Err(MlErr::InvalidDimension {
                what: "labels",
                got: labels.len(),
                expected: x.nrows(),
            });
        }

        let y = one_hot(labels.view(), CLASSES)?;

        Ok(Self {
            x: x.mapv(F::cast),
            y: y.mapv(F::cast),
            labels,
        })
    }

    /// Generates the moons dataset and stores it with precision `F`.
    ///
    /// See [`make_moons`].
    pub fn moons(samples: usize, noise: f64, seed: u64) -> Result<Self> {
        let (x, labels) = make_moons(samples, noise, seed)?;
        Self::new(x, labels)
    }

    /// The `N x 2` feature matrix.
    pub fn x(&self) -> ArrayView2<'_, F> {
        self.x.view()
    }

    /// The `N x 2` one-hot label matrix.
    pub fn y(&self) -> ArrayView2<'_, F> {
        self.y.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, usize> {
        self.labels.view()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn moons_are_balanced_and_deterministic() {
        let (x1, l1) = make_moons(101, 0.2, 7).unwrap();
        let (x2, l2) = make_moons(101, 0.2, 7).unwrap();

        assert_eq!(x1.dim(), (101, 2));
        assert_eq!(x1, x2);
        assert_eq!(l1, l2);
        assert_eq!(l1.iter().filter(|&&l| l == 0).count(), 50);
        assert_eq!(l1.iter().filter(|&&l| l == 1).count(), 51);
    }

    #[test]
    fn noiseless_moons_lie_on_their_circles() {
        let (x, labels) = make_moons(40, 0.0, 0).unwrap();

        for (row, &label) in x.rows().into_iter().zip(&labels) {
            let (cx, cy) = if label == 0 { (0.0, 0.0) } else { (1.0, 0.5) };
            let r = ((row[0] - cx).powi(2) + (row[1] - cy).powi(2)).sqrt();
            assert!((r - 1.0).abs() < 1e-12, "point {row} is off its circle");
        }
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        let (_, l1) = make_moons(50, 0.2, 0).unwrap();
        let (_, l2) = make_moons(50, 0.2, 1).unwrap();
        assert_ne!(l1, l2);
    }

    #[test]
    fn negative_noise_is_rejected() {
        let err = make_moons(10, -1.0, 0).unwrap_err();
        assert_eq!(
            err,
            MlErr::InvalidHyperparameter {
                name: "noise",
                value: -1.0
            }
        );
    }

    #[test]
    fn non_finite_noise_is_rejected() {
        for noise in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = make_moons(10, noise, 0).unwrap_err();
            assert!(
                matches!(err, MlErr::InvalidHyperparameter { name: "noise", .. }),
                "noise {noise} gave {err:?}"
            );
        }
    }

    #[test]
    fn zero_noise_is_allowed() {
        assert!(make_moons(10, 0.0, 0).is_ok());
    }

    #[test]
    fn one_hot_sets_a_single_one_per_row() {
        let y = one_hot(array![1, 0, 1].view(), 2).unwrap();
        assert_eq!(y, array![[0.0, 1.0], [1.0, 0.0], [0.0, 1.0]]);

        assert!(one_hot(array![2].view(), 2).is_err());
    }

    #[test]
    fn dataset_casts_and_validates() {
        let x = array![[0.1, 0.2], [0.3, 0.4]];
        let ds = Dataset::<f32>::new(x, array![0, 1]).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.x()[[0, 1]], 0.2_f32);
        assert_eq!(ds.y(), array![[1.0_f32, 0.0], [0.0, 1.0]]);

        let err = Dataset::<f64>::new(array![[0.1, 0.2, 0.3]], array![0]).unwrap_err();
        assert!(matches!(err, MlErr::InvalidDimension { what: "features", .. }));

        let err = Dataset::<f64>::new(array![[0.1, 0.2]], array![0, 1]).unwrap_err();
        assert!(matches!(err, MlErr::InvalidDimension { what: "labels", .. }));
    }
}
