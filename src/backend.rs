//! Compute backend selection.
//!
//! A `Backend` decides where element-wise kernels run: on the calling thread, or split over a
//! rayon pool. Each element (or row) is computed by the same closure in both modes, so switching
//! backends never changes a result, only how long it takes.
//!
//! Matrix products always go through `ndarray`'s `dot`.

use ndarray::{Array2, ArrayViewMut1, Zip};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::precision::Scalar;

/// Where element-wise work is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Everything runs on the calling thread.
    #[default]
    Serial,
    /// Element-wise kernels are spread across rayon's global pool.
    Parallel,
}

impl Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Serial => write!(f, "serial"),
            Backend::Parallel => write!(f, "parallel"),
        }
    }
}

impl Backend {
    /// Replaces every element `x` of `xs` with `f(x)`.
    pub fn map_inplace<F, M>(self, xs: &mut Array2<F>, f: M)
    where
        F: Scalar,
        M: Fn(F) -> F + Sync + Send,
    {
        match self {
            Backend::Serial => xs.mapv_inplace(f),
            Backend::Parallel => xs.par_mapv_inplace(f),
        }
    }

    /// Calls `f` on every pair of elements of `xs` and `ys` sharing an index.
    ///
    /// # Panics
    /// If `xs` and `ys` don't have the same shape.
    pub fn zip_inplace<F, M>(self, xs: &mut Array2<F>, ys: &Array2<F>, f: M)
    where
        F: Scalar,
        M: Fn(&mut F, &F) + Sync + Send,
    {
        let zip = Zip::from(xs).and(ys);

        match self {
            Backend::Serial => zip.for_each(f),
            Backend::Parallel => zip.par_for_each(f),
        }
    }

    /// Calls `f` on every row of `xs`.
    pub fn rows_inplace<F, M>(self, xs: &mut Array2<F>, f: M)
    where
        F: Scalar,
        M: Fn(ArrayViewMut1<F>) + Sync + Send,
    {
        let zip = Zip::from(xs.rows_mut());

        match self {
            Backend::Serial => zip.for_each(f),
            Backend::Parallel => zip.par_for_each(f),
        }
    }
}
