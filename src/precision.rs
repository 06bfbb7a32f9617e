use ndarray::NdFloat;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The floating point width every parameter and data array of a run is stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    F32,
    F64,
}

impl Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::F32 => write!(f, "f32"),
            Precision::F64 => write!(f, "f64"),
        }
    }
}

/// A float type arrays can be stored with.
///
/// Everything generic over `Scalar` is monomorphized once per run, so an `f32` trainer can never
/// be handed an `f64` array and silently widen its results.
pub trait Scalar: NdFloat {
    /// The `Precision` this type stands for.
    const PRECISION: Precision;

    /// Converts an `f64` into this type, rounding if needed.
    fn cast(value: f64) -> Self;

    /// Widens this value into an `f64`.
    fn as_f64(self) -> f64;
}

impl Scalar for f32 {
    const PRECISION: Precision = Precision::F32;

    fn cast(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    const PRECISION: Precision = Precision::F64;

    fn cast(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }
}
