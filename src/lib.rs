//! Full-batch gradient descent training of a two layer `tanh`/softmax classifier on the two moons
//! dataset.
//!
//! Numeric precision (`f32` or `f64`) is chosen once per run through the [`precision::Scalar`]
//! type parameter, and element-wise work can be spread over a rayon pool with
//! [`backend::Backend::Parallel`]. Neither changes what is computed.

pub mod arch;
pub mod backend;
pub mod dataset;
pub mod error;
pub mod optimization;
pub mod precision;
pub mod training;

pub use error::{MlErr, Result};
