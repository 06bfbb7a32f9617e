use crate::{
    arch::{Grads, Params},
    precision::Scalar,
};

pub trait Optimizer<F: Scalar> {
    /// Applies one update to every parameter.
    ///
    /// `grads` must have been computed entirely from the current `params`, so all four arrays
    /// move from the same snapshot.
    fn update_params(&mut self, params: &mut Params<F>, grads: &Grads<F>);
}
