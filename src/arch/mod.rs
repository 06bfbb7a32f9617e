pub mod activations;
pub mod loss;
mod network;
mod params;

pub use network::{Forward, TwoLayerNet};
pub use params::{check_hidden, Grads, Params};
