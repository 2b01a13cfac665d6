//! Decision models, mapping some fixed size sensory input onto a fixed size action output.
//! Only the single layer [Perceptron] lives here, there are no hidden units.

pub mod perceptron;

pub use perceptron::Perceptron;

use crate::error::Result;

pub mod activate {
    use core::f64::consts::E;

    /// The logistic function, squashing any finite x into (0, 1)
    pub fn sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-x))
    }
}

/// The trait for anything a [crate::Scenario] may drive. Right now, only f64 values are used.
pub trait Network {
    /// Length of the input expected by [Network::think], not counting the bias
    fn sensory(&self) -> usize;

    /// Length of the output produced by [Network::think]
    fn action(&self) -> usize;

    /// Given some sensory input, produce this network's action output. Input must be sized to
    /// exactly [Network::sensory].
    fn think(&mut self, input: &[f64]) -> Result<&[f64]>;

    /// Get the network's most recent output, sized to [Network::action]
    fn output(&self) -> &[f64];
}
