//! Parallel neuron replication.
//!
//! A layer is N independently-steppable neurons over the same input vector:
//! same fire pulse, same batching and pipeline configuration, outputs
//! collected by index. There is no cross-neuron dependency within a tick,
//! so a sequential loop reproduces the hardware's spatial parallelism
//! exactly.

use crate::error::Result;
use crate::neuron::Neuron;
use axon_chip::{FixedConfig, LayerParameters, Word, WordFormat};

/// A fixed array of neurons sharing one input bus and fire line.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
    cols: usize,
}

impl Layer {
    /// Build a layer from validated parameters.
    ///
    /// Every neuron in the layer shares the same batch size and pipeline
    /// depth, so all of them finish on the same tick.
    ///
    /// # Errors
    ///
    /// Propagates neuron construction errors (batch divisibility) and
    /// parameter shape errors.
    pub fn new(
        params: &LayerParameters,
        batch: usize,
        depth: usize,
        fmt: WordFormat,
        cfg: FixedConfig,
    ) -> Result<Self> {
        params.validate(0).map_err(crate::error::SimError::Chip)?;
        let neurons = params
            .weights
            .iter()
            .zip(params.biases.iter())
            .map(|(row, &bias)| Neuron::new(row.clone(), bias, batch, depth, fmt, cfg))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { neurons, cols: params.dims.cols })
    }

    /// Advance every neuron one tick with the shared fire and input bus.
    pub fn step(&mut self, fire: bool, input: &[Word]) {
        for neuron in &mut self.neurons {
            neuron.step(fire, input);
        }
    }

    /// Layer completion, derived from a representative neuron.
    ///
    /// All neurons share depth parameters and therefore finish on the same
    /// tick; deriving done from neuron 0 is an implementation
    /// simplification the debug assertion keeps honest.
    pub fn done(&self) -> bool {
        let done = self.neurons[0].done();
        debug_assert!(
            self.neurons.iter().all(|n| n.done() == done),
            "neurons in a layer must finish on the same tick"
        );
        done
    }

    /// Collect per-neuron activations into the output vector.
    pub fn outputs(&self) -> Vec<Word> {
        self.neurons.iter().map(Neuron::output).collect()
    }

    /// Whether any neuron is mid-computation.
    pub fn is_busy(&self) -> bool {
        self.neurons.iter().any(|n| !n.is_idle())
    }

    /// Reset every neuron to the post-reset baseline.
    pub fn reset(&mut self) {
        for neuron in &mut self.neurons {
            neuron.reset();
        }
    }

    /// Neuron count (output width).
    pub fn rows(&self) -> usize {
        self.neurons.len()
    }

    /// Input width.
    pub const fn cols(&self) -> usize {
        self.cols
    }
}
