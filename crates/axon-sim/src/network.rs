//! Sequential layer chaining with a latched network-level done.
//!
//! Layer 0 is fired by the network's external fire signal and consumes the
//! external input vector. Every later layer is fired by its predecessor's
//! done pulse and consumes its predecessor's output vector — both taken
//! from the **previous** tick's committed state (registered wiring), so no
//! component ever observes a same-tick partial update.
//!
//! Unlike the per-neuron done pulse, the network's done output latches:
//! once the final layer completes, done holds high until the next fire, so
//! an external consumer can sample the output vector at leisure. The next
//! fire clears the latch and zeroes the output vector until the new result
//! is ready.

use crate::error::Result;
use crate::layer::Layer;
use axon_chip::{FixedConfig, NetworkParameters, Word, WordFormat};
use tracing::debug;

/// Network-level state, derived from the layers and the done latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    /// No computation in flight, done not latched (post-reset).
    Idle,
    /// A fire is propagating through the layer chain.
    Busy,
    /// The final layer completed; done latched until the next fire.
    Done,
}

/// An ordered chain of layers advanced in lock-step.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    /// Registered done pulses, one per layer, from the previous tick.
    fires: Vec<bool>,
    /// Registered output buses, one per layer, from the previous tick.
    buses: Vec<Vec<Word>>,
    /// Latched network-level done.
    latched: bool,
    /// Final output vector; zeroed between fire and the latched done.
    output: Vec<Word>,
    fmt: WordFormat,
}

impl Network {
    /// Build a network from validated parameters with a uniform batch size
    /// and pipeline depth across layers.
    ///
    /// # Errors
    ///
    /// Propagates parameter shape, width-chain, and batch-divisibility
    /// errors — all fatal before the first tick.
    pub fn new(
        params: &NetworkParameters,
        batch: usize,
        depth: usize,
        fmt: WordFormat,
        cfg: FixedConfig,
    ) -> Result<Self> {
        let layers = params
            .layers()
            .iter()
            .map(|p| Layer::new(p, batch, depth, fmt, cfg))
            .collect::<Result<Vec<_>>>()?;
        let fires = vec![false; layers.len()];
        let buses: Vec<Vec<Word>> = layers
            .iter()
            .map(|l| vec![Word::zero(fmt); l.rows()])
            .collect();
        let output = vec![Word::zero(fmt); params.output_width()];
        debug!(
            layers = layers.len(),
            input_width = params.input_width(),
            output_width = params.output_width(),
            "network built"
        );
        Ok(Self { layers, fires, buses, latched: false, output, fmt })
    }

    /// Advance the whole chain one tick.
    ///
    /// A fire while busy is ignored by the layers (handshake
    /// precondition), but still clears the done latch and zeroes the
    /// output vector.
    pub fn tick(&mut self, fire: bool, input: &[Word]) {
        if fire {
            self.latched = false;
            self.output.fill(Word::zero(self.fmt));
        }

        for i in 0..self.layers.len() {
            // Each layer consumes its predecessor's registered output from
            // the previous tick, never a value computed this tick.
            let (layer_fire, bus): (bool, Vec<Word>) = if i == 0 {
                (fire, input.to_vec())
            } else {
                (self.fires[i - 1], self.buses[i - 1].clone())
            };
            self.layers[i].step(layer_fire, &bus);
        }

        for (i, layer) in self.layers.iter().enumerate() {
            self.fires[i] = layer.done();
            self.buses[i] = layer.outputs();
        }

        if self.layers[self.layers.len() - 1].done() {
            self.latched = true;
            self.output = self.buses[self.buses.len() - 1].clone();
            debug!("network done latched");
        }
    }

    /// The latched done output.
    pub const fn done(&self) -> bool {
        self.latched
    }

    /// The final output vector (all zeroes between fire and done).
    pub fn output(&self) -> &[Word] {
        &self.output
    }

    /// Derived network-level state.
    pub fn state(&self) -> NetworkState {
        if self.latched {
            NetworkState::Done
        } else if self.layers.iter().any(Layer::is_busy) || self.fires.iter().any(|&f| f) {
            NetworkState::Busy
        } else {
            NetworkState::Idle
        }
    }

    /// Reset every layer and clear the registered wiring and the latch.
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
        for fire in &mut self.fires {
            *fire = false;
        }
        for (bus, layer) in self.buses.iter_mut().zip(&self.layers) {
            *bus = vec![Word::zero(self.fmt); layer.rows()];
        }
        self.latched = false;
        self.output.fill(Word::zero(self.fmt));
    }

    /// Width of the external input vector.
    pub fn input_width(&self) -> usize {
        self.layers[0].cols()
    }

    /// Width of the final output vector.
    pub fn output_width(&self) -> usize {
        self.output.len()
    }

    /// Layer count.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
