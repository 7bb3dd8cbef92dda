//! Cycle-accurate simulator for the axon MLP inference core.
//!
//! Every hardware register of the original core is an explicit field here,
//! updated once per simulated tick from the previous tick's committed
//! state. There are no threads and no locks: one writer per piece of
//! state, globally synchronized by tick boundaries.
//!
//! # Component hierarchy
//!
//! ```text
//! System                      top-level wiring + reset policy
//!   ├── Synchronizer/Debouncer   physical-input conditioning
//!   ├── UartRx → ByteAssembler   host byte link → fire pulse
//!   └── Network                  layer chain, latched done
//!         └── Layer              parallel neuron array
//!               └── Neuron       batched MAC FSM + delay line
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use axon_chip::{FixedConfig, LayerDims, LayerParameters, NetworkParameters, Word, WordFormat};
//! use axon_sim::Network;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fmt = WordFormat::new(8, 8)?;
//! let params = NetworkParameters::new(vec![LayerParameters {
//!     dims: LayerDims { rows: 1, cols: 2 },
//!     weights: vec![vec![Word::from_f64(1.0, fmt); 2]],
//!     biases: vec![Word::zero(fmt)],
//! }])?;
//!
//! let mut net = Network::new(&params, 1, 0, fmt, FixedConfig::default())?;
//! let input = vec![Word::from_f64(0.25, fmt); 2];
//! net.tick(true, &input);
//! while !net.done() {
//!     net.tick(false, &input);
//! }
//! println!("output: {}", net.output()[0]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod conditioning;
pub mod delay;
mod error;
mod layer;
pub mod link;
mod network;
mod neuron;
pub mod reset;
mod system;

pub use conditioning::{Debouncer, Synchronizer};
pub use delay::DelayLine;
pub use error::{Result, SimError};
pub use layer::Layer;
pub use link::{ByteAssembler, LinkConfig, UartRx};
pub use network::{Network, NetworkState};
pub use neuron::{Neuron, NeuronState};
pub use reset::{ResetConfig, ResetPolarity, ResetSynchronicity};
pub use system::{RuntimeConfig, System, SystemInputs};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        ByteAssembler, Layer, LinkConfig, Network, NetworkState, Neuron, NeuronState,
        ResetConfig, ResetPolarity, ResetSynchronicity, Result, RuntimeConfig, SimError, System,
        SystemInputs, UartRx,
    };
}
