//! Single-neuron compute unit: a clocked FSM around a batched MAC engine.
//!
//! One neuron holds one bias and one weight vector, consumes an input
//! vector B entries at a time, and produces one activation value. The MAC
//! path runs through an explicit P-stage delay line; priming, draining and
//! an output-hold stage keep the fire→done tick count equal to
//! [`axon_chip::neuron_latency`] for every data value.
//!
//! ```text
//! idle → [initializing] → processing → finalizing → [activating] → done → idle
//! ```
//!
//! `initializing` and `activating` exist only when the pipeline is more
//! than one stage deep; at depth 0 or 1 the MAC result and the activation
//! complete in the tick they are issued, so those stages collapse away and
//! both depths share one latency. A single register stage buys timing
//! margin, not ticks.

use crate::delay::DelayLine;
use crate::error::{Result, SimError};
use axon_chip::{activate, ActivationConstants, FixedConfig, Word, WordFormat};
use tracing::warn;

/// FSM state of one neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeuronState {
    /// Waiting for a fire pulse, accumulator seeded with the bias.
    Idle,
    /// Priming the pipeline entry for depth−1 ticks (depth > 1 only).
    Initializing,
    /// Issuing batches while consuming whatever emerges from the exit.
    Processing,
    /// Draining in-flight batches for depth−1 ticks (depth > 1 only).
    Finalizing,
    /// Holding the activated result for depth−1 ticks (depth > 1 only).
    Activating,
    /// Presenting the output; done asserted for exactly this one tick.
    Done,
}

/// One compute unit of a layer.
#[derive(Debug, Clone)]
pub struct Neuron {
    weights: Vec<Word>,
    bias: Word,
    batch: usize,
    depth: usize,
    fmt: WordFormat,
    acc_fmt: WordFormat,
    cfg: FixedConfig,
    constants: ActivationConstants,

    state: NeuronState,
    /// Private snapshot of the input bus, latched on fire.
    inputs: Vec<Word>,
    /// Running accumulator in the configured headroom format.
    acc: Word,
    /// In-flight batch indices (operands are latched, so the index
    /// identifies the batch).
    pipe: DelayLine<usize>,
    issued: usize,
    consumed: usize,
    /// Ticks remaining in the current priming/draining/holding stage.
    wait: usize,

    output: Word,
    done: bool,
}

impl Neuron {
    /// Build a neuron.
    ///
    /// # Errors
    ///
    /// Fatal configuration errors, checked once here and never per-tick:
    /// an empty weight vector, a zero batch size, or a batch size that does
    /// not evenly divide the input count.
    pub fn new(
        weights: Vec<Word>,
        bias: Word,
        batch: usize,
        depth: usize,
        fmt: WordFormat,
        cfg: FixedConfig,
    ) -> Result<Self> {
        if weights.is_empty() {
            return Err(SimError::NoWeights);
        }
        if batch == 0 {
            return Err(SimError::ZeroBatch);
        }
        if weights.len() % batch != 0 {
            return Err(SimError::BatchNotDivisor { inputs: weights.len(), batch });
        }
        let acc_fmt = fmt.accumulator(cfg.acc_width);
        let acc = bias.resize(acc_fmt, cfg);
        Ok(Self {
            weights,
            bias,
            batch,
            depth,
            fmt,
            acc_fmt,
            cfg,
            constants: ActivationConstants::derive(fmt),
            state: NeuronState::Idle,
            inputs: Vec::new(),
            acc,
            pipe: DelayLine::new(depth.max(1)),
            issued: 0,
            consumed: 0,
            wait: 0,
            output: Word::zero(fmt),
            done: false,
        })
    }

    /// Advance one tick.
    ///
    /// `fire` is honored only in `Idle`; a fire while busy is ignored,
    /// matching the handshake precondition.
    pub fn step(&mut self, fire: bool, input: &[Word]) {
        self.done = false;

        if self.is_inconsistent() {
            warn!(state = ?self.state, wait = self.wait, "inconsistent neuron state, forcing idle");
            self.reset();
            return;
        }

        match self.state {
            NeuronState::Idle => {
                if fire {
                    debug_assert_eq!(input.len(), self.weights.len(), "input bus width");
                    self.inputs.clear();
                    self.inputs.extend_from_slice(input);
                    self.acc = self.bias.resize(self.acc_fmt, self.cfg);
                    self.pipe.clear();
                    self.issued = 0;
                    self.consumed = 0;
                    self.output = Word::zero(self.fmt);
                    if self.depth > 1 {
                        self.wait = self.depth - 1;
                        self.state = NeuronState::Initializing;
                    } else {
                        self.state = NeuronState::Processing;
                    }
                }
            }
            NeuronState::Initializing => {
                self.issue();
                self.wait -= 1;
                if self.wait == 0 {
                    self.state = NeuronState::Processing;
                }
            }
            NeuronState::Processing => {
                if self.depth > 1 {
                    self.issue();
                    if let Some(k) = self.pipe.drain() {
                        self.fold(k);
                    }
                } else {
                    // Unpipelined: the batch issued this tick is consumed
                    // this tick.
                    let k = self.issued;
                    self.issued += 1;
                    self.fold(k);
                }
                if self.consumed == self.total_batches() {
                    if self.depth > 1 {
                        self.wait = self.depth - 1;
                        self.state = NeuronState::Finalizing;
                    } else {
                        self.output = self.activated();
                        self.state = NeuronState::Done;
                    }
                }
            }
            NeuronState::Finalizing => {
                if let Some(k) = self.pipe.drain() {
                    self.fold(k);
                }
                self.wait -= 1;
                if self.wait == 0 {
                    self.output = self.activated();
                    self.wait = self.depth - 1;
                    self.state = NeuronState::Activating;
                }
            }
            NeuronState::Activating => {
                self.wait -= 1;
                if self.wait == 0 {
                    self.state = NeuronState::Done;
                }
            }
            NeuronState::Done => {
                self.done = true;
                self.state = NeuronState::Idle;
            }
        }
    }

    /// Return to the post-reset baseline: idle, accumulator re-seeded with
    /// the bias, pipeline flushed, output zeroed.
    pub fn reset(&mut self) {
        self.state = NeuronState::Idle;
        self.inputs.clear();
        self.acc = self.bias.resize(self.acc_fmt, self.cfg);
        self.pipe.clear();
        self.issued = 0;
        self.consumed = 0;
        self.wait = 0;
        self.output = Word::zero(self.fmt);
        self.done = false;
    }

    /// Whether done is asserted this tick (one-tick pulse).
    pub const fn done(&self) -> bool {
        self.done
    }

    /// The activation output, valid from the done tick until the next fire.
    pub const fn output(&self) -> Word {
        self.output
    }

    /// Current FSM state.
    pub const fn state(&self) -> NeuronState {
        self.state
    }

    /// Whether the neuron is idle (can accept a fire).
    pub fn is_idle(&self) -> bool {
        self.state == NeuronState::Idle
    }

    /// The running accumulator, in the configured headroom format.
    pub const fn accumulator(&self) -> Word {
        self.acc
    }

    /// Input count this neuron was built for.
    pub fn input_count(&self) -> usize {
        self.weights.len()
    }

    fn total_batches(&self) -> usize {
        self.weights.len() / self.batch
    }

    /// Feed the next pending batch index into the pipeline entry.
    fn issue(&mut self) {
        if self.issued < self.total_batches() {
            self.pipe.feed(self.issued);
            self.issued += 1;
        }
    }

    /// B-way multiply-accumulate of batch `k` into the accumulator.
    fn fold(&mut self, k: usize) {
        let base = k * self.batch;
        for j in base..base + self.batch {
            let product = self.inputs[j].mul(self.weights[j]);
            self.acc = self.acc.add(product.resize(self.acc_fmt, self.cfg), self.cfg);
        }
        self.consumed += 1;
    }

    /// Activation of the finished accumulator, narrowed to the base width.
    fn activated(&self) -> Word {
        let x = self.acc.resize(self.constants.input_format(), self.cfg);
        activate(x, &self.constants, self.cfg)
    }

    /// The defensive case: a stage counter at zero inside a counting state
    /// cannot arise from any reachable transition. Treated as a transient
    /// fault and healed by forcing idle.
    fn is_inconsistent(&self) -> bool {
        match self.state {
            NeuronState::Initializing | NeuronState::Finalizing | NeuronState::Activating => {
                self.wait == 0
            }
            NeuronState::Processing => self.consumed > self.total_batches(),
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_for_test(&mut self) {
        self.state = NeuronState::Finalizing;
        self.wait = 0;
    }
}
