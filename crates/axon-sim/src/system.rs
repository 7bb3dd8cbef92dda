// SPDX-License-Identifier: AGPL-3.0-only

//! Top-level wiring: conditioning → byte link → assembler → network.
//!
//! One [`System`] owns every clocked component and advances them all from
//! a single `tick` call — the lock-step, single-writer scheduling model.
//! The configured reset policy is applied here: an asynchronous reset
//! overrides the tick entirely, a synchronous one takes effect at the
//! boundary after the components have stepped.

use crate::conditioning::{Debouncer, Synchronizer};
use crate::error::Result;
use crate::link::{ByteAssembler, LinkConfig, UartRx};
use crate::network::Network;
use crate::reset::{ResetConfig, ResetSynchronicity};
use axon_chip::{FixedConfig, NetworkParameters, Word, WordFormat};
use tracing::info;

/// Runtime configuration, validated once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Tick base frequency in Hz.
    pub clock_hz: u32,
    /// Host link bit rate.
    pub bit_rate: u32,
    /// Word integral bits.
    pub integral_bits: u32,
    /// Word fractional bits.
    pub fractional_bits: u32,
    /// Reset polarity and synchronicity.
    pub reset: ResetConfig,
    /// MAC batch size, uniform across layers.
    pub batch: usize,
    /// Pipeline stage count, uniform across layers.
    pub depth: usize,
    /// Debounce timeout for conditioned inputs, in ticks.
    pub debounce_ticks: usize,
    /// Synchronizer chain length for external signals.
    pub sync_stages: usize,
    /// Fixed-point policies.
    pub fixed: FixedConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            clock_hz: 50_000_000,
            bit_rate: 115_200,
            integral_bits: 8,
            fractional_bits: 8,
            reset: ResetConfig::default(),
            batch: 1,
            depth: 0,
            debounce_ticks: 8,
            sync_stages: 2,
            fixed: FixedConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// The configured word format.
    ///
    /// # Errors
    ///
    /// Propagates format validation.
    pub fn word_format(&self) -> Result<WordFormat> {
        Ok(WordFormat::new(self.integral_bits, self.fractional_bits)?)
    }

    /// The configured link timing.
    pub const fn link(&self) -> LinkConfig {
        LinkConfig { clock_hz: self.clock_hz, bit_rate: self.bit_rate }
    }
}

/// Raw external line levels sampled this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInputs {
    /// Serial receive line (idles high).
    pub rx_line: bool,
    /// Raw reset line, interpreted per the configured polarity.
    pub reset_line: bool,
}

impl SystemInputs {
    /// An idle line state: serial high, reset deasserted for active-high.
    pub const fn idle() -> Self {
        Self { rx_line: true, reset_line: false }
    }
}

/// The complete pipeline: conditioning, byte link, assembler, network.
#[derive(Debug)]
pub struct System {
    reset_cfg: ResetConfig,
    rx_sync: Synchronizer,
    reset_sync: Synchronizer,
    reset_debounce: Debouncer,
    uart: UartRx,
    assembler: ByteAssembler,
    network: Network,
}

impl System {
    /// Build and wire every component; all configuration errors surface
    /// here, before the first tick.
    ///
    /// # Errors
    ///
    /// Word-format, oversampling, synchronizer, topology, and
    /// batch-divisibility errors.
    pub fn new(params: &NetworkParameters, cfg: &RuntimeConfig) -> Result<Self> {
        let fmt = cfg.word_format()?;
        let network = Network::new(params, cfg.batch, cfg.depth, fmt, cfg.fixed)?;
        let assembler = ByteAssembler::new(network.input_width(), fmt);
        info!(
            layers = network.layer_count(),
            input_width = network.input_width(),
            batch = cfg.batch,
            depth = cfg.depth,
            "system wired"
        );
        Ok(Self {
            reset_cfg: cfg.reset,
            rx_sync: Synchronizer::new(cfg.sync_stages)?,
            reset_sync: Synchronizer::new(cfg.sync_stages)?,
            reset_debounce: Debouncer::new(cfg.debounce_ticks),
            uart: UartRx::new(cfg.link())?,
            assembler,
            network,
        })
    }

    /// Advance the whole system one tick.
    pub fn tick(&mut self, inputs: SystemInputs) {
        let conditioned = self.reset_debounce.step(self.reset_sync.step(inputs.reset_line));
        let reset = self.reset_cfg.asserted(conditioned);

        if reset && self.reset_cfg.synchronicity == ResetSynchronicity::Asynchronous {
            // Asynchronous: overrides any in-flight computation this tick.
            self.apply_reset();
            return;
        }

        let rx = self.rx_sync.step(inputs.rx_line);
        let byte = self.uart.step(rx);
        self.assembler.step(byte);
        self.network.tick(self.assembler.fire(), self.assembler.vector());

        if reset {
            // Synchronous: takes effect at the tick boundary.
            self.apply_reset();
        }
    }

    /// Latched network done.
    pub const fn done(&self) -> bool {
        self.network.done()
    }

    /// Final output vector.
    pub fn output(&self) -> &[Word] {
        self.network.output()
    }

    /// The network, for direct observation.
    pub const fn network(&self) -> &Network {
        &self.network
    }

    /// Bytes buffered toward the next input vector.
    pub fn pending_bytes(&self) -> usize {
        self.assembler.pending()
    }

    fn apply_reset(&mut self) {
        self.rx_sync.reset();
        self.uart.reset();
        self.assembler.reset();
        self.network.reset();
    }
}
