// SPDX-License-Identifier: AGPL-3.0-only

//! Host byte link: 8-N-1 asynchronous receiver and input assembly.
//!
//! The core consumes exactly two things from the link: a byte-ready pulse
//! and an 8-bit value. [`UartRx`] recovers those from a raw line level
//! sampled once per tick, with an oversampling factor derived from the
//! clock and bit rate; [`ByteAssembler`] accumulates bytes until a full
//! input vector is present, then raises the pipeline's fire pulse itself.
//!
//! Framing: one start bit (low), eight data bits LSB-first, no parity, one
//! stop bit (high). A failed start-bit or stop-bit check drops the byte
//! and returns the receiver to idle — byte integrity is the sender's
//! problem, deterministic recovery is ours.

use crate::error::{Result, SimError};
use axon_chip::{Word, WordFormat};
use bytes::{BufMut, BytesMut};
use tracing::{debug, warn};

/// Minimum ticks per bit for the receiver to sample mid-bit.
pub const MIN_OVERSAMPLING: u32 = 2;

/// Link timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Tick base frequency in Hz.
    pub clock_hz: u32,
    /// Link bit rate in bits per second.
    pub bit_rate: u32,
}

impl LinkConfig {
    /// Ticks per bit at this clock/bit-rate pair.
    ///
    /// # Errors
    ///
    /// Configuration error when the clock cannot oversample the bit rate.
    pub fn ticks_per_bit(&self) -> Result<u32> {
        let tpb = if self.bit_rate == 0 { 0 } else { self.clock_hz / self.bit_rate };
        if tpb < MIN_OVERSAMPLING {
            return Err(SimError::OversamplingTooLow {
                clock_hz: self.clock_hz,
                bit_rate: self.bit_rate,
                min: MIN_OVERSAMPLING,
            });
        }
        Ok(tpb)
    }
}

/// Receiver FSM state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    /// Line idle (high), hunting for a start edge.
    Idle,
    /// Confirming the start bit at its midpoint.
    Start,
    /// Shifting in data bits, LSB first.
    Data,
    /// Checking the stop bit.
    Stop,
}

/// 8-N-1 asynchronous byte receiver, advanced once per tick.
#[derive(Debug, Clone)]
pub struct UartRx {
    ticks_per_bit: u32,
    state: RxState,
    counter: u32,
    bit_index: u8,
    shift: u8,
}

impl UartRx {
    /// Build a receiver for the given link timing.
    ///
    /// # Errors
    ///
    /// Propagates the oversampling check.
    pub fn new(config: LinkConfig) -> Result<Self> {
        let ticks_per_bit = config.ticks_per_bit()?;
        Ok(Self {
            ticks_per_bit,
            state: RxState::Idle,
            counter: 0,
            bit_index: 0,
            shift: 0,
        })
    }

    /// Sample the line for one tick; `Some(byte)` on the tick a byte
    /// completes (the byte-ready pulse).
    pub fn step(&mut self, rx: bool) -> Option<u8> {
        match self.state {
            RxState::Idle => {
                if !rx {
                    // Start edge: aim for the middle of the start bit.
                    self.state = RxState::Start;
                    self.counter = self.ticks_per_bit / 2;
                }
                None
            }
            RxState::Start => {
                self.counter -= 1;
                if self.counter == 0 {
                    if rx {
                        // Line bounced back high: a glitch, not a start bit.
                        self.state = RxState::Idle;
                    } else {
                        self.state = RxState::Data;
                        self.bit_index = 0;
                        self.shift = 0;
                        self.counter = self.ticks_per_bit;
                    }
                }
                None
            }
            RxState::Data => {
                self.counter -= 1;
                if self.counter == 0 {
                    self.shift |= u8::from(rx) << self.bit_index;
                    self.bit_index += 1;
                    self.counter = self.ticks_per_bit;
                    if self.bit_index == 8 {
                        self.state = RxState::Stop;
                    }
                }
                None
            }
            RxState::Stop => {
                self.counter -= 1;
                if self.counter == 0 {
                    self.state = RxState::Idle;
                    if rx {
                        return Some(self.shift);
                    }
                    warn!(byte = self.shift, "framing error, dropping byte");
                }
                None
            }
        }
    }

    /// Return to idle, discarding any partial byte.
    pub fn reset(&mut self) {
        self.state = RxState::Idle;
        self.counter = 0;
        self.bit_index = 0;
        self.shift = 0;
    }
}

/// Accumulates link bytes into an input vector and raises fire.
///
/// Bytes are interpreted as unsigned activation values in [0,1); once
/// `expected` of them have arrived the assembled vector is published and
/// fire pulses for exactly one tick.
#[derive(Debug, Clone)]
pub struct ByteAssembler {
    expected: usize,
    fmt: WordFormat,
    buf: BytesMut,
    vector: Vec<Word>,
    fire: bool,
}

impl ByteAssembler {
    /// Assemble vectors of `expected` entries in the given format.
    pub fn new(expected: usize, fmt: WordFormat) -> Self {
        Self {
            expected,
            fmt,
            buf: BytesMut::with_capacity(expected),
            vector: vec![Word::zero(fmt); expected],
            fire: false,
        }
    }

    /// Consume this tick's byte-ready pulse, if any.
    pub fn step(&mut self, byte: Option<u8>) {
        self.fire = false;
        if let Some(b) = byte {
            self.buf.put_u8(b);
            if self.buf.len() == self.expected {
                self.vector = self
                    .buf
                    .iter()
                    .map(|&raw| Word::from_activation_byte(raw, self.fmt))
                    .collect();
                self.buf.clear();
                self.fire = true;
                debug!(len = self.expected, "input vector assembled, firing");
            }
        }
    }

    /// One-tick fire pulse on vector completion.
    pub const fn fire(&self) -> bool {
        self.fire
    }

    /// The most recently assembled vector.
    pub fn vector(&self) -> &[Word] {
        &self.vector
    }

    /// Bytes currently buffered toward the next vector.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Discard any partially assembled vector.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.vector = vec![Word::zero(self.fmt); self.expected];
        self.fire = false;
    }
}
