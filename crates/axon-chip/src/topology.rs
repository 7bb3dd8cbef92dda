//! Network topology and parameter data model.
//!
//! Parameters are built once, validated once, and treated as immutable for
//! the lifetime of a pipeline instance. Every layer carries its true
//! dimensions — the padded maximum-dimension storage the hardware used is a
//! file-format concern and lives in `axon-params`.

use crate::error::{ChipError, Result};
use crate::word::Word;

/// True dimensions of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDims {
    /// Neuron count (weight matrix rows, output width).
    pub rows: usize,
    /// Input count (weight matrix columns).
    pub cols: usize,
}

/// One layer's static configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerParameters {
    /// Declared dimensions.
    pub dims: LayerDims,
    /// Weight matrix, `dims.rows` rows of `dims.cols` columns.
    pub weights: Vec<Vec<Word>>,
    /// Bias vector, `dims.rows` entries.
    pub biases: Vec<Word>,
}

impl LayerParameters {
    /// Check this layer's internal invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant, naming `layer` as context.
    pub fn validate(&self, layer: usize) -> Result<()> {
        if self.weights.len() != self.dims.rows {
            return Err(ChipError::WeightRowCount {
                layer,
                expected: self.dims.rows,
                got: self.weights.len(),
            });
        }
        for (row, w) in self.weights.iter().enumerate() {
            if w.len() != self.dims.cols {
                return Err(ChipError::WeightColCount {
                    layer,
                    row,
                    expected: self.dims.cols,
                    got: w.len(),
                });
            }
        }
        if self.biases.len() != self.dims.rows {
            return Err(ChipError::BiasCount {
                layer,
                expected: self.dims.rows,
                got: self.biases.len(),
            });
        }
        Ok(())
    }
}

/// Ordered layer parameters for a whole network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParameters {
    layers: Vec<LayerParameters>,
}

impl NetworkParameters {
    /// Validate per-layer invariants and the inter-layer width chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChipError::EmptyNetwork`], a per-layer shape error, or
    /// [`ChipError::WidthMismatch`] naming the downstream layer.
    pub fn new(layers: Vec<LayerParameters>) -> Result<Self> {
        if layers.is_empty() {
            return Err(ChipError::EmptyNetwork);
        }
        for (i, layer) in layers.iter().enumerate() {
            layer.validate(i)?;
        }
        for i in 1..layers.len() {
            let expected = layers[i].dims.cols;
            let got = layers[i - 1].dims.rows;
            if expected != got {
                return Err(ChipError::WidthMismatch { layer: i, expected, got });
            }
        }
        Ok(Self { layers })
    }

    /// Layer count.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The layers, in feed-forward order.
    pub fn layers(&self) -> &[LayerParameters] {
        &self.layers
    }

    /// Width of the external input vector.
    pub fn input_width(&self) -> usize {
        self.layers[0].dims.cols
    }

    /// Width of the final output vector.
    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].dims.rows
    }

    /// Per-layer input counts, for the latency model.
    pub fn layer_inputs(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.dims.cols).collect()
    }
}
