//! Deterministic latency model.
//!
//! The tick count from a fire pulse to the done pulse is a function of
//! (input count, batch size, pipeline depth) only — never of data values.
//! This is the contract the simulator in `axon-sim` is tested against, and
//! what lets layers compose with nothing beyond the fire/done handshake.

/// Ticks from the fire tick to the done pulse for one neuron.
///
/// ```text
/// inputs/batch                 one consumed batch per processing tick
/// + 3·max(depth − 1, 0)        priming, draining, and output-hold stages
/// + 1                          the done pulse itself
/// ```
///
/// Depth 0 and depth 1 share the same total: a single pipeline register
/// adds timing margin, not latency — a deliberate design choice preserved
/// from the hardware.
///
/// # Panics
///
/// Panics if `batch` is zero or does not divide `inputs`; construction in
/// `axon-sim` rejects such configurations before anything ticks.
pub fn neuron_latency(inputs: usize, batch: usize, depth: usize) -> usize {
    assert!(batch > 0 && inputs % batch == 0, "batch must divide inputs");
    inputs / batch + 3 * depth.saturating_sub(1) + 1
}

/// Ticks from the external fire to the final layer's done pulse.
///
/// `layer_inputs` holds each layer's input count, in order. Inter-layer
/// done→fire wiring is registered, so each boundary adds one tick.
pub fn network_latency(layer_inputs: &[usize], batch: usize, depth: usize) -> usize {
    let chain: usize = layer_inputs
        .iter()
        .map(|&n| neuron_latency(n, batch, depth))
        .sum();
    chain + layer_inputs.len().saturating_sub(1)
}
