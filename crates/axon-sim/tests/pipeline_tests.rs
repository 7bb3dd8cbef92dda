//! Pipeline composition properties
//!
//! Cross-component tests: layer/network latency against the analytic
//! model, feed-forward composability, and the latched network done.

use axon_chip::{
    network_latency, FixedConfig, LayerDims, LayerParameters, NetworkParameters, Word, WordFormat,
};
use axon_sim::{Layer, Network, NetworkState};

fn fmt() -> WordFormat {
    WordFormat::new(8, 8).unwrap()
}

fn words(values: &[f64]) -> Vec<Word> {
    values.iter().map(|&v| Word::from_f64(v, fmt())).collect()
}

fn layer_params(weights: &[&[f64]], biases: &[f64]) -> LayerParameters {
    LayerParameters {
        dims: LayerDims { rows: weights.len(), cols: weights[0].len() },
        weights: weights.iter().map(|w| words(w)).collect(),
        biases: words(biases),
    }
}

/// A 4→2→1 network with mixed-sign weights.
fn small_network() -> NetworkParameters {
    NetworkParameters::new(vec![
        layer_params(
            &[&[0.5, -0.5, 1.0, 0.25], &[-1.0, 0.75, 0.125, 0.5]],
            &[0.25, -0.125],
        ),
        layer_params(&[&[1.0, -0.75]], &[0.0625]),
    ])
    .unwrap()
}

/// Fire on tick 0, then tick until the done latch rises.
fn run_network(net: &mut Network, input: &[Word]) -> usize {
    net.tick(true, input);
    for tick in 1..10_000 {
        net.tick(false, input);
        if net.done() {
            return tick;
        }
    }
    panic!("network never reached done");
}

/// Run a single layer in isolation to completion.
fn run_layer(layer: &mut Layer, input: &[Word]) -> Vec<Word> {
    layer.step(true, input);
    for _ in 1..10_000 {
        layer.step(false, input);
        if layer.done() {
            return layer.outputs();
        }
    }
    panic!("layer never reached done");
}

#[test]
fn network_latency_matches_model() {
    let params = small_network();
    let input = words(&[0.5, -0.25, 0.125, 0.75]);
    for depth in [0, 1, 2, 3] {
        for batch in [1, 2] {
            let mut net =
                Network::new(&params, batch, depth, fmt(), FixedConfig::default()).unwrap();
            let ticks = run_network(&mut net, &input);
            assert_eq!(
                ticks,
                network_latency(&[4, 2], batch, depth),
                "batch {batch} depth {depth}"
            );
        }
    }
}

#[test]
fn latency_is_independent_of_data() {
    let params = small_network();
    let mut reference = None;
    for scale in [-1.0, -0.25, 0.0, 0.5, 1.0] {
        let input = words(&[0.5 * scale, scale, -scale, 0.25]);
        let mut net = Network::new(&params, 2, 2, fmt(), FixedConfig::default()).unwrap();
        let ticks = run_network(&mut net, &input);
        match reference {
            None => reference = Some(ticks),
            Some(expected) => assert_eq!(ticks, expected, "scale {scale}"),
        }
    }
}

#[test]
fn chained_layers_match_isolated_computation() {
    let params = small_network();
    let input = words(&[0.5, -0.25, 0.125, 0.75]);

    // Isolated: run layer A to completion, feed its outputs to layer B.
    let cfg = FixedConfig::default();
    let mut a = Layer::new(&params.layers()[0], 2, 2, fmt(), cfg).unwrap();
    let mut b = Layer::new(&params.layers()[1], 2, 2, fmt(), cfg).unwrap();
    let hidden = run_layer(&mut a, &input);
    let isolated = run_layer(&mut b, &hidden);

    // Chained: the network wires A's done/output to B's fire/input.
    let mut net = Network::new(&params, 2, 2, fmt(), cfg).unwrap();
    run_network(&mut net, &input);

    assert_eq!(net.output(), isolated.as_slice());
}

#[test]
fn batching_does_not_change_results() {
    let params = small_network();
    let input = words(&[0.5, -0.25, 0.125, 0.75]);
    let mut outputs = Vec::new();
    for (batch, depth) in [(1, 0), (2, 0), (1, 3), (2, 4)] {
        let mut net = Network::new(&params, batch, depth, fmt(), FixedConfig::default()).unwrap();
        run_network(&mut net, &input);
        outputs.push(net.output().to_vec());
    }
    for out in &outputs[1..] {
        assert_eq!(out, &outputs[0], "same data path regardless of batching");
    }
}

#[test]
fn done_latches_and_output_is_zero_while_busy() {
    let params = small_network();
    let input = words(&[0.5, -0.25, 0.125, 0.75]);
    let mut net = Network::new(&params, 2, 0, fmt(), FixedConfig::default()).unwrap();

    net.tick(true, &input);
    let mut done_tick = None;
    for tick in 1..100 {
        assert!(
            net.output().iter().all(|w| w.raw() == 0),
            "output must stay zero until done (tick {tick})"
        );
        net.tick(false, &input);
        if net.done() {
            done_tick = Some(tick);
            break;
        }
    }
    let done_tick = done_tick.expect("network finished");

    // Latched: done holds, output stays valid, with no further fire.
    let result = net.output().to_vec();
    for _ in 0..done_tick + 10 {
        net.tick(false, &input);
        assert!(net.done(), "done is latched, not pulsed");
        assert_eq!(net.output(), result.as_slice());
    }

    // The next fire clears the latch and zeroes the output again.
    net.tick(true, &input);
    assert!(!net.done());
    assert!(net.output().iter().all(|w| w.raw() == 0));
}

#[test]
fn network_state_progression() {
    let params = small_network();
    let input = words(&[0.5, -0.25, 0.125, 0.75]);
    let mut net = Network::new(&params, 2, 0, fmt(), FixedConfig::default()).unwrap();

    assert_eq!(net.state(), NetworkState::Idle);
    net.tick(true, &input);
    assert_eq!(net.state(), NetworkState::Busy);
    while !net.done() {
        net.tick(false, &input);
    }
    assert_eq!(net.state(), NetworkState::Done);
}

#[test]
fn refire_while_busy_does_not_restart() {
    let params = small_network();
    let input = words(&[0.5, -0.25, 0.125, 0.75]);
    let expected = network_latency(&[4, 2], 2, 0);

    let mut net = Network::new(&params, 2, 0, fmt(), FixedConfig::default()).unwrap();
    net.tick(true, &input);
    net.tick(true, &input); // ignored by the busy layer chain
    for tick in 2..100 {
        net.tick(false, &input);
        if net.done() {
            assert_eq!(tick, expected, "latency unchanged by mid-flight fire");
            return;
        }
    }
    panic!("network never reached done");
}

#[test]
fn reset_returns_chain_to_baseline() {
    let params = small_network();
    let input = words(&[0.5, -0.25, 0.125, 0.75]);
    let mut net = Network::new(&params, 2, 3, fmt(), FixedConfig::default()).unwrap();

    net.tick(true, &input);
    net.tick(false, &input);
    net.tick(false, &input);
    net.reset();

    assert_eq!(net.state(), NetworkState::Idle);
    assert!(net.output().iter().all(|w| w.raw() == 0));

    // A full computation still works after the mid-flight reset.
    let ticks = run_network(&mut net, &input);
    assert_eq!(ticks, network_latency(&[4, 2], 2, 3));
}

#[test]
fn non_divisor_batch_fails_before_any_tick() {
    let params = small_network();
    let err = Network::new(&params, 3, 0, fmt(), FixedConfig::default());
    assert!(err.is_err(), "batch 3 does not divide the 4-wide first layer");
}
