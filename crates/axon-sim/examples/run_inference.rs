//! Tick a small 4→2→1 network to completion and print the result.
//!
//! ```bash
//! cargo run --example run_inference -p axon-sim
//! ```

use axon_chip::{
    network_latency, FixedConfig, LayerDims, LayerParameters, NetworkParameters, Word, WordFormat,
};
use axon_sim::Network;

fn words(values: &[f64], fmt: WordFormat) -> Vec<Word> {
    values.iter().map(|&v| Word::from_f64(v, fmt)).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fmt = WordFormat::new(8, 8)?;

    let params = NetworkParameters::new(vec![
        LayerParameters {
            dims: LayerDims { rows: 2, cols: 4 },
            weights: vec![
                words(&[0.5, -0.5, 1.0, 0.25], fmt),
                words(&[-1.0, 0.75, 0.125, 0.5], fmt),
            ],
            biases: words(&[0.25, -0.125], fmt),
        },
        LayerParameters {
            dims: LayerDims { rows: 1, cols: 2 },
            weights: vec![words(&[1.0, -0.75], fmt)],
            biases: words(&[0.0625], fmt),
        },
    ])?;

    let batch = 2;
    let depth = 3;
    let mut net = Network::new(&params, batch, depth, fmt, FixedConfig::default())?;

    let input = words(&[0.5, -0.25, 0.125, 0.75], fmt);
    net.tick(true, &input);
    let mut ticks = 0;
    while !net.done() {
        net.tick(false, &input);
        ticks += 1;
    }

    println!("output: {}", net.output()[0]);
    println!(
        "ticks:  {ticks} (model says {})",
        network_latency(&params.layer_inputs(), batch, depth)
    );
    Ok(())
}
