//! `axon` — command-line front end for the MLP core simulator.
//!
//! ```text
//! USAGE:
//!   axon info <params-dir>             Topology and latency model
//!   axon run <params-dir> -i <file>    Tick an inference to completion
//!   axon latency --inputs 784,16,10    Latency model without parameters
//! ```

use anyhow::{bail, Context, Result};
use axon_chip::{network_latency, neuron_latency, FixedConfig, Word, WordFormat};
use axon_sim::Network;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "axon", about = "Cycle-accurate MLP core simulator", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

/// Core configuration flags shared by the subcommands.
#[derive(Args)]
struct CoreOpts {
    /// Word integral bits.
    #[arg(long, default_value_t = 8)]
    ibits: u32,

    /// Word fractional bits.
    #[arg(long, default_value_t = 8)]
    fbits: u32,

    /// MAC batch size (must divide every layer's input count).
    #[arg(long, default_value_t = 1)]
    batch: usize,

    /// Pipeline stage count.
    #[arg(long, default_value_t = 0)]
    depth: usize,
}

#[derive(Subcommand)]
enum Cmd {
    /// Load a parameter directory and print topology and latency.
    Info {
        /// Directory holding weights_<i>.txt / biases_<i>.txt pairs.
        params_dir: PathBuf,

        #[command(flatten)]
        core: CoreOpts,
    },
    /// Run one inference and print the output vector and arg-max class.
    Run {
        /// Directory holding weights_<i>.txt / biases_<i>.txt pairs.
        params_dir: PathBuf,

        /// Input vector file, one decimal value per line.
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        core: CoreOpts,
    },
    /// Print the latency model for a hypothetical layer chain.
    Latency {
        /// Comma-separated per-layer input counts (e.g. 784,16,10).
        #[arg(long, value_delimiter = ',', required = true)]
        inputs: Vec<usize>,

        #[command(flatten)]
        core: CoreOpts,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Info { params_dir, core } => cmd_info(&params_dir, &core)?,
        Cmd::Run { params_dir, input, core } => cmd_run(&params_dir, &input, &core)?,
        Cmd::Latency { inputs, core } => cmd_latency(&inputs, &core)?,
    }

    Ok(())
}

fn word_format(core: &CoreOpts) -> Result<WordFormat> {
    WordFormat::new(core.ibits, core.fbits).context("invalid word format")
}

fn cmd_info(params_dir: &PathBuf, core: &CoreOpts) -> Result<()> {
    let fmt = word_format(core)?;
    let params = axon_params::load_network(params_dir, fmt)
        .with_context(|| format!("loading parameters from {}", params_dir.display()))?;

    println!("layers: {}", params.layer_count());
    for (i, layer) in params.layers().iter().enumerate() {
        println!(
            "  [{i}] {:>4} → {:<4}  ({} weights, {} biases)",
            layer.dims.cols,
            layer.dims.rows,
            layer.dims.rows * layer.dims.cols,
            layer.dims.rows,
        );
    }
    println!();
    print_latency(&params.layer_inputs(), core);
    Ok(())
}

fn cmd_run(params_dir: &PathBuf, input_path: &PathBuf, core: &CoreOpts) -> Result<()> {
    let fmt = word_format(core)?;
    let params = axon_params::load_network(params_dir, fmt)
        .with_context(|| format!("loading parameters from {}", params_dir.display()))?;

    let input = read_input(input_path, fmt)?;
    if input.len() != params.input_width() {
        bail!(
            "input vector has {} entries, network expects {}",
            input.len(),
            params.input_width()
        );
    }

    let mut net = Network::new(&params, core.batch, core.depth, fmt, FixedConfig::default())
        .context("building network")?;

    let expected = network_latency(&params.layer_inputs(), core.batch, core.depth);
    net.tick(true, &input);
    let mut ticks = 0usize;
    while !net.done() {
        net.tick(false, &input);
        ticks += 1;
        if ticks > expected + 16 {
            bail!("network exceeded its latency bound of {expected} ticks");
        }
    }

    println!("ticks: {ticks}");
    for (i, out) in net.output().iter().enumerate() {
        println!("  out[{i}] = {out}");
    }
    if let Some(class) = arg_max(net.output()) {
        println!("class: {class}");
    }
    Ok(())
}

fn cmd_latency(inputs: &[usize], core: &CoreOpts) -> Result<()> {
    for &n in inputs {
        if core.batch == 0 || n % core.batch != 0 {
            bail!("batch {} does not divide input count {n}", core.batch);
        }
    }
    print_latency(inputs, core);
    Ok(())
}

fn print_latency(layer_inputs: &[usize], core: &CoreOpts) {
    println!("latency (batch {}, depth {}):", core.batch, core.depth);
    for (i, &n) in layer_inputs.iter().enumerate() {
        println!("  layer {i}: {} ticks", neuron_latency(n, core.batch, core.depth));
    }
    println!("  network: {} ticks", network_latency(layer_inputs, core.batch, core.depth));
}

/// The external arg-max consumer: index of the largest activation.
fn arg_max(outputs: &[Word]) -> Option<usize> {
    outputs
        .iter()
        .enumerate()
        .max_by_key(|(_, w)| w.raw())
        .map(|(i, _)| i)
}

fn read_input(path: &PathBuf, fmt: WordFormat) -> Result<Vec<Word>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading input vector {}", path.display()))?;
    let mut values = Vec::new();
    for (line_no, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let value: f64 = line
            .parse()
            .with_context(|| format!("{}:{}: not a number: {line:?}", path.display(), line_no + 1))?;
        values.push(Word::from_f64(value, fmt));
    }
    Ok(values)
}
