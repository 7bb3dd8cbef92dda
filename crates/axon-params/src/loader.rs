//! Parameter directory loading.
//!
//! Probes `weights_<i>.txt` / `biases_<i>.txt` pairs for successive layer
//! indices, scans the weight files for delimiter-marked row boundaries to
//! discover each layer's true dimensions, and hands back validated
//! [`NetworkParameters`]. The inverse, [`save_network`], writes the same
//! format back out.

use crate::error::{ParamError, Result};
use crate::format::{delimiter, encode_scalar, is_delimiter, parse_scalar};
use axon_chip::{LayerDims, LayerParameters, NetworkParameters, Word, WordFormat};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Weights file path for layer `index`.
pub fn weights_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("weights_{index}.txt"))
}

/// Biases file path for layer `index`.
pub fn biases_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("biases_{index}.txt"))
}

/// Load a whole network from a parameter directory.
///
/// Layer count is discovered by probing weight files until one is
/// missing.
///
/// # Errors
///
/// Any malformed file is fatal; the error names the file (and line where
/// applicable). Zero discovered layers is [`ParamError::NoLayers`]; the
/// inter-layer width chain is validated by [`NetworkParameters::new`].
pub fn load_network(dir: &Path, fmt: WordFormat) -> Result<NetworkParameters> {
    let mut layers = Vec::new();
    while weights_path(dir, layers.len()).exists() {
        layers.push(load_layer(dir, layers.len(), fmt)?);
    }
    if layers.is_empty() {
        return Err(ParamError::NoLayers { dir: dir.to_path_buf() });
    }
    info!(layers = layers.len(), dir = %dir.display(), "parameters loaded");
    Ok(NetworkParameters::new(layers)?)
}

/// Load one layer's weight matrix and bias vector.
///
/// # Errors
///
/// Fatal on missing or empty files, malformed scalars, ragged or
/// unterminated rows, and bias/row count mismatch.
pub fn load_layer(dir: &Path, index: usize, fmt: WordFormat) -> Result<LayerParameters> {
    let weights = read_weight_rows(&weights_path(dir, index), fmt)?;
    let biases = read_scalar_lines(&biases_path(dir, index), fmt)?;

    let dims = LayerDims { rows: weights.len(), cols: weights[0].len() };
    debug!(layer = index, rows = dims.rows, cols = dims.cols, "layer scanned");

    let params = LayerParameters { dims, weights, biases };
    params.validate(index)?;
    Ok(params)
}

/// Write a network back out in the on-disk format.
///
/// # Errors
///
/// I/O errors carry the offending path.
pub fn save_network(dir: &Path, params: &NetworkParameters) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| ParamError::io(dir, e))?;
    for (i, layer) in params.layers().iter().enumerate() {
        let wpath = weights_path(dir, i);
        let mut out = String::new();
        for row in &layer.weights {
            for &w in row {
                out.push_str(&encode_scalar(w));
                out.push('\n');
            }
            out.push_str(&delimiter(w_format(layer)));
            out.push('\n');
        }
        write_file(&wpath, &out)?;

        let bpath = biases_path(dir, i);
        let mut out = String::new();
        for &b in &layer.biases {
            out.push_str(&encode_scalar(b));
            out.push('\n');
        }
        write_file(&bpath, &out)?;
    }
    Ok(())
}

/// Format of a layer's scalars (all rows share it by construction).
fn w_format(layer: &LayerParameters) -> WordFormat {
    layer.weights[0][0].format()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut file = fs::File::create(path).map_err(|e| ParamError::io(path, e))?;
    file.write_all(content.as_bytes()).map_err(|e| ParamError::io(path, e))
}

/// Scan a weights file into delimiter-terminated rows.
fn read_weight_rows(path: &Path, fmt: WordFormat) -> Result<Vec<Vec<Word>>> {
    let content = read_file(path)?;
    let mut rows: Vec<Vec<Word>> = Vec::new();
    let mut current: Vec<Word> = Vec::new();

    for (line_no, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if is_delimiter(line, fmt) {
            rows.push(std::mem::take(&mut current));
        } else {
            let word = parse_scalar(line, fmt).ok_or_else(|| ParamError::BadScalar {
                path: path.to_path_buf(),
                line: line_no + 1,
                bits: fmt.total_bits(),
                content: line.to_string(),
            })?;
            current.push(word);
        }
    }

    if !current.is_empty() {
        return Err(ParamError::UnterminatedRow { path: path.to_path_buf() });
    }
    if rows.is_empty() || rows[0].is_empty() {
        return Err(ParamError::Empty { path: path.to_path_buf() });
    }
    let expected = rows[0].len();
    for (row, cols) in rows.iter().enumerate() {
        if cols.len() != expected {
            return Err(ParamError::RaggedRow {
                path: path.to_path_buf(),
                row,
                expected,
                got: cols.len(),
            });
        }
    }
    Ok(rows)
}

/// Read a flat scalar-per-line file (biases).
fn read_scalar_lines(path: &Path, fmt: WordFormat) -> Result<Vec<Word>> {
    let content = read_file(path)?;
    let mut words = Vec::new();
    for (line_no, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let word = parse_scalar(line, fmt).ok_or_else(|| ParamError::BadScalar {
            path: path.to_path_buf(),
            line: line_no + 1,
            bits: fmt.total_bits(),
            content: line.to_string(),
        })?;
        words.push(word);
    }
    if words.is_empty() {
        return Err(ParamError::Empty { path: path.to_path_buf() });
    }
    Ok(words)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ParamError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_chip::ChipError;
    use tempfile::TempDir;

    fn fmt() -> WordFormat {
        WordFormat::new(8, 8).unwrap()
    }

    fn words(values: &[f64]) -> Vec<Word> {
        values.iter().map(|&v| Word::from_f64(v, fmt())).collect()
    }

    fn sample_params() -> NetworkParameters {
        NetworkParameters::new(vec![
            LayerParameters {
                dims: LayerDims { rows: 2, cols: 4 },
                weights: vec![
                    words(&[0.5, -0.5, 1.0, 0.25]),
                    words(&[-1.0, 0.75, 0.125, 0.5]),
                ],
                biases: words(&[0.25, -0.125]),
            },
            LayerParameters {
                dims: LayerDims { rows: 1, cols: 2 },
                weights: vec![words(&[1.0, -0.75])],
                biases: words(&[0.0625]),
            },
        ])
        .unwrap()
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let params = sample_params();
        save_network(dir.path(), &params).unwrap();
        let loaded = load_network(dir.path(), fmt()).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn layer_count_discovered_by_probing() {
        let dir = TempDir::new().unwrap();
        save_network(dir.path(), &sample_params()).unwrap();
        // A stray higher-index bias file without weights is not probed.
        fs::write(biases_path(dir.path(), 7), "0000000000000000\n").unwrap();
        let loaded = load_network(dir.path(), fmt()).unwrap();
        assert_eq!(loaded.layer_count(), 2);
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = load_network(dir.path(), fmt()).unwrap_err();
        assert!(matches!(err, ParamError::NoLayers { .. }));
    }

    #[test]
    fn empty_weights_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(weights_path(dir.path(), 0), "").unwrap();
        fs::write(biases_path(dir.path(), 0), "0000000000000000\n").unwrap();
        let err = load_network(dir.path(), fmt()).unwrap_err();
        assert!(matches!(err, ParamError::Empty { .. }));
    }

    #[test]
    fn bad_scalar_names_file_and_line() {
        let dir = TempDir::new().unwrap();
        fs::write(
            weights_path(dir.path(), 0),
            "0000000100000000\nnot-a-scalar\n1111111111111111\n",
        )
        .unwrap();
        fs::write(biases_path(dir.path(), 0), "0000000000000000\n").unwrap();
        match load_network(dir.path(), fmt()).unwrap_err() {
            ParamError::BadScalar { line, .. } => assert_eq!(line, 2),
            other => panic!("expected BadScalar, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_row_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(
            weights_path(dir.path(), 0),
            "0000000100000000\n1111111111111111\n0000000100000000\n",
        )
        .unwrap();
        fs::write(biases_path(dir.path(), 0), "0000000000000000\n").unwrap();
        let err = load_network(dir.path(), fmt()).unwrap_err();
        assert!(matches!(err, ParamError::UnterminatedRow { .. }));
    }

    #[test]
    fn ragged_rows_are_fatal() {
        let dir = TempDir::new().unwrap();
        let d = delimiter(fmt());
        let s = "0000000100000000";
        fs::write(
            weights_path(dir.path(), 0),
            format!("{s}\n{s}\n{d}\n{s}\n{d}\n"),
        )
        .unwrap();
        fs::write(biases_path(dir.path(), 0), format!("{s}\n{s}\n")).unwrap();
        match load_network(dir.path(), fmt()).unwrap_err() {
            ParamError::RaggedRow { row, expected, got, .. } => {
                assert_eq!((row, expected, got), (1, 2, 1));
            }
            other => panic!("expected RaggedRow, got {other:?}"),
        }
    }

    #[test]
    fn bias_count_mismatch_is_fatal() {
        let dir = TempDir::new().unwrap();
        let d = delimiter(fmt());
        let s = "0000000100000000";
        // Two rows, one bias.
        fs::write(weights_path(dir.path(), 0), format!("{s}\n{d}\n{s}\n{d}\n")).unwrap();
        fs::write(biases_path(dir.path(), 0), format!("{s}\n")).unwrap();
        let err = load_network(dir.path(), fmt()).unwrap_err();
        assert!(matches!(
            err,
            ParamError::Chip(ChipError::BiasCount { layer: 0, expected: 2, got: 1 })
        ));
    }

    #[test]
    fn width_chain_mismatch_is_fatal() {
        let dir = TempDir::new().unwrap();
        let d = delimiter(fmt());
        let s = "0000000100000000";
        // Layer 0: 1 row of 2 cols. Layer 1: 1 row of 3 cols — mismatch.
        fs::write(weights_path(dir.path(), 0), format!("{s}\n{s}\n{d}\n")).unwrap();
        fs::write(biases_path(dir.path(), 0), format!("{s}\n")).unwrap();
        fs::write(weights_path(dir.path(), 1), format!("{s}\n{s}\n{s}\n{d}\n")).unwrap();
        fs::write(biases_path(dir.path(), 1), format!("{s}\n")).unwrap();
        let err = load_network(dir.path(), fmt()).unwrap_err();
        assert!(matches!(
            err,
            ParamError::Chip(ChipError::WidthMismatch { layer: 1, expected: 3, got: 1 })
        ));
    }
}
