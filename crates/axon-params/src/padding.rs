//! Legacy padded parameter storage.
//!
//! The hardware description stored every layer's weights and biases at the
//! maximum dimension found across all layers, because its array elements
//! could not vary in size; each layer's true dimension rode alongside in
//! `dims` and consumers sliced back down before use. The runtime model
//! keeps true-dimension containers instead, but the padded layout is still
//! what an on-device image looks like, so the inflate/deflate pair lives
//! on here.
//!
//! Invariant: `deflate(inflate(x)) == x` for the valid sub-range,
//! regardless of the padding contents.

use axon_chip::{LayerDims, NetworkParameters, Word};

/// Pad a weight matrix out to `max` dimensions with `fill`.
///
/// Rows beyond the true row count are entirely `fill`; true rows are
/// extended with `fill` columns.
pub fn inflate_matrix(
    matrix: &[Vec<Word>],
    max: LayerDims,
    fill: Word,
) -> Vec<Vec<Word>> {
    (0..max.rows)
        .map(|r| {
            (0..max.cols)
                .map(|c| {
                    matrix
                        .get(r)
                        .and_then(|row| row.get(c))
                        .copied()
                        .unwrap_or(fill)
                })
                .collect()
        })
        .collect()
}

/// Slice a padded matrix back down to its true dimensions.
///
/// Padding contents are never read as real data.
pub fn deflate_matrix(padded: &[Vec<Word>], dims: LayerDims) -> Vec<Vec<Word>> {
    padded
        .iter()
        .take(dims.rows)
        .map(|row| row.iter().take(dims.cols).copied().collect())
        .collect()
}

/// Pad a bias vector out to `max_len` entries with `fill`.
pub fn inflate_vector(vector: &[Word], max_len: usize, fill: Word) -> Vec<Word> {
    (0..max_len)
        .map(|i| vector.get(i).copied().unwrap_or(fill))
        .collect()
}

/// Slice a padded vector back down to its true length.
pub fn deflate_vector(padded: &[Word], len: usize) -> Vec<Word> {
    padded.iter().take(len).copied().collect()
}

/// The maximum dimensions across all layers of a network — the padded
/// storage dimension of the on-device layout.
pub fn max_dims(params: &NetworkParameters) -> LayerDims {
    let rows = params.layers().iter().map(|l| l.dims.rows).max().unwrap_or(0);
    let cols = params.layers().iter().map(|l| l.dims.cols).max().unwrap_or(0);
    LayerDims { rows, cols }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_chip::{LayerParameters, WordFormat};

    fn fmt() -> WordFormat {
        WordFormat::new(8, 8).unwrap()
    }

    fn words(values: &[f64]) -> Vec<Word> {
        values.iter().map(|&v| Word::from_f64(v, fmt())).collect()
    }

    #[test]
    fn deflate_inflate_is_idempotent() {
        let matrix = vec![words(&[0.5, -0.5]), words(&[1.0, 0.25])];
        let max = LayerDims { rows: 5, cols: 7 };
        // Padding contents must not matter: use a loud fill value.
        for fill in [0.0, -128.0, 1.0] {
            let padded = inflate_matrix(&matrix, max, Word::from_f64(fill, fmt()));
            assert_eq!(padded.len(), 5);
            assert!(padded.iter().all(|r| r.len() == 7));
            let back = deflate_matrix(&padded, LayerDims { rows: 2, cols: 2 });
            assert_eq!(back, matrix, "fill {fill}");
        }
    }

    #[test]
    fn vector_roundtrip() {
        let biases = words(&[0.25, -0.125, 0.0625]);
        let padded = inflate_vector(&biases, 8, Word::from_f64(-1.0, fmt()));
        assert_eq!(padded.len(), 8);
        assert_eq!(deflate_vector(&padded, 3), biases);
    }

    #[test]
    fn max_dims_spans_all_layers() {
        let params = NetworkParameters::new(vec![
            LayerParameters {
                dims: LayerDims { rows: 2, cols: 4 },
                weights: vec![words(&[0.0; 4]), words(&[0.0; 4])],
                biases: words(&[0.0, 0.0]),
            },
            LayerParameters {
                dims: LayerDims { rows: 3, cols: 2 },
                weights: vec![words(&[0.0; 2]); 3],
                biases: words(&[0.0; 3]),
            },
        ])
        .unwrap();
        assert_eq!(max_dims(&params), LayerDims { rows: 3, cols: 4 });
    }
}
