//! Feed-forward policy network: two ReLU hidden layers and a linear output.

use crate::encoder::FeatureVector;
use crate::params::{DenseLayer, ModelParameters, OUTPUT_DIM};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum InferenceError {
    #[error("output layer produced {got} scores, expected {expected}")]
    Width { expected: usize, got: usize },
    #[error("score {index} is not finite ({value})")]
    NonFinite { index: usize, value: f64 },
}

/// One score per discretized action bucket. Higher is preferred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreVector([f64; OUTPUT_DIM]);

impl ScoreVector {
    pub fn new(scores: [f64; OUTPUT_DIM]) -> Self {
        Self(scores)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Index of the highest score; the first occurrence wins ties.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &s) in self.0.iter().enumerate().skip(1) {
            if s > self.0[best] {
                best = i;
            }
        }
        best
    }
}

/// Immutable network bound to one set of parameters.
#[derive(Debug, Clone)]
pub struct PolicyNetwork {
    params: ModelParameters,
}

impl PolicyNetwork {
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    /// Run a forward pass. Pure: the same features always give the same scores.
    pub fn infer(&self, features: &FeatureVector) -> Result<ScoreVector, InferenceError> {
        let [hidden1, hidden2, output] = self.params.layers();
        let h1 = dense(hidden1, features.as_slice(), true);
        let h2 = dense(hidden2, &h1, true);
        let out = dense(output, &h2, false);

        let got = out.len();
        let scores: [f64; OUTPUT_DIM] =
            out.try_into().map_err(|_| InferenceError::Width { expected: OUTPUT_DIM, got })?;
        if let Some((index, &value)) = scores.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFinite { index, value });
        }
        Ok(ScoreVector(scores))
    }
}

fn dense(layer: &DenseLayer, input: &[f64], relu: bool) -> Vec<f64> {
    let mut out = layer.bias().to_vec();
    for (i, &x) in input.iter().enumerate().take(layer.inputs()) {
        for (acc, &w) in out.iter_mut().zip(layer.row(i)) {
            *acc += x * w;
        }
    }
    if relu {
        for v in &mut out {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
    }
    out
}
