//! Parameter store: loads the weights of the fixed 7 -> 32 -> 32 -> 41 network.
//!
//! The document layout follows a Keras weight export:
//!
//! ```json
//! { "model_weights": {
//!     "dense":   { "dense":   { "kernel:0": [[...]], "bias:0": [...] } },
//!     "dense_1": { "dense_1": { "kernel:0": [[...]], "bias:0": [...] } },
//!     "dense_2": { "dense_2": { "kernel:0": [[...]], "bias:0": [...] } } } }
//! ```
//!
//! Kernels are `inputs` rows of `outputs` columns, either nested or already
//! flattened row-major.

use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Length of the encoded feature vector.
pub const INPUT_DIM: usize = 7;
/// Width of both hidden layers.
pub const HIDDEN_DIM: usize = 32;
/// Number of discretized action buckets scored by the network.
pub const OUTPUT_DIM: usize = 41;

/// Layer names in evaluation order.
pub const LAYER_NAMES: [&str; 3] = ["dense", "dense_1", "dense_2"];
const LAYER_SHAPES: [(usize, usize); 3] =
    [(INPUT_DIM, HIDDEN_DIM), (HIDDEN_DIM, HIDDEN_DIM), (HIDDEN_DIM, OUTPUT_DIM)];

const ROOT_KEY: &str = "model_weights";
const KERNEL_KEY: &str = "kernel:0";
const BIAS_KEY: &str = "bias:0";

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read parameter document: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed parameter document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("missing key `{0}`")]
    MissingKey(String),
    #[error("expected numeric array at `{0}`")]
    NotNumeric(String),
    #[error("layer {layer} kernel: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    KernelShape { layer: &'static str, expected_rows: usize, expected_cols: usize, rows: usize, cols: usize },
    #[error("layer {layer} kernel: expected {expected} values, got {got}")]
    KernelLength { layer: &'static str, expected: usize, got: usize },
    #[error("layer {layer} bias: expected {expected} values, got {got}")]
    BiasLength { layer: &'static str, expected: usize, got: usize },
}

/// One dense layer: a row-major `inputs x outputs` kernel plus a bias per output.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    inputs: usize,
    outputs: usize,
    kernel: Vec<f64>,
    bias: Vec<f64>,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    /// Row `i` of the kernel: the weights leaving input `i`.
    pub(crate) fn row(&self, i: usize) -> &[f64] {
        &self.kernel[i * self.outputs..(i + 1) * self.outputs]
    }
}

/// Validated parameters for all three layers.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    layers: [DenseLayer; 3],
}

impl ModelParameters {
    /// Build from already-flattened row-major kernels and biases, checking shapes.
    pub fn from_layers(layers: [(Vec<f64>, Vec<f64>); 3]) -> Result<Self, LoadError> {
        let [l1, l2, l3] = layers;
        Ok(Self { layers: [build(0, l1.0, l1.1)?, build(1, l2.0, l2.1)?, build(2, l3.0, l3.1)?] })
    }

    /// Parse a parameter document.
    ///
    /// ```
    /// use poker_policy::params::{LoadError, ModelParameters};
    ///
    /// let err = ModelParameters::from_json_str(r#"{"model_weights": {}}"#).unwrap_err();
    /// assert!(matches!(err, LoadError::MissingKey(_)));
    /// ```
    pub fn from_json_str(doc: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(doc)?;
        Self::from_value(&value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(&value)
    }

    pub fn from_value(doc: &Value) -> Result<Self, LoadError> {
        let root = doc.get(ROOT_KEY).ok_or_else(|| LoadError::MissingKey(ROOT_KEY.to_string()))?;
        Ok(Self { layers: [parse_layer(root, 0)?, parse_layer(root, 1)?, parse_layer(root, 2)?] })
    }

    pub fn layers(&self) -> &[DenseLayer; 3] {
        &self.layers
    }

    /// Serialize back into the document layout accepted by [`from_json_str`](Self::from_json_str).
    pub fn to_value(&self) -> Value {
        let mut weights = serde_json::Map::new();
        for (layer, name) in self.layers.iter().zip(LAYER_NAMES) {
            let rows: Vec<Value> = (0..layer.inputs).map(|i| Value::from(layer.row(i).to_vec())).collect();
            let inner = serde_json::json!({ name: { KERNEL_KEY: rows, BIAS_KEY: layer.bias.clone() } });
            weights.insert(name.to_string(), inner);
        }
        serde_json::json!({ ROOT_KEY: weights })
    }
}

fn build(idx: usize, kernel: Vec<f64>, bias: Vec<f64>) -> Result<DenseLayer, LoadError> {
    let layer = LAYER_NAMES[idx];
    let (inputs, outputs) = LAYER_SHAPES[idx];
    if kernel.len() != inputs * outputs {
        return Err(LoadError::KernelLength { layer, expected: inputs * outputs, got: kernel.len() });
    }
    if bias.len() != outputs {
        return Err(LoadError::BiasLength { layer, expected: outputs, got: bias.len() });
    }
    Ok(DenseLayer { inputs, outputs, kernel, bias })
}

fn parse_layer(root: &Value, idx: usize) -> Result<DenseLayer, LoadError> {
    let name = LAYER_NAMES[idx];
    let (inputs, outputs) = LAYER_SHAPES[idx];
    let path = format!("{ROOT_KEY}.{name}.{name}");
    let node = root
        .get(name)
        .and_then(|group| group.get(name))
        .ok_or_else(|| LoadError::MissingKey(path.clone()))?;

    let kernel_path = format!("{path}[\"{KERNEL_KEY}\"]");
    let kernel_value =
        node.get(KERNEL_KEY).ok_or_else(|| LoadError::MissingKey(kernel_path.clone()))?;
    let kernel = parse_kernel(kernel_value, &kernel_path, name, inputs, outputs)?;

    let bias_path = format!("{path}[\"{BIAS_KEY}\"]");
    let bias_value = node.get(BIAS_KEY).ok_or_else(|| LoadError::MissingKey(bias_path.clone()))?;
    let bias = numbers(bias_value, &bias_path)?;

    build(idx, kernel, bias)
}

fn parse_kernel(
    value: &Value,
    path: &str,
    layer: &'static str,
    inputs: usize,
    outputs: usize,
) -> Result<Vec<f64>, LoadError> {
    let items = value.as_array().ok_or_else(|| LoadError::NotNumeric(path.to_string()))?;
    if !items.iter().any(Value::is_array) {
        return numbers(value, path);
    }
    let mut flat = Vec::with_capacity(inputs * outputs);
    for (i, row) in items.iter().enumerate() {
        let row = numbers(row, &format!("{path}[{i}]"))?;
        if row.len() != outputs {
            return Err(LoadError::KernelShape {
                layer,
                expected_rows: inputs,
                expected_cols: outputs,
                rows: items.len(),
                cols: row.len(),
            });
        }
        flat.extend(row);
    }
    if items.len() != inputs {
        return Err(LoadError::KernelShape {
            layer,
            expected_rows: inputs,
            expected_cols: outputs,
            rows: items.len(),
            cols: outputs,
        });
    }
    Ok(flat)
}

fn numbers(value: &Value, path: &str) -> Result<Vec<f64>, LoadError> {
    let items = value.as_array().ok_or_else(|| LoadError::NotNumeric(path.to_string()))?;
    items.iter().map(|v| v.as_f64().ok_or_else(|| LoadError::NotNumeric(path.to_string()))).collect()
}

/// Where the engine obtains its parameters during initialization.
pub trait ParameterSource {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<ModelParameters, LoadError>;
}

/// Parameters read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl ParameterSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<ModelParameters, LoadError> {
        let file = File::open(&self.path)?;
        ModelParameters::from_reader(BufReader::new(file))
    }
}

/// Parameters held in memory as an unparsed document.
#[derive(Debug, Clone)]
pub struct InlineSource(pub String);

impl ParameterSource for InlineSource {
    fn describe(&self) -> String {
        format!("inline document ({} bytes)", self.0.len())
    }

    fn fetch(&self) -> Result<ModelParameters, LoadError> {
        ModelParameters::from_json_str(&self.0)
    }
}

impl ParameterSource for ModelParameters {
    fn describe(&self) -> String {
        "preloaded parameters".to_string()
    }

    fn fetch(&self) -> Result<ModelParameters, LoadError> {
        Ok(self.clone())
    }
}
