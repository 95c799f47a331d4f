use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Options controlling a conversion run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Name of the emitted graph
    pub graph_name: String,
    /// Version of the default (empty) operator set domain
    pub default_opset_version: i64,
    /// Domain of the non-standard operators
    pub extension_domain: String,
    /// Version of the extension operator set
    pub extension_opset_version: i64,
    /// ONNX IR version written into the model
    pub ir_version: i64,
    pub producer_name: String,
    pub producer_version: String,
    /// File names looked up inside the input directory
    pub info_file_name: String,
    pub data_file_name: String,
    pub output_file_name: String,
    /// Slice initializers on the rayon pool
    pub parallel_extraction: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            graph_name: "graph".to_string(),
            default_opset_version: 13,
            extension_domain: "refactor".to_string(),
            extension_opset_version: 1,
            ir_version: 8,
            producer_name: env!("CARGO_PKG_NAME").to_string(),
            producer_version: env!("CARGO_PKG_VERSION").to_string(),
            info_file_name: "graph.info".to_string(),
            data_file_name: "graph.data".to_string(),
            output_file_name: "model_refactor.onnx".to_string(),
            parallel_extraction: true,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("Failed to read options: {}", e))
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn set_graph_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = name.into();
        self
    }

    pub fn set_extension_domain(mut self, domain: impl Into<String>, version: i64) -> Self {
        self.extension_domain = domain.into();
        self.extension_opset_version = version;
        self
    }

    pub fn set_default_opset_version(mut self, version: i64) -> Self {
        self.default_opset_version = version;
        self
    }

    pub fn set_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = name.into();
        self
    }

    pub fn enable_parallel_extraction(mut self, enable: bool) -> Self {
        self.parallel_extraction = enable;
        self
    }
}
