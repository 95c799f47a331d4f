use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use prost::Message;
use serde::Serialize;

use crate::config::ConvertOptions;
use crate::data::{DataRegion, MappedFile};
use crate::error::{Error, Result};
use crate::export::ModelExporter;
use crate::model::Graph;
use crate::parser::{GraphBuilder, InfoLoader};
use crate::proto::ModelProto;

/// Counts describing an assembled graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub name: String,
    pub nodes: usize,
    pub tensors: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub initializers: usize,
    pub value_info: usize,
}

impl GraphSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn of(graph: &Graph<'_>) -> Self {
        Self {
            name: graph.name.clone(),
            nodes: graph.nodes.len(),
            tensors: graph.tensors.len(),
            inputs: graph.inputs.len(),
            outputs: graph.outputs.len(),
            initializers: graph.all_initializers().count(),
            value_info: graph.value_info.len(),
        }
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "graph:        {}", self.name)?;
        writeln!(f, "nodes:        {}", self.nodes)?;
        writeln!(f, "tensors:      {}", self.tensors)?;
        writeln!(f, "inputs:       {}", self.inputs)?;
        writeln!(f, "outputs:      {}", self.outputs)?;
        writeln!(f, "initializers: {}", self.initializers)?;
        write!(f, "value_info:   {}", self.value_info)
    }
}

/// Converts graph dumps into ONNX models
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parse the info stream and assemble a graph borrowing `data`
    pub fn build_graph<'a>(&self, info: &[u8], data: &'a [u8]) -> Result<Graph<'a>> {
        let parsed = InfoLoader::parse(info)?;
        GraphBuilder::new()
            .set_name(self.options.graph_name.clone())
            .set_parallel_extraction(self.options.parallel_extraction)
            .build(parsed, DataRegion::new(data))
    }

    pub fn convert(&self, info: &[u8], data: &[u8]) -> Result<ModelProto> {
        let graph = self.build_graph(info, data)?;
        ModelExporter::new(&self.options).export_model(&graph)
    }

    pub fn summarize(&self, info: &[u8], data: &[u8]) -> Result<GraphSummary> {
        Ok(GraphSummary::of(&self.build_graph(info, data)?))
    }

    /// Convert `<dir>/graph.info` and `<dir>/graph.data`, writing the model
    /// to `output` or `<dir>/model_refactor.onnx`
    pub fn convert_dir(&self, dir: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let (info, data) = self.map_inputs(dir)?;
        let model = self.convert(&info, &data)?;
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.join(&self.options.output_file_name));
        Self::write_model(&model, &path)?;
        Ok(path)
    }

    pub fn summarize_dir(&self, dir: &Path) -> Result<GraphSummary> {
        let (info, data) = self.map_inputs(dir)?;
        self.summarize(&info, &data)
    }

    fn map_inputs(&self, dir: &Path) -> Result<(MappedFile, MappedFile)> {
        let info = MappedFile::open(&dir.join(&self.options.info_file_name))?;
        let data = MappedFile::open(&dir.join(&self.options.data_file_name))?;
        Ok((info, data))
    }

    pub fn write_model(model: &ModelProto, path: &Path) -> Result<()> {
        let mut buf = Vec::with_capacity(model.encoded_len());
        model.encode(&mut buf)?;
        fs::write(path, &buf).map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("Failed to write model: {}", e))
        })?;
        info!("wrote {} ({} bytes)", path.display(), buf.len());
        Ok(())
    }
}
