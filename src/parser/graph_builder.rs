use std::collections::HashSet;

use log::{debug, info};
use rayon::prelude::*;

use crate::data::DataRegion;
use crate::error::Result;
use crate::model::{Graph, Initializer, InitializerData, TensorArena, TensorIndex, Topology};
use crate::ops::decode_operator;
use crate::parser::info_loader::ParsedInfo;

/// Graph builder responsible for assembling the final graph from parsed records
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    name: String,
    parallel_extraction: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            name: "graph".to_string(),
            parallel_extraction: true,
        }
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Extract initializer payloads on the rayon pool
    pub fn set_parallel_extraction(mut self, parallel: bool) -> Self {
        self.parallel_extraction = parallel;
        self
    }

    /// Build the graph. Nodes keep the record order of the info stream,
    /// no topological sorting is attempted.
    pub fn build<'a>(&self, info: ParsedInfo<'_>, data: DataRegion<'a>) -> Result<Graph<'a>> {
        let ParsedInfo {
            operators,
            graph: boundary,
            tensors,
        } = info;

        Self::validate_indices(&boundary, &tensors)?;
        for op in &operators {
            Self::validate_indices(&op.topology, &tensors)?;
        }

        let initializers = self.extract_initializers(&tensors, data)?;

        let nodes = operators
            .iter()
            .map(|op| decode_operator(op, &tensors))
            .collect::<Result<Vec<_>>>()?;

        let value_info = Self::intermediate_values(&boundary, &tensors);

        let graph = Graph {
            name: self.name.clone(),
            nodes,
            inputs: boundary.inputs,
            outputs: boundary.outputs,
            tensors,
            initializers,
            value_info,
        };

        info!(
            "assembled graph `{}`: {} nodes, {} tensors, {} initializers ({} synthesized), {} intermediate values",
            graph.name,
            graph.nodes.len(),
            graph.tensors.len(),
            graph.initializers.len(),
            graph.all_initializers().count() - graph.initializers.len(),
            graph.value_info.len()
        );
        Ok(graph)
    }

    /// Every topology index must name a parsed tensor
    pub fn validate_indices(topology: &Topology, tensors: &TensorArena) -> Result<()> {
        for index in topology.indices() {
            tensors.resolve(index)?;
        }
        Ok(())
    }

    /// Slice the payload of every tensor with a non-zero byte size
    pub fn extract_initializers<'a>(
        &self,
        tensors: &TensorArena,
        data: DataRegion<'a>,
    ) -> Result<Vec<Initializer<'a>>> {
        let constants: Vec<_> = tensors.iter().filter(|(_, t)| t.is_initializer()).collect();
        debug!(
            "extracting {} initializers from a {}-byte data region",
            constants.len(),
            data.len()
        );

        let extract = |(_, tensor): &(TensorIndex, &crate::model::TensorDescriptor)| {
            data.tensor(tensor).map(|bytes| Initializer {
                name: tensor.name.clone(),
                data_type: tensor.data_type,
                dims: tensor.shape.clone(),
                data: InitializerData::Raw(bytes),
            })
        };

        if self.parallel_extraction {
            constants.par_iter().map(extract).collect()
        } else {
            constants.iter().map(extract).collect()
        }
    }

    /// Tensors without payload that are not graph inputs or outputs
    pub fn intermediate_values(boundary: &Topology, tensors: &TensorArena) -> Vec<TensorIndex> {
        let boundary: HashSet<TensorIndex> = boundary.indices().collect();
        tensors
            .iter()
            .filter(|(index, tensor)| !tensor.is_initializer() && !boundary.contains(index))
            .map(|(index, _)| index)
            .collect()
    }
}
