//! Structural mapping from the assembled graph to ONNX protobuf messages.

use bytes::Bytes;
use log::debug;

use crate::config::ConvertOptions;
use crate::error::Result;
use crate::model::{Attribute, Domain, Graph, Initializer, InitializerData, Node, TensorIndex};
use crate::proto::{
    attribute_proto::AttributeType, tensor_shape_proto, type_proto, AttributeProto, GraphProto,
    ModelProto, NodeProto, OperatorSetIdProto, TensorProto, TensorShapeProto, TypeProto,
    ValueInfoProto,
};

/// Builds `ModelProto`s from graphs
pub struct ModelExporter<'o> {
    options: &'o ConvertOptions,
}

impl<'o> ModelExporter<'o> {
    pub fn new(options: &'o ConvertOptions) -> Self {
        Self { options }
    }

    pub fn export_model(&self, graph: &Graph<'_>) -> Result<ModelProto> {
        Ok(ModelProto {
            ir_version: self.options.ir_version,
            opset_import: self.opset_imports(),
            producer_name: self.options.producer_name.clone(),
            producer_version: self.options.producer_version.clone(),
            graph: Some(self.export_graph(graph)?),
            ..Default::default()
        })
    }

    /// Extension domain first, then the default domain
    pub fn opset_imports(&self) -> Vec<OperatorSetIdProto> {
        vec![
            OperatorSetIdProto {
                domain: self.options.extension_domain.clone(),
                version: self.options.extension_opset_version,
            },
            OperatorSetIdProto {
                domain: String::new(),
                version: self.options.default_opset_version,
            },
        ]
    }

    pub fn export_graph(&self, graph: &Graph<'_>) -> Result<GraphProto> {
        let node = graph
            .nodes
            .iter()
            .map(|n| self.export_node(graph, n))
            .collect::<Result<Vec<_>>>()?;

        let value_infos = |indices: &[TensorIndex]| {
            indices
                .iter()
                .map(|&i| Self::export_value_info(graph, i))
                .collect::<Result<Vec<_>>>()
        };

        let initializer: Vec<TensorProto> =
            graph.all_initializers().map(Self::export_initializer).collect();
        debug!(
            "exporting {} nodes and {} initializers",
            node.len(),
            initializer.len()
        );

        Ok(GraphProto {
            node,
            name: graph.name.clone(),
            initializer,
            input: value_infos(&graph.inputs)?,
            output: value_infos(&graph.outputs)?,
            value_info: value_infos(&graph.value_info)?,
            ..Default::default()
        })
    }

    fn export_node(&self, graph: &Graph<'_>, node: &Node) -> Result<NodeProto> {
        let input = node
            .inputs
            .iter()
            .map(|&i| graph.input_name(node, i).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        let output = node
            .outputs
            .iter()
            .map(|&i| graph.tensors.resolve(i).map(|t| t.name.clone()))
            .collect::<Result<Vec<_>>>()?;
        let domain = match node.domain {
            Domain::Default => String::new(),
            Domain::Extension => self.options.extension_domain.clone(),
        };

        Ok(NodeProto {
            input,
            output,
            name: node.name.clone(),
            op_type: node.op_type.to_string(),
            domain,
            attribute: node
                .attributes
                .iter()
                .map(|(name, value)| Self::export_attribute(name, value))
                .collect(),
            ..Default::default()
        })
    }

    pub fn export_attribute(name: &str, value: &Attribute) -> AttributeProto {
        let mut proto = AttributeProto {
            name: name.to_string(),
            ..Default::default()
        };
        match value {
            Attribute::Float(f) => {
                proto.set_type(AttributeType::Float);
                proto.f = *f;
            }
            Attribute::Int(i) => {
                proto.set_type(AttributeType::Int);
                proto.i = *i;
            }
            Attribute::Ints(ints) => {
                proto.set_type(AttributeType::Ints);
                proto.ints = ints.clone();
            }
        }
        proto
    }

    pub fn export_initializer(init: &Initializer<'_>) -> TensorProto {
        let mut proto = TensorProto {
            name: init.name.clone(),
            data_type: init.data_type.to_proto(),
            dims: init.dims.clone(),
            ..Default::default()
        };
        match &init.data {
            InitializerData::Raw(bytes) => proto.raw_data = Bytes::copy_from_slice(bytes),
            InitializerData::Int64(values) => proto.int64_data = values.clone(),
        }
        proto
    }

    pub fn export_value_info(graph: &Graph<'_>, index: TensorIndex) -> Result<ValueInfoProto> {
        let tensor = graph.tensors.resolve(index)?;
        let shape = TensorShapeProto {
            dim: tensor
                .shape
                .iter()
                .map(|&d| tensor_shape_proto::Dimension {
                    value: Some(tensor_shape_proto::dimension::Value::DimValue(d)),
                    ..Default::default()
                })
                .collect(),
        };
        Ok(ValueInfoProto {
            name: tensor.name.clone(),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                    elem_type: tensor.data_type.to_proto(),
                    shape: Some(shape),
                })),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}
