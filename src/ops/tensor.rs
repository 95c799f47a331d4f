use log::warn;

use crate::error::Result;
use crate::model::{
    DataType, Initializer, InitializerData, Node, NodeInput, OperatorRecord, TensorArena,
};
use crate::ops::registry::OpKind;
use crate::ops::{first_input, first_output, meta_field, meta_fields};
use crate::parser::fields::{parse_int_array, parse_number};

/// Reshape and Identity both become a `Reshape` whose target shape is a
/// synthesized INT64 constant copied from the declared output.
pub fn decode_reshape(record: &OperatorRecord<'_>, tensors: &TensorArena) -> Result<Node> {
    let input = first_input(record)?;
    let output = tensors.resolve(first_output(record)?)?;

    let shape = Initializer {
        name: format!("{}_shape", output.name),
        data_type: DataType::Int64,
        dims: vec![output.rank() as i64],
        data: InitializerData::Int64(output.shape.clone()),
    };

    let mut node = Node::new(&record.name, "Reshape", &[input], &record.topology.outputs);
    node.inputs.push(NodeInput::Extra(node.extra_initializers.len()));
    node.extra_initializers.push(shape);
    Ok(node)
}

/// `<axis>[/...]`, only the first slash-separated field is meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisAttributes {
    pub axis: i64,
}

impl AxisAttributes {
    pub fn parse(meta: &[u8], record: &str) -> Result<Self> {
        let fields = meta_fields(meta, b'/');
        Ok(Self {
            axis: parse_number(meta_field(&fields, 0, record, "axis")?, record, "axis")?,
        })
    }
}

/// Gather, Concat, Softmax and Split
pub fn decode_axis(kind: OpKind, record: &OperatorRecord<'_>) -> Result<Node> {
    let attrs = AxisAttributes::parse(record.meta, &record.name)?;
    Ok(Node::new(
        &record.name,
        kind.name(),
        &record.topology.inputs,
        &record.topology.outputs,
    )
    .with_attribute("axis", attrs.axis))
}

/// `[axes], <ignored>, keepDims`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceMeanAttributes {
    pub axes: Vec<i64>,
    pub keep_dims: bool,
}

impl ReduceMeanAttributes {
    pub fn parse(meta: &[u8], record: &str) -> Result<Self> {
        let fields = meta_fields(meta, b',');
        let axes = parse_int_array(meta_field(&fields, 0, record, "axes")?, record, "axes")?;
        // the dumper writes `, true`; the leading space is part of the literal
        let keep_dims = meta_field(&fields, 2, record, "keepDims")? == b" true";
        Ok(Self { axes, keep_dims })
    }
}

pub fn decode_reduce_mean(record: &OperatorRecord<'_>) -> Result<Node> {
    let attrs = ReduceMeanAttributes::parse(record.meta, &record.name)?;
    Ok(Node::new(
        &record.name,
        "ReduceMean",
        &[first_input(record)?],
        &[first_output(record)?],
    )
    .with_attribute("axes", attrs.axes)
    .with_attribute("keepdims", attrs.keep_dims))
}

pub fn decode_transpose(record: &OperatorRecord<'_>) -> Result<Node> {
    let perm = parse_int_array(record.meta, &record.name, "perm")?;
    Ok(Node::new(
        &record.name,
        "Transpose",
        &[first_input(record)?],
        &[first_output(record)?],
    )
    .with_attribute("perm", perm))
}

/// Slice bounds travel as inputs; the metadata is not decoded
pub fn decode_slice(record: &OperatorRecord<'_>) -> Result<Node> {
    Ok(Node::new(
        &record.name,
        "Slice",
        &record.topology.inputs,
        &[first_output(record)?],
    ))
}

/// Cast target type is the declared output's element type
pub fn decode_cast(record: &OperatorRecord<'_>, tensors: &TensorArena) -> Result<Node> {
    let input = first_input(record)?;
    let output = first_output(record)?;
    let to = tensors.resolve(output)?.data_type;
    if to == DataType::Undefined {
        warn!("Cast `{}` targets a tensor of undefined type", record.name);
    }
    Ok(Node::new(&record.name, "Cast", &[input], &[output])
        .with_attribute("to", to.to_proto() as i64))
}
