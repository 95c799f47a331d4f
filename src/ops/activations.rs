use crate::error::Result;
use crate::model::{Node, OperatorRecord};
use crate::ops::registry::OpKind;
use crate::ops::keyed_float;

/// Operators without metadata: element-wise math, activations, global pooling
pub fn decode_plain(kind: OpKind, record: &OperatorRecord<'_>) -> Node {
    Node::new(
        &record.name,
        kind.name(),
        &record.topology.inputs,
        &record.topology.outputs,
    )
}

/// LeakyReLU attributes, the whole metadata is `alpha`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakyReluAttributes {
    pub alpha: f32,
}

impl LeakyReluAttributes {
    pub fn parse(meta: &[u8], record: &str) -> Result<Self> {
        Ok(Self {
            alpha: keyed_float(meta, record, "alpha")?,
        })
    }
}

pub fn decode_leaky_relu(record: &OperatorRecord<'_>) -> Result<Node> {
    let attrs = LeakyReluAttributes::parse(record.meta, &record.name)?;
    Ok(decode_plain(OpKind::LeakyRelu, record).with_attribute("alpha", attrs.alpha))
}
