//! Operators outside the standard operator set. The registry places the
//! resulting nodes in the extension domain.

use crate::error::Result;
use crate::model::{Node, OperatorRecord};
use crate::ops::registry::OpKind;
use crate::ops::{activations::decode_plain, keyed_float, keyed_int, meta_field, meta_fields};

pub fn decode_rms_normalization(record: &OperatorRecord<'_>) -> Result<Node> {
    let epsilon = keyed_float(record.meta, &record.name, "epsilon")?;
    Ok(decode_plain(OpKind::RmsNormalization, record).with_attribute("epsilon", epsilon))
}

/// `epsilon=<float>, axis=<int>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerNormAttributes {
    pub epsilon: f32,
    pub axis: i64,
}

impl LayerNormAttributes {
    pub fn parse(meta: &[u8], record: &str) -> Result<Self> {
        let fields = meta_fields(meta, b',');
        Ok(Self {
            epsilon: keyed_float(meta_field(&fields, 0, record, "epsilon")?, record, "epsilon")?,
            axis: keyed_int(meta_field(&fields, 1, record, "axis")?, record, "axis")?,
        })
    }
}

pub fn decode_layer_normalization(record: &OperatorRecord<'_>) -> Result<Node> {
    let attrs = LayerNormAttributes::parse(record.meta, &record.name)?;
    Ok(decode_plain(OpKind::LayerNormalization, record)
        .with_attribute("epsilon", attrs.epsilon)
        .with_attribute("axis", attrs.axis))
}

pub fn decode_rotary_embedding(record: &OperatorRecord<'_>) -> Result<Node> {
    let theta = keyed_float(record.meta, &record.name, "theta")?;
    Ok(decode_plain(OpKind::RotaryPositionEmbedding, record).with_attribute("theta", theta))
}
