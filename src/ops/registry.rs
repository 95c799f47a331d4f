use log::debug;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::error::{Error, Result};
use crate::model::{Domain, Node, OperatorRecord, TensorArena};
use crate::ops::{activations, extension, math, nn, tensor};

/// Every operator type the dump may contain. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum OpKind {
    BatchNormalization,
    Conv,
    Relu,
    Tanh,
    Erf,
    Max,
    Add,
    Pow,
    Sqrt,
    Div,
    Mul,
    Sub,
    Exp,
    Log,
    Neg,
    Sigmoid,
    Where,
    GlobalAveragePool,
    MaxPool,
    MatMul,
    Reshape,
    Identity,
    Gather,
    Concat,
    Softmax,
    Split,
    ReduceMean,
    Transpose,
    Slice,
    Cast,
    RmsNormalization,
    LayerNormalization,
    RotaryPositionEmbedding,
    Gelu,
    LeakyRelu,
}

impl OpKind {
    /// Resolve a record's type tag
    pub fn from_type_tag(tag: &str, name: &str) -> Result<Self> {
        tag.parse().map_err(|_| Error::UnsupportedOperator {
            name: name.to_string(),
            op_type: tag.to_string(),
        })
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Operator set the decoded node belongs to
    pub fn domain(self) -> Domain {
        match self {
            OpKind::RmsNormalization
            | OpKind::LayerNormalization
            | OpKind::RotaryPositionEmbedding
            | OpKind::Gelu => Domain::Extension,
            _ => Domain::Default,
        }
    }

    /// Turn a record of this kind into a node
    pub fn decode(self, record: &OperatorRecord<'_>, tensors: &TensorArena) -> Result<Node> {
        let node = match self {
            OpKind::Relu
            | OpKind::Tanh
            | OpKind::Erf
            | OpKind::Max
            | OpKind::Add
            | OpKind::Pow
            | OpKind::Sqrt
            | OpKind::Div
            | OpKind::Mul
            | OpKind::Sub
            | OpKind::Exp
            | OpKind::Log
            | OpKind::Neg
            | OpKind::Sigmoid
            | OpKind::Where
            | OpKind::GlobalAveragePool
            | OpKind::Gelu => activations::decode_plain(self, record),
            OpKind::LeakyRelu => activations::decode_leaky_relu(record)?,
            OpKind::BatchNormalization => nn::decode_batch_normalization(record)?,
            OpKind::Conv => nn::decode_conv(record)?,
            OpKind::MaxPool => nn::decode_max_pool(record)?,
            OpKind::MatMul => math::decode_matmul(record)?,
            OpKind::Reshape | OpKind::Identity => tensor::decode_reshape(record, tensors)?,
            OpKind::Gather | OpKind::Concat | OpKind::Softmax | OpKind::Split => {
                tensor::decode_axis(self, record)?
            }
            OpKind::ReduceMean => tensor::decode_reduce_mean(record)?,
            OpKind::Transpose => tensor::decode_transpose(record)?,
            OpKind::Slice => tensor::decode_slice(record)?,
            OpKind::Cast => tensor::decode_cast(record, tensors)?,
            OpKind::RmsNormalization => extension::decode_rms_normalization(record)?,
            OpKind::LayerNormalization => extension::decode_layer_normalization(record)?,
            OpKind::RotaryPositionEmbedding => extension::decode_rotary_embedding(record)?,
        };

        debug!(
            "decoded {} `{}` as {} with {} attribute(s)",
            record.op_type,
            record.name,
            node.op_type,
            node.attributes.len()
        );
        Ok(node.in_domain(self.domain()))
    }
}

/// Decode one operator record, rejecting unknown type tags
pub fn decode_operator(record: &OperatorRecord<'_>, tensors: &TensorArena) -> Result<Node> {
    OpKind::from_type_tag(&record.op_type, &record.name)?.decode(record, tensors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_kind_round_trips_its_tag() {
        for kind in OpKind::iter() {
            assert_eq!(OpKind::from_type_tag(kind.name(), "n").unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_tag() {
        match OpKind::from_type_tag("Resize", "up0").unwrap_err() {
            Error::UnsupportedOperator { name, op_type } => {
                assert_eq!(name, "up0");
                assert_eq!(op_type, "Resize");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(OpKind::from_type_tag("relu", "r").is_err());
    }

    #[test]
    fn test_extension_domain() {
        assert_eq!(OpKind::Gelu.domain(), Domain::Extension);
        assert_eq!(OpKind::LayerNormalization.domain(), Domain::Extension);
        assert_eq!(OpKind::LeakyRelu.domain(), Domain::Default);
    }
}
