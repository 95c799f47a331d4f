use crate::error::Result;
use crate::model::{Node, OperatorRecord};
use crate::ops::{keyed_number, meta_field, meta_fields};
use crate::parser::fields::trim;

/// `alpha=<f>, beta=<f>, AT|A, BT|B`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatMulAttributes {
    pub alpha: f64,
    pub beta: f64,
    pub trans_a: bool,
    pub trans_b: bool,
}

impl MatMulAttributes {
    pub fn parse(meta: &[u8], record: &str) -> Result<Self> {
        let fields = meta_fields(meta, b',');
        Ok(Self {
            alpha: keyed_number(meta_field(&fields, 0, record, "alpha")?, record, "alpha")?,
            beta: keyed_number(meta_field(&fields, 1, record, "beta")?, record, "beta")?,
            trans_a: trim(meta_field(&fields, 2, record, "transA")?) == b"AT",
            trans_b: trim(meta_field(&fields, 3, record, "transB")?) == b"BT",
        })
    }

    /// Anything beyond `A x B` needs the general form. Compared at f64
    /// precision, so scaling that only differs from the identity below f32
    /// resolution still selects `Gemm`.
    pub fn is_general(&self) -> bool {
        self.alpha != 1.0 || self.beta != 0.0 || self.trans_a || self.trans_b
    }
}

pub fn decode_matmul(record: &OperatorRecord<'_>) -> Result<Node> {
    let attrs = MatMulAttributes::parse(record.meta, &record.name)?;
    let inputs = &record.topology.inputs;
    let outputs = &record.topology.outputs;

    if attrs.is_general() {
        Ok(Node::new(&record.name, "Gemm", inputs, outputs)
            .with_attribute("alpha", attrs.alpha as f32)
            .with_attribute("beta", attrs.beta as f32)
            .with_attribute("transA", attrs.trans_a)
            .with_attribute("transB", attrs.trans_b))
    } else {
        Ok(Node::new(&record.name, "MatMul", inputs, outputs))
    }
}
