use crate::error::{Error, Result};
use crate::model::{Node, OperatorRecord};
use crate::ops::registry::OpKind;
use crate::ops::{activations::decode_plain, keyed_float, meta_field, meta_fields, split_window};
use crate::parser::fields::{parse_int_array, trim};

/// `epsilon=<float>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchNormAttributes {
    pub epsilon: f32,
}

impl BatchNormAttributes {
    pub fn parse(meta: &[u8], record: &str) -> Result<Self> {
        Ok(Self {
            epsilon: keyed_float(meta, record, "epsilon")?,
        })
    }
}

pub fn decode_batch_normalization(record: &OperatorRecord<'_>) -> Result<Node> {
    let attrs = BatchNormAttributes::parse(record.meta, &record.name)?;
    Ok(decode_plain(OpKind::BatchNormalization, record).with_attribute("epsilon", attrs.epsilon))
}

/// Sliding window geometry shared by convolution and pooling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub dilations: Vec<i64>,
    pub strides: Vec<i64>,
    pub pads: Vec<i64>,
}

impl WindowAttributes {
    /// `[dilations.. strides.. pads.. ..]`, `rank` values each
    pub fn parse(list: &[u8], record: &str) -> Result<Self> {
        let values = parse_int_array(list, record, "window")?;
        let (dilations, strides, pads) = split_window(&values);
        Ok(Self {
            dilations,
            strides,
            pads,
        })
    }

    fn apply(self, node: Node) -> Node {
        node.with_attribute("dilations", self.dilations)
            .with_attribute("strides", self.strides)
            .with_attribute("pads", self.pads)
    }
}

pub fn decode_conv(record: &OperatorRecord<'_>) -> Result<Node> {
    let window = WindowAttributes::parse(record.meta, &record.name)?;
    Ok(window.apply(decode_plain(OpKind::Conv, record)))
}

/// `ceil_mode, [kernel_shape], [window]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxPoolAttributes {
    pub ceil_mode: bool,
    pub kernel_shape: Vec<i64>,
    pub window: WindowAttributes,
}

impl MaxPoolAttributes {
    pub fn parse(meta: &[u8], record: &str) -> Result<Self> {
        let fields = meta_fields(meta, b',');
        let ceil_mode = match trim(meta_field(&fields, 0, record, "ceil_mode")?) {
            b"true" => true,
            b"false" => false,
            other => {
                return Err(Error::format(
                    record,
                    format!(
                        "field `ceil_mode`: expected `true` or `false`, got `{}`",
                        String::from_utf8_lossy(other)
                    ),
                ))
            }
        };
        let kernel_shape =
            parse_int_array(meta_field(&fields, 1, record, "kernel_shape")?, record, "kernel_shape")?;
        let window = WindowAttributes::parse(meta_field(&fields, 2, record, "window")?, record)?;
        Ok(Self {
            ceil_mode,
            kernel_shape,
            window,
        })
    }
}

pub fn decode_max_pool(record: &OperatorRecord<'_>) -> Result<Node> {
    let attrs = MaxPoolAttributes::parse(record.meta, &record.name)?;
    let node = decode_plain(OpKind::MaxPool, record)
        .with_attribute("ceil_mode", attrs.ceil_mode)
        .with_attribute("kernel_shape", attrs.kernel_shape);
    Ok(attrs.window.apply(node))
}
