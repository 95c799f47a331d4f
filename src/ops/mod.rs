//! Per-operator decoding of record metadata into nodes.
//!
//! Every operator grammar lives in its own small parser returning a typed
//! attribute record, `registry` maps type tags onto them.

pub mod registry;
pub mod activations;
pub mod math;
pub mod nn;
pub mod tensor;
pub mod extension;

pub use registry::{decode_operator, OpKind};

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{OperatorRecord, TensorIndex};
use crate::parser::fields::{keyed_value, parse_number, split_on};

/// First tensor bound as input
pub(crate) fn first_input(record: &OperatorRecord<'_>) -> Result<TensorIndex> {
    record.topology.inputs.first().copied().ok_or_else(|| {
        Error::format(&record.name, format!("{} needs at least one input", record.op_type))
    })
}

/// First tensor bound as output
pub(crate) fn first_output(record: &OperatorRecord<'_>) -> Result<TensorIndex> {
    record.topology.outputs.first().copied().ok_or_else(|| {
        Error::format(&record.name, format!("{} needs at least one output", record.op_type))
    })
}

/// Metadata split positionally on `separator`
pub(crate) fn meta_fields<'m>(meta: &'m [u8], separator: u8) -> Vec<&'m [u8]> {
    split_on(meta, separator).collect()
}

/// Positional metadata field, failing with the field name when absent
pub(crate) fn meta_field<'m>(
    fields: &[&'m [u8]],
    position: usize,
    record: &str,
    field: &str,
) -> Result<&'m [u8]> {
    fields.get(position).copied().ok_or_else(|| {
        Error::format(record, format!("metadata is missing field `{}`", field))
    })
}

/// Float from a `key=value` or bare field
pub(crate) fn keyed_float(bytes: &[u8], record: &str, field: &str) -> Result<f32> {
    keyed_number(bytes, record, field)
}

/// Any number from a `key=value` or bare field
pub(crate) fn keyed_number<T: FromStr>(bytes: &[u8], record: &str, field: &str) -> Result<T> {
    parse_number(keyed_value(bytes), record, field)
}

/// Integer from a `key=value` or bare field
pub(crate) fn keyed_int(bytes: &[u8], record: &str, field: &str) -> Result<i64> {
    keyed_number(bytes, record, field)
}

/// Split a `4 * rank` list into dilations, strides and pads, `rank` values
/// each, taken from the leading contiguous slices. A length that is not a
/// multiple of four is truncated.
///
/// The list carries begin pads at `[2 * rank, 3 * rank)` and end pads at
/// `[3 * rank, 4 * rank)`. Only the begin pads are kept, so `pads` has
/// `rank` entries instead of the `2 * rank` begin/end form and asymmetric
/// end padding is lost.
pub(crate) fn split_window(values: &[i64]) -> (Vec<i64>, Vec<i64>, Vec<i64>) {
    let rank = values.len() / 4;
    (
        values[..rank].to_vec(),
        values[rank..2 * rank].to_vec(),
        values[2 * rank..3 * rank].to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_window() {
        let values: Vec<i64> = (1..=8).collect();
        let (dilations, strides, pads) = split_window(&values);
        assert_eq!(dilations, vec![1, 2]);
        assert_eq!(strides, vec![3, 4]);
        assert_eq!(pads, vec![5, 6]);
    }

    #[test]
    fn test_split_window_truncates() {
        let values: Vec<i64> = (1..=6).collect();
        let (dilations, strides, pads) = split_window(&values);
        assert_eq!(dilations, vec![1]);
        assert_eq!(strides, vec![2]);
        assert_eq!(pads, vec![3]);
    }
}
