use crate::error::{Error, Result};
use crate::model::OperatorRecord;
use crate::parser::fields::{split_first, split_last, split_on, to_str, trim};
use crate::parser::topology::parse_topology;

/// Parse one operator record: `index \t name \t Type(meta)topology`.
///
/// The type ends at the first `(` and the metadata at the last `)`, so
/// the metadata itself may contain brackets and separators.
pub fn parse_operator(line: &[u8]) -> Result<OperatorRecord<'_>> {
    let line = trim(line);
    let record = String::from_utf8_lossy(line);
    let mut fields = split_on(line, b'\t');
    let (_, name, body) = match (fields.next(), fields.next(), fields.next()) {
        (Some(index), Some(name), Some(body)) => (index, name, body),
        _ => {
            return Err(Error::format(
                record,
                "operator record needs `index`, `name` and `type(meta)topology` fields",
            ))
        }
    };
    let name = to_str(trim(name), &record, "name")?.to_string();

    let (op_type, rest) = split_first(body, b"(")
        .ok_or_else(|| Error::format(&name, "operator type is not followed by `(`"))?;
    let (meta, topology) = split_last(rest, b')')
        .ok_or_else(|| Error::format(&name, "operator metadata is not closed by `)`"))?;

    Ok(OperatorRecord {
        op_type: to_str(trim(op_type), &name, "type")?.to_string(),
        meta: trim(meta),
        topology: parse_topology(topology, &name)?,
        name,
    })
}
