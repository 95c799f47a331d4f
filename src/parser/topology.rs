use crate::error::{Error, Result};
use crate::model::{TensorIndex, Topology};
use crate::parser::fields::{split_first, split_whitespace, to_str};

/// Parse `<outputs> <- <inputs>`, each side a list of `%`-prefixed indices
pub fn parse_topology(bytes: &[u8], record: &str) -> Result<Topology> {
    let (outputs, inputs) = split_first(bytes, b"<-")
        .ok_or_else(|| Error::format(record, "topology is missing the `<-` separator"))?;

    Ok(Topology {
        inputs: parse_indices(inputs, record)?,
        outputs: parse_indices(outputs, record)?,
    })
}

fn parse_indices(bytes: &[u8], record: &str) -> Result<Vec<TensorIndex>> {
    split_whitespace(bytes)
        .map(|token| {
            let start = token.iter().position(|&b| b != b'%').unwrap_or(token.len());
            let end = token.iter().rposition(|&b| b != b'%').map_or(start, |i| i + 1);
            let digits = to_str(&token[start..end], record, "topology")?;
            digits.parse::<usize>().map(TensorIndex::new).map_err(|_| {
                Error::format(
                    record,
                    format!("topology token `{}` is not a tensor index", String::from_utf8_lossy(token)),
                )
            })
        })
        .collect()
}
