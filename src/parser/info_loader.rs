use log::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{OperatorRecord, TensorArena, Topology};
use crate::parser::fields::trim;
use crate::parser::operator::parse_operator;
use crate::parser::tensor::{parse_tensor, record_index};
use crate::parser::topology::parse_topology;

const GRAPH_PREFIX: &[u8] = b"graph.";

/// Everything the info stream describes, parsed but not yet assembled
#[derive(Debug, Clone)]
pub struct ParsedInfo<'a> {
    pub operators: Vec<OperatorRecord<'a>>,
    pub graph: Topology,
    pub tensors: TensorArena,
}

/// Reads the info stream top to bottom:
/// operator records, a blank line, the `graph.` topology, one reserved
/// line, then tensor records until the end.
pub struct InfoLoader;

impl InfoLoader {
    pub fn parse(info: &[u8]) -> Result<ParsedInfo<'_>> {
        let mut lines = info.split_inclusive(|&b| b == b'\n');

        let mut operators = Vec::new();
        loop {
            match lines.next() {
                Some(line) if trim(line).is_empty() => break,
                Some(line) => operators.push(parse_operator(line)?),
                None => {
                    return Err(Error::format(
                        "info",
                        "stream ended before the blank line closing the operator list",
                    ))
                }
            }
        }
        debug!("parsed {} operator records", operators.len());

        let graph_line = lines
            .next()
            .ok_or_else(|| Error::format("info", "missing the graph topology record"))?;
        let graph = Self::parse_graph_line(graph_line)?;
        debug!("graph topology: {}", graph);

        // reserved line
        let _ = lines.next();

        let mut tensors = Vec::new();
        for line in lines {
            let tensor = parse_tensor(line)?;
            if let Some(index) = record_index(line) {
                if index != tensors.len() {
                    warn!(
                        "tensor record `{}` is labelled {} but sits at position {}",
                        tensor.name,
                        index,
                        tensors.len()
                    );
                }
            }
            debug!("tensor {}: {}", tensors.len(), tensor);
            tensors.push(tensor);
        }

        Ok(ParsedInfo {
            operators,
            graph,
            tensors: TensorArena::new(tensors),
        })
    }

    fn parse_graph_line(line: &[u8]) -> Result<Topology> {
        let line = trim(line);
        let body = line.strip_prefix(GRAPH_PREFIX).ok_or_else(|| {
            Error::format(
                String::from_utf8_lossy(line),
                "graph topology record must start with `graph.`",
            )
        })?;
        parse_topology(body, "graph")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TensorIndex;

    const RELU_INFO: &[u8] = b"0\trelu0\tRelu()%1 <- %0\n\
\n\
graph. %1 <- %0\n\
\n\
0\tx\tF32\tNCHW\t0 0\t[1 3 8 8]\n\
1\ty\tF32\tNCHW\t0 0\t[1 3 8 8]\n";

    #[test]
    fn test_parse_sections() {
        let info = InfoLoader::parse(RELU_INFO).unwrap();
        assert_eq!(info.operators.len(), 1);
        assert_eq!(info.graph.inputs, vec![TensorIndex::new(0)]);
        assert_eq!(info.graph.outputs, vec![TensorIndex::new(1)]);
        assert_eq!(info.tensors.len(), 2);
        assert_eq!(info.tensors[TensorIndex::new(1)].name, "y");
    }

    #[test]
    fn test_no_trailing_newline() {
        let text = b"\ngraph. %0 <- %0\n\n0\tx\tF32\tELSE\t0 0\t[]";
        let info = InfoLoader::parse(text).unwrap();
        assert!(info.operators.is_empty());
        assert_eq!(info.tensors.len(), 1);
    }

    #[test]
    fn test_missing_sentinel() {
        let err = InfoLoader::parse(b"0\trelu0\tRelu()%1 <- %0\n").unwrap_err();
        assert!(matches!(err, Error::FormatError { .. }));
    }

    #[test]
    fn test_missing_graph_prefix() {
        assert!(InfoLoader::parse(b"\n%1 <- %0\n\n").is_err());
    }

    #[test]
    fn test_blank_line_in_tensor_section() {
        let text = b"\ngraph. %0 <- %0\n\n0\tx\tF32\tELSE\t0 0\t[]\n\n";
        assert!(InfoLoader::parse(text).is_err());
    }
}
