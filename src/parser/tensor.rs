use crate::error::{Error, Result};
use crate::model::{DataType, Layout, TensorDescriptor};
use crate::parser::fields::{
    parse_int_array, parse_u64_auto, split_on, split_whitespace, to_str, trim,
};

/// Parse one tab-separated tensor record:
/// `index, name, dtype, layout, "offset size", [shape]`
pub fn parse_tensor(line: &[u8]) -> Result<TensorDescriptor> {
    let line = trim(line);
    let record = String::from_utf8_lossy(line);
    let fields: Vec<&[u8]> = split_on(line, b'\t').collect();
    if fields.len() < 6 {
        return Err(Error::format(
            record,
            format!("tensor record has {} fields, expected 6", fields.len()),
        ));
    }

    let name = to_str(trim(fields[1]), &record, "name")?.to_string();
    let data_type = DataType::from_tag(to_str(trim(fields[2]), &name, "data type")?);

    let layout_tag = trim(fields[3]);
    let layout = Layout::from_tag(layout_tag).ok_or_else(|| {
        Error::format(
            &name,
            format!("unsupported layout `{}`", String::from_utf8_lossy(layout_tag)),
        )
    })?;

    let mut range = split_whitespace(fields[4]);
    let (offset, size) = match (range.next(), range.next()) {
        (Some(offset), Some(size)) => (
            parse_u64_auto(offset, &name, "offset")?,
            parse_u64_auto(size, &name, "size")?,
        ),
        _ => {
            return Err(Error::format(
                &name,
                "byte range must be `<offset> <size>`",
            ))
        }
    };

    let shape = parse_int_array(fields[5], &name, "shape")?;

    Ok(TensorDescriptor {
        name,
        data_type,
        layout,
        offset,
        size,
        shape,
    })
}

/// Leading index field of a tensor record, if it is a plain integer
pub fn record_index(line: &[u8]) -> Option<usize> {
    let field = split_on(trim(line), b'\t').next()?;
    std::str::from_utf8(trim(field)).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intermediate() {
        let tensor = parse_tensor(b"1\tconv_out\tF32\tNCHW\t0 0\t[1 3 8 8]\n").unwrap();
        assert_eq!(tensor.name, "conv_out");
        assert_eq!(tensor.data_type, DataType::Float);
        assert_eq!(tensor.layout, Layout::ChannelsFirst);
        assert_eq!(tensor.offset, 0);
        assert_eq!(tensor.size, 0);
        assert_eq!(tensor.shape, vec![1, 3, 8, 8]);
        assert!(!tensor.is_initializer());
    }

    #[test]
    fn test_parse_hex_range() {
        let tensor = parse_tensor(b"4\tweight\tI64\tELSE\t0x40 0x10\t[2]").unwrap();
        assert_eq!(tensor.offset, 64);
        assert_eq!(tensor.size, 16);
        assert_eq!(tensor.layout, Layout::Opaque);
        assert!(tensor.is_initializer());
    }

    #[test]
    fn test_scalar_shape() {
        let tensor = parse_tensor(b"0\tscale\tF32\tELSE\t8 4\t[]").unwrap();
        assert!(tensor.shape.is_empty());
    }

    #[test]
    fn test_unknown_dtype_is_undefined() {
        let tensor = parse_tensor(b"0\tq\tF8E4M3\tELSE\t0 0\t[4]").unwrap();
        assert_eq!(tensor.data_type, DataType::Undefined);
    }

    #[test]
    fn test_padded_dtype_tag() {
        let tensor = parse_tensor(b"0\tmask\tU8 \tELSE\t0 0\t[4]").unwrap();
        assert_eq!(tensor.data_type, DataType::Uint8);
    }

    #[test]
    fn test_bad_layout() {
        let err = parse_tensor(b"0\tx\tF32\tNHWC\t0 0\t[1]").unwrap_err();
        match err {
            Error::FormatError { record, message } => {
                assert_eq!(record, "x");
                assert!(message.contains("NHWC"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_bad_range_and_shape() {
        assert!(parse_tensor(b"0\tx\tF32\tNCHW\t12\t[1]").is_err());
        assert!(parse_tensor(b"0\tx\tF32\tNCHW\t0 0\t[1 a]").is_err());
        assert!(parse_tensor(b"0\tx\tF32\tNCHW").is_err());
    }

    #[test]
    fn test_record_index() {
        assert_eq!(record_index(b"12\tx\tF32\tNCHW\t0 0\t[1]"), Some(12));
        assert_eq!(record_index(b"x\ty"), None);
    }
}
