//! Byte-level field splitting shared by every record parser.
//!
//! Records separate fields with literal characters only (`\t`, `<-`, `,`,
//! `/`, brackets), there is no quoting or escaping.

use std::str::FromStr;

use crate::error::{Error, Result};

/// Strip ASCII whitespace from both ends
pub fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Strip whitespace, then any leading `[` and trailing `]`
pub fn strip_brackets(bytes: &[u8]) -> &[u8] {
    let mut bytes = trim(bytes);
    while let [b'[', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b']'] = bytes {
        bytes = rest;
    }
    bytes
}

/// Positional split on a single separator byte. Empty fields are kept.
pub fn split_on(bytes: &[u8], separator: u8) -> impl Iterator<Item = &[u8]> {
    bytes.split(move |&b| b == separator)
}

/// Non-empty whitespace separated tokens
pub fn split_whitespace(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
}

/// Elements of a bracketed list such as `[1 3 224 224]`
pub fn split_array(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    split_whitespace(strip_brackets(bytes))
}

/// Split around the first occurrence of `separator`
pub fn split_first<'a>(bytes: &'a [u8], separator: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    find(bytes, separator).map(|i| (&bytes[..i], &bytes[i + separator.len()..]))
}

/// Split around the last occurrence of `separator`
pub fn split_last(bytes: &[u8], separator: u8) -> Option<(&[u8], &[u8])> {
    bytes
        .iter()
        .rposition(|&b| b == separator)
        .map(|i| (&bytes[..i], &bytes[i + 1..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Borrow a field as UTF-8 text
pub fn to_str<'a>(bytes: &'a [u8], record: &str, field: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|_| Error::format(record, format!("field `{}` is not valid UTF-8", field)))
}

/// Parse a trimmed base-10 literal
pub fn parse_number<T: FromStr>(bytes: &[u8], record: &str, field: &str) -> Result<T> {
    let text = to_str(trim(bytes), record, field)?;
    text.parse().map_err(|_| {
        Error::format(record, format!("field `{}`: invalid number literal `{}`", field, text))
    })
}

/// Parse an unsigned offset literal: decimal or `0x`-prefixed hexadecimal.
/// Decimal literals may not carry leading zeros, `0` and `000` excepted.
pub fn parse_u64_auto(bytes: &[u8], record: &str, field: &str) -> Result<u64> {
    let text = to_str(trim(bytes), record, field)?;
    let invalid = || {
        Error::format(record, format!("field `{}`: invalid integer literal `{}`", field, text))
    };
    let (digits, radix) = match text.get(..2) {
        Some("0x") | Some("0X") => (&text[2..], 16),
        _ => (text, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    if radix == 10 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return Err(invalid());
    }
    u64::from_str_radix(digits, radix).map_err(|_| invalid())
}

/// Value of a `key=value` field; a bare value is accepted as-is
pub fn keyed_value(bytes: &[u8]) -> &[u8] {
    match split_last(bytes, b'=') {
        Some((_, value)) => trim(value),
        None => trim(bytes),
    }
}

/// Parse every element of a bracketed integer list
pub fn parse_int_array(bytes: &[u8], record: &str, field: &str) -> Result<Vec<i64>> {
    split_array(bytes)
        .map(|token| parse_number(token, record, field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_brackets() {
        assert_eq!(trim(b"  a b \t\n"), b"a b");
        assert_eq!(trim(b"   "), b"");
        assert_eq!(strip_brackets(b" [1 2 3] "), b"1 2 3");
        assert_eq!(strip_brackets(b"[]"), b"");
    }

    #[test]
    fn test_split_array() {
        let items: Vec<&[u8]> = split_array(b"[ 1  3 8\t8 ]").collect();
        assert_eq!(items, vec![&b"1"[..], b"3", b"8", b"8"]);
        assert_eq!(split_array(b"[]").count(), 0);
        assert_eq!(split_array(b"").count(), 0);
    }

    #[test]
    fn test_split_on_keeps_positions() {
        let fields: Vec<&[u8]> = split_on(b"a\t\tc", b'\t').collect();
        assert_eq!(fields, vec![&b"a"[..], b"", b"c"]);
    }

    #[test]
    fn test_split_first_and_last() {
        assert_eq!(
            split_first(b"%1 <- %0", b"<-"),
            Some((&b"%1 "[..], &b" %0"[..]))
        );
        assert_eq!(split_first(b"%1 %0", b"<-"), None);
        assert_eq!(split_last(b"a)b)c", b')'), Some((&b"a)b"[..], &b"c"[..])));
    }

    #[test]
    fn test_parse_u64_auto() {
        assert_eq!(parse_u64_auto(b"128", "t", "offset").unwrap(), 128);
        assert_eq!(parse_u64_auto(b"0x80", "t", "offset").unwrap(), 128);
        assert_eq!(parse_u64_auto(b" 0X1f ", "t", "offset").unwrap(), 31);
        assert!(parse_u64_auto(b"0xzz", "t", "offset").is_err());
        assert!(parse_u64_auto(b"-1", "t", "offset").is_err());
        assert!(parse_u64_auto(b"0x+1", "t", "offset").is_err());
    }

    #[test]
    fn test_parse_u64_auto_rejects_other_radixes() {
        assert_eq!(parse_u64_auto(b"0", "t", "offset").unwrap(), 0);
        assert_eq!(parse_u64_auto(b"000", "t", "offset").unwrap(), 0);
        assert!(parse_u64_auto(b"010", "t", "offset").is_err());
        assert!(parse_u64_auto(b"0o17", "t", "offset").is_err());
        assert!(parse_u64_auto(b"0b101", "t", "offset").is_err());
        assert!(parse_u64_auto(b"0x", "t", "offset").is_err());
    }

    #[test]
    fn test_keyed_value() {
        assert_eq!(keyed_value(b"epsilon=1e-5"), b"1e-5");
        assert_eq!(keyed_value(b" alpha = 2 "), b"2");
        assert_eq!(keyed_value(b"0.01"), b"0.01");
    }

    #[test]
    fn test_number_error_names_field() {
        let err = parse_number::<f32>(b"abc", "bn0", "epsilon").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bn0"));
        assert!(message.contains("epsilon"));
    }
}
