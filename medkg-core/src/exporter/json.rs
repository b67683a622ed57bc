//! JSON snapshot formatting.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize a value as pretty JSON with 4-space indentation and a trailing
/// newline. Non-ASCII text is written as-is.
pub fn to_pretty_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_space_indent() {
        let out = to_pretty_bytes(&vec!["a", "b"]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\n    \"a\",\n    \"b\"\n]\n");
    }

    #[test]
    fn test_non_ascii_literal() {
        let out = String::from_utf8(to_pretty_bytes(&["发热"]).unwrap()).unwrap();
        assert!(out.contains("\"发热\""));
        assert!(!out.contains("\\u"));
    }

    #[test]
    fn test_empty_array() {
        let out = to_pretty_bytes::<[String]>(&[]).unwrap();
        assert_eq!(out, b"[]\n");
    }
}
