//! Name and text normalization.
//!
//! Graph stores identify a node by `(kind, normalized name)`, so every store
//! and the build pipeline go through these functions before writing.

/// Characters trimmed from both ends of exported entity names.
const FILLER: &[char] = &['.', '…'];

/// Normalize an entity name for storage: single quotes are removed.
pub fn normalize_name(name: &str) -> String {
    name.replace('\'', "")
}

/// Normalize a text property value: single quotes are removed and newlines
/// become spaces.
pub fn normalize_text(text: &str) -> String {
    text.replace('\'', "").replace(['\r', '\n'], " ")
}

/// Trim ellipsis filler (`.` and `…`) from both ends of a name.
pub fn strip_filler(name: &str) -> &str {
    name.trim_matches(FILLER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_removes_quotes() {
        assert_eq!(normalize_name("阿莫西林'胶囊'"), "阿莫西林胶囊");
        assert_eq!(normalize_name("plain"), "plain");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("first line\nit's second"), "first line its second");
        assert_eq!(normalize_text("a\r\nb"), "a  b");
    }

    #[test]
    fn test_strip_filler() {
        assert_eq!(strip_filler("...头痛..."), "头痛");
        assert_eq!(strip_filler("…发热"), "发热");
        assert_eq!(strip_filler("...."), "");
        assert_eq!(strip_filler("维生素B.C"), "维生素B.C");
    }
}
