/// Longest dimension value accepted by the metrics backend, in characters.
pub const MAX_DIMENSION_VALUE_LEN: usize = 255;

/// Make a value acceptable as a dimension value
///
/// Escaped `\x2d` and `\x7e` sequences are turned back into `-` and `~`, opening brackets
/// become `[`, closing brackets become `]`, and the characters `| \ ; , & = '` become `-`.
/// The result is truncated to [`MAX_DIMENSION_VALUE_LEN`] characters.
#[must_use]
pub fn sanitize_dimension_value(value: &str) -> String {
    value
        .replace(r"\x2d", "-")
        .replace(r"\x7e", "~")
        .chars()
        .map(|c| match c {
            '(' | '{' | '<' => '[',
            ')' | '}' | '>' => ']',
            '|' | '\\' | ';' | ',' | '&' | '=' | '\'' => '-',
            other => other,
        })
        .take(MAX_DIMENSION_VALUE_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_unchanged() {
        assert_eq!(sanitize_dimension_value("kube-system"), "kube-system");
    }

    #[test]
    fn test_escaped_sequences() {
        assert_eq!(sanitize_dimension_value(r"system.slice\x2dfoo\x7ebar"), "system.slice-foo~bar");
    }

    #[test]
    fn test_brackets() {
        assert_eq!(sanitize_dimension_value("f(x){y}<z>"), "f[x][y][z]");
    }

    #[test]
    fn test_illegal_characters() {
        assert_eq!(sanitize_dimension_value(r"a|b\c;d,e&f=g'h"), "a-b-c-d-e-f-g-h");
    }

    #[test]
    fn test_truncation() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_dimension_value(&long).chars().count(), MAX_DIMENSION_VALUE_LEN);

        let multibyte = "ü".repeat(300);
        assert_eq!(sanitize_dimension_value(&multibyte).chars().count(), MAX_DIMENSION_VALUE_LEN);
    }
}
