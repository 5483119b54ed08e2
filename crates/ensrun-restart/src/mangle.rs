//! Keyword mangling for repeated restart headers (§3, §4.4).

/// Replace any character outside `[A-Za-z0-9_+-]` with `_`, matching the
/// external codec's filename-escaping convention for a key that must be
/// usable as both a store component and a filesystem component.
pub fn sanitize_keyword(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '+' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphanumeric_and_allowed_punctuation_pass_through() {
        assert_eq!(sanitize_keyword("PRESSURE_1"), "PRESSURE_1");
        assert_eq!(sanitize_keyword("A+B-C"), "A+B-C");
    }

    #[test]
    fn forbidden_characters_are_replaced() {
        assert_eq!(sanitize_keyword("LGR:1/PRESSURE"), "LGR_1_PRESSURE");
        assert_eq!(sanitize_keyword("A B"), "A_B");
    }
}
