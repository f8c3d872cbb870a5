//! Byte-level leniency applied before input reaches serde_json.
//!
//! Neither helper understands JSON beyond string literals: they only track
//! whether the cursor sits inside a `"..."` so that commas, braces and quotes
//! embedded in strings are left untouched.

use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Drop a leading UTF-8 byte-order mark, if any.
pub(crate) fn strip_bom(input: &[u8]) -> &[u8] {
    input.strip_prefix(UTF8_BOM).unwrap_or(input)
}

/// Remove every comma that directly precedes a closing `}` or `]`.
///
/// A comma is only removed when it follows a value, so `[,]` and `[1,,]`
/// still reach the parser intact and are rejected there. Input without
/// trailing commas is returned borrowed.
pub(crate) fn remove_trailing_commas(input: &[u8]) -> Cow<'_, [u8]> {
    let mut out: Option<Vec<u8>> = None;
    let mut in_string = false;
    let mut escaped = false;
    let mut prev: Option<u8> = None;

    for (i, &b) in input.iter().enumerate() {
        let mut drop = false;
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
                prev = Some(b);
            }
        } else if b == b'"' {
            in_string = true;
        } else if !is_whitespace(b) {
            drop = b == b','
                && !matches!(prev, None | Some(b'[' | b'{' | b','))
                && closes_next(&input[i + 1..]);
            prev = Some(b);
        }

        if drop {
            out.get_or_insert_with(|| input[..i].to_vec());
        } else if let Some(buf) = out.as_mut() {
            buf.push(b);
        }
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(input),
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn closes_next(rest: &[u8]) -> bool {
    matches!(
        rest.iter().find(|b| !is_whitespace(**b)),
        Some(b'}' | b']')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(input: &str) -> String {
        String::from_utf8(remove_trailing_commas(input.as_bytes()).into_owned()).unwrap()
    }

    #[test]
    fn test_object_trailing_comma() {
        assert_eq!(fix(r#"{"a":1,}"#), r#"{"a":1}"#);
    }

    #[test]
    fn test_array_trailing_comma_with_whitespace() {
        assert_eq!(fix("[1, 2,\n  ]"), "[1, 2\n  ]");
    }

    #[test]
    fn test_nested_trailing_commas() {
        assert_eq!(
            fix(r#"{"a":[1,{"b":true,},],"c":null,}"#),
            r#"{"a":[1,{"b":true}],"c":null}"#
        );
    }

    #[test]
    fn test_commas_inside_strings_untouched() {
        let input = r#"{"a":"x,}","b":"y,]"}"#;
        assert_eq!(fix(input), input);
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let input = r#"{"a":"say \",}\" now"}"#;
        assert_eq!(fix(input), input);
    }

    #[test]
    fn test_escaped_backslash_before_quote() {
        assert_eq!(fix(r#"["\\",]"#), r#"["\\"]"#);
    }

    #[test]
    fn test_comma_without_value_kept() {
        assert_eq!(fix("[,]"), "[,]");
        assert_eq!(fix("[1,,]"), "[1,,]");
        assert_eq!(fix("{,}"), "{,}");
    }

    #[test]
    fn test_clean_input_is_borrowed() {
        let input = br#"{"a":[1,2],"b":{}}"#;
        assert!(matches!(remove_trailing_commas(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom(b"\xEF\xBB\xBF{}"), b"{}");
        assert_eq!(strip_bom(b"{}"), b"{}");
        assert_eq!(strip_bom(b""), b"");
    }
}
