//! Template filters for manifest rendering
//!
//! Only string casing, quoting and indentation are needed; everything
//! else the manifests require is plain conditionals and iteration.

use minijinja::Value;

/// Quote a value with double quotes, escaping embedded quotes.
///
/// Usage: {{ value | quote }}
#[must_use]
pub fn quote(value: Value) -> String {
    let s = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Quote a value with single quotes, doubling embedded single quotes.
///
/// Usage: {{ value | squote }}
#[must_use]
pub fn squote(value: Value) -> String {
    let s = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };
    format!("'{}'", s.replace('\'', "''"))
}

/// Indent every non-empty line by `spaces`.
///
/// Usage: {{ content | indent(4) }}
#[must_use]
pub fn indent(value: String, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let mut out = String::with_capacity(value.len() + spaces);
    let mut first = true;
    for line in value.lines() {
        if !first {
            out.push('\n');
        }
        first = false;
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    out
}

/// Like [`indent`] but with a leading newline, for inlining blocks.
///
/// Usage: {{ content | nindent(4) }}
#[must_use]
pub fn nindent(value: String, spaces: usize) -> String {
    format!("\n{}", indent(value, spaces))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(Value::from("plain")), "\"plain\"");
        assert_eq!(quote(Value::from("say \"hi\"")), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_squote_doubles_quotes() {
        assert_eq!(squote(Value::from("it's")), "'it''s'");
    }

    #[test]
    fn test_indent_skips_empty_lines() {
        assert_eq!(indent("a\n\nb".to_string(), 2), "  a\n\n  b");
    }

    #[test]
    fn test_nindent_prefixes_newline() {
        assert_eq!(nindent("a\nb".to_string(), 4), "\n    a\n    b");
    }
}
