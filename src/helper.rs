//! Text utilities shared by the compiler: marker expansion, binding
//! flattening, column-list expansion and identifier escaping.

use crate::ast::Value;
use crate::error::{ComposeError, ComposeResult};
use once_cell::sync::Lazy;
use regex::Regex;

static EXPANSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\w+\.){1,2}\{(.*)\}").expect("static regex"));
static LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("static regex"));

/// Splay array values one level down.
pub fn flatten(values: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Array(items) => out.extend(items.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Splay array values recursively.
pub fn flatten_deep(values: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Array(items) => out.extend(flatten_deep(items)),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Byte offsets of every non-overlapping occurrence of `needle`.
pub fn all_indexes_of(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack.match_indices(needle).map(|(i, _)| i).collect()
}

/// Replace the i-th occurrence of `needle` with `replacement(i)`.
pub fn replace_all(subject: &str, needle: &str, mut replacement: impl FnMut(usize) -> String) -> String {
    if needle.is_empty() || !subject.contains(needle) {
        return subject.to_string();
    }
    let mut parts = subject.split(needle);
    let mut out = String::with_capacity(subject.len());
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for (i, part) in parts.enumerate() {
        out.push_str(&replacement(i));
        out.push_str(part);
    }
    out
}

/// Replace each marker whose binding is an array with one marker per
/// element, comma-joined. An empty array leaves nothing behind.
pub fn expand_parameters(sql: &str, placeholder: &str, bindings: &[Value]) -> ComposeResult<String> {
    let markers = all_indexes_of(sql, placeholder).len();
    if markers != bindings.len() {
        return Err(ComposeError::MarkerMismatch {
            markers,
            bindings: bindings.len(),
        });
    }
    Ok(replace_all(sql, placeholder, |i| match &bindings[i] {
        Value::Array(items) => vec![placeholder; items.len()].join(","),
        _ => placeholder.to_string(),
    }))
}

/// `"users.{id, name}"` becomes `["users.id", "users.name"]`; anything
/// else is returned as a single item.
pub fn expand_expression(expression: &str) -> Vec<String> {
    let Some(captures) = EXPANSION_PATTERN.captures(expression) else {
        return vec![expression.to_string()];
    };
    let Some(prefix_end) = expression.find(".{") else {
        return vec![expression.to_string()];
    };
    let prefix = &expression[..prefix_end];
    let inner = captures.get(1).map_or("", |m| m.as_str());

    LIST_SEPARATOR
        .split(inner)
        .map(|column| format!("{}.{}", prefix, column.trim()))
        .collect()
}

/// Replace `identifier` with `replacement` unless it is preceded by
/// `escape`; escaped occurrences lose the escape and stay literal.
pub fn replace_identifier_unless_escaped(
    input: &str,
    escape: &str,
    identifier: &str,
    replacement: &str,
) -> String {
    if identifier.is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while !rest.is_empty() {
        if rest.starts_with(escape) && rest[escape.len()..].starts_with(identifier) {
            out.push_str(identifier);
            rest = &rest[escape.len() + identifier.len()..];
        } else if let Some(after) = rest.strip_prefix(identifier) {
            out.push_str(replacement);
            rest = after;
        } else {
            let ch = rest.chars().next().map_or(1, char::len_utf8);
            out.push_str(&rest[..ch]);
            rest = &rest[ch..];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::array;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_array_marker() {
        let sql = expand_parameters("id in (?)", "?", &[array([1, 2, 3])]).unwrap();
        assert_eq!(sql, "id in (?,?,?)");
    }

    #[test]
    fn test_expand_empty_array_marker() {
        let sql = expand_parameters("id in (?)", "?", &[Value::Array(vec![])]).unwrap();
        assert_eq!(sql, "id in ()");
    }

    #[test]
    fn test_expand_leaves_scalars() {
        let sql = expand_parameters("a = ? and b in (?) and c = ?", "?", &[
            Value::Int(1),
            array(["x", "y"]),
            Value::Int(2),
        ])
        .unwrap();
        assert_eq!(sql, "a = ? and b in (?,?) and c = ?");
    }

    #[test]
    fn test_expand_marker_count_mismatch() {
        let err = expand_parameters("a = ? and b = ?", "?", &[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, ComposeError::MarkerMismatch { markers: 2, bindings: 1 }));
    }

    #[test]
    fn test_flatten_one_level() {
        let values = vec![
            Value::Int(1),
            Value::Array(vec![Value::Int(2), Value::Array(vec![Value::Int(3)])]),
        ];
        assert_eq!(
            flatten(&values),
            vec![Value::Int(1), Value::Int(2), Value::Array(vec![Value::Int(3)])]
        );
        assert_eq!(
            flatten_deep(&values),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_replace_all_numbers_occurrences() {
        let out = replace_all("? and ? or ?", "?", |i| format!("@p{}", i));
        assert_eq!(out, "@p0 and @p1 or @p2");
        assert_eq!(replace_all("no markers", "?", |i| i.to_string()), "no markers");
    }

    #[test]
    fn test_all_indexes_of() {
        assert_eq!(all_indexes_of("a?b?c", "?"), vec![1, 3]);
        assert_eq!(all_indexes_of("abc", ""), Vec::<usize>::new());
    }

    #[test]
    fn test_expand_expression() {
        assert_eq!(
            expand_expression("users.{id, name ,email}"),
            vec!["users.id", "users.name", "users.email"]
        );
        assert_eq!(
            expand_expression("public.users.{id,name}"),
            vec!["public.users.id", "public.users.name"]
        );
        assert_eq!(expand_expression("users.id"), vec!["users.id"]);
        assert_eq!(expand_expression("{id}"), vec!["{id}"]);
    }

    #[test]
    fn test_escaped_identifier_reverts_to_literal() {
        assert_eq!(
            replace_identifier_unless_escaped("\\{ text {", "\\", "{", "["),
            "{ text ["
        );
    }

    #[test]
    fn test_double_escape_keeps_one() {
        assert_eq!(
            replace_identifier_unless_escaped("\\\\{", "\\", "{", "["),
            "\\{"
        );
    }
}
