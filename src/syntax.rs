//! goboscript lexical helpers: identifier sanitization and literal
//! formatting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::signatures;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s.\-]+").unwrap());
static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z_0-9]").unwrap());

/// Reserved words of the target grammar. A sanitized identifier may not
/// collide with these, nor with any block name from the signature tables.
static KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "costumes", "sounds", "local", "proc", "func", "return", "nowarp", "on", "onflag",
        "onkey", "onclick", "onbackdrop", "onloudness", "ontimer", "onclone", "if", "else",
        "elif", "until", "forever", "repeat", "not", "and", "or", "in", "length", "round", "abs",
        "floor", "ceil", "sqrt", "sin", "cos", "tan", "asin", "acos", "atan", "ln", "log",
        "antiln", "antilog", "show", "hide", "add", "to", "delete", "insert", "at", "of", "as",
        "enum", "struct", "true", "false", "list", "cloud", "var", "breakpoint", "warn", "error",
        "set_layer_order",
    ]
    .into_iter()
    .collect()
});

/// Sanitizes a raw Scratch name into a goboscript identifier. Total and
/// idempotent: runs of whitespace/`.`/`-` collapse to `_`, every other
/// non-word character is stripped, and keyword or block-name collisions
/// get a trailing `_`.
pub fn identifier(raw: &str) -> String {
    let name = SEPARATORS.replace_all(raw, "_");
    let mut name = INVALID_CHARS.replace_all(&name, "").into_owned();
    if name.is_empty() {
        return "_".to_string();
    }
    if KEYWORDS.contains(name.as_str()) || signatures::display_names().contains(name.as_str()) {
        name.push('_');
    }
    name
}

pub fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// True iff `raw` is a number whose canonical serialization is `raw`
/// itself. Zero-padded, signed-zero or exotic forms ("05", "1e3",
/// "Infinity") must be kept as strings or they would change meaning.
pub fn is_numeric_literal(raw: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => value.is_number() && value.to_string() == raw,
        Err(_) => false,
    }
}

/// Renders a raw input payload: canonical numbers stay bare, everything
/// else becomes a string literal.
pub fn value(raw: &str) -> String {
    if is_numeric_literal(raw) {
        raw.to_string()
    } else {
        string(raw)
    }
}
