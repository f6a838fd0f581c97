//! Shared helpers for the `name(key = val, ...)` inner-TOML grammar used by
//! both family headers and job calls (spec §4.2).

use crate::domain::errors::{messages, ParseError, ParseResult};

/// Case-folds a bareword `TRUE`/`FALSE` on the right-hand side of an `=`
/// to lowercase so the fragment becomes valid TOML, matching the
/// reference parser's `lower_true_false`.
pub fn lower_true_false(line: &str) -> String {
    let re_true = regex::Regex::new(r"(?i)(= *)TRUE\b").unwrap();
    let re_false = regex::Regex::new(r"(?i)(= *)FALSE\b").unwrap();
    let line = re_true.replace_all(line, "$1true");
    let line = re_false.replace_all(&line, "$1false");
    line.into_owned()
}

/// Wraps `inner` (the contents between the parentheses of `name(...)`, or
/// the whole header line) as `d = { ... }` and parses it as TOML, returning
/// the resulting table. An empty/whitespace-only `inner` yields an empty
/// table without touching the TOML parser.
pub fn parse_inner_table(inner: &str, on_error: &str) -> ParseResult<toml::Table> {
    if inner.trim().is_empty() {
        return Ok(toml::Table::new());
    }
    let normalized = lower_true_false(inner);
    let wrapped = format!("d = {{ {normalized} }}");
    let value: toml::Value =
        toml::from_str(&wrapped).map_err(|_| ParseError::bare(on_error))?;
    match value.get("d").and_then(|v| v.as_table()) {
        Some(table) => Ok(table.clone()),
        None => Ok(toml::Table::new()),
    }
}

pub fn validate_keys(table: &toml::Table, valid_keys: &[&str], detail: &str) -> ParseResult<()> {
    for key in table.keys() {
        if !valid_keys.contains(&key.as_str()) {
            return Err(ParseError::new(
                messages::UNRECOGNIZED_JOB_PARAM,
                format!("{detail}/{key}"),
            ));
        }
    }
    Ok(())
}

pub fn type_name(value: &toml::Value) -> &'static str {
    match value {
        toml::Value::String(_) => "str",
        toml::Value::Integer(_) => "int",
        toml::Value::Float(_) => "float",
        toml::Value::Boolean(_) => "bool",
        toml::Value::Datetime(_) => "datetime",
        toml::Value::Array(_) => "array",
        toml::Value::Table(_) => "table",
    }
}

pub fn get_str(table: &toml::Table, key: &str, detail: &str) -> ParseResult<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ParseError::new(
            messages::INVALID_TYPE,
            format!("{detail}/{key} is type {}", type_name(other)),
        )),
    }
}

pub fn get_bool(table: &toml::Table, key: &str, detail: &str) -> ParseResult<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => Err(ParseError::new(
            messages::INVALID_TYPE,
            format!("{detail}/{key} is type {}", type_name(other)),
        )),
    }
}

pub fn get_int(table: &toml::Table, key: &str, detail: &str) -> ParseResult<Option<i64>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Integer(n)) => Ok(Some(*n)),
        Some(other) => Err(ParseError::new(
            messages::INVALID_TYPE,
            format!("{detail}/{key} is type {}", type_name(other)),
        )),
    }
}

pub fn get_str_list(table: &toml::Table, key: &str, detail: &str) -> ParseResult<Option<Vec<String>>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    toml::Value::String(s) => out.push(s.clone()),
                    other => {
                        return Err(ParseError::new(
                            messages::INVALID_TYPE,
                            format!("{detail}/{key} is type {}", type_name(other)),
                        ))
                    }
                }
            }
            Ok(Some(out))
        }
        Some(other) => Err(ParseError::new(
            messages::INVALID_TYPE,
            format!("{detail}/{key} is type {}", type_name(other)),
        )),
    }
}

/// Parses a `"start"`/`"until"`-style `"HHMM"` field, raising `on_error`
/// (already carrying the caller's detail) if present but malformed.
pub fn get_time(table: &toml::Table, key: &str, on_error: impl Fn() -> ParseError) -> ParseResult<Option<crate::domain::value_objects::TimeOfDay>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => {
            crate::domain::value_objects::TimeOfDay::parse_hhmm(s).map(Some).ok_or_else(on_error)
        }
        Some(_) => Err(on_error()),
    }
}
