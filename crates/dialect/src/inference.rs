//! Parameter inference.
//!
//! Raw SQL handed to the executor may reference placeholders the caller
//! never bound. Instead of failing the call, every such placeholder gets a
//! default wide-string parameter with a NULL value.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlforge_core::{DbType, Parameter, Value};

/// Pseudo-names declared by insert-with-output templates; never synthesized.
pub const RESERVED_NAMES: [&str; 2] = ["InsertedTable", "MasterId"];

/// Declared type of a synthesized parameter.
pub const DEFAULT_PARAMETER_TYPE: DbType = DbType::NVarChar;

/// Declared size of a synthesized parameter.
pub const DEFAULT_PARAMETER_SIZE: u32 = 4000;

/// `@name` not preceded by another `@` (system variables) or a word
/// character (e-mail addresses and the like).
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^@\w])@([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Single-quoted string literal, with `''` escapes.
static LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'(?:[^']|'')*'").unwrap());

/// Placeholder names referenced by `sql`, deduplicated case-insensitively,
/// in first-occurrence order. Text inside string literals is ignored.
pub fn scan_placeholders(sql: &str) -> Vec<String> {
    let stripped = LITERAL_RE.replace_all(sql, "''");
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(&stripped) {
        let name = &caps[1];
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }
    names
}

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Resolve the final parameter list for `sql`.
///
/// Returns the supplied parameters unchanged and in order, followed by one
/// synthesized `NVarChar(4000)` NULL parameter for every placeholder that is
/// referenced in `sql`, not supplied, and not reserved. Never fails.
pub fn infer_parameters(sql: &str, supplied: Option<&[Parameter]>) -> Vec<Parameter> {
    let supplied = supplied.unwrap_or(&[]);
    let mut resolved = supplied.to_vec();

    for name in scan_placeholders(sql) {
        if is_reserved(&name) || supplied.iter().any(|p| p.is_named(&name)) {
            continue;
        }
        resolved.push(
            Parameter::new(&name, DEFAULT_PARAMETER_TYPE, Value::Null)
                .with_size(DEFAULT_PARAMETER_SIZE),
        );
    }

    resolved
}
