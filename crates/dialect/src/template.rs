//! SQL template compiler.
//!
//! Compilation is selection: `(shape, is_sub_query)` picks one entry from the
//! dialect's template table. Filling the `{Placeholder}` tokens belongs to
//! the query builder that calls us.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlforge_core::QueryShape;

use crate::dialect::Dialect;
use crate::error::{DialectError, DialectResult};

/// Every placeholder token a template may contain.
pub const PLACEHOLDERS: [&str; 23] = [
    "{TargetTable}",
    "{Columns}",
    "{Aggregations}",
    "{SubQueries}",
    "{Lefts}",
    "{Where}",
    "{Order}",
    "{GroupBy}",
    "{Pagination}",
    "{Sets}",
    "{PreQueries}",
    "{PkName}",
    "{PkTypeSize}",
    "{Values}",
    "{StoredProcedureName}",
    "{FunctionName}",
    "{InputParams}",
    "{TranName}",
    "{SqlBody}",
    "{TargetTableAs}",
    "{TargetColumn}",
    "{MainTable}",
    "{MainColumn}",
];

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([A-Za-z]+)\}").unwrap());

/// Select the template for `shape`.
///
/// Shapes without a dedicated sub-query template use their top-level
/// template in both positions.
///
/// # Errors
///
/// [`DialectError::NotImplementedYet`] when the dialect has no entry for
/// `shape`.
pub fn compile_template<D: Dialect + ?Sized>(
    dialect: &D,
    shape: QueryShape,
    is_sub_query: bool,
) -> DialectResult<&'static str> {
    let entry = dialect
        .templates()
        .iter()
        .find(|e| e.shape == shape)
        .ok_or_else(|| DialectError::NotImplementedYet {
            dialect: dialect.name().to_string(),
            shape,
        })?;

    match (is_sub_query, entry.sub_query) {
        (true, Some(sub)) => Ok(sub),
        _ => Ok(entry.top_level),
    }
}

/// Replace `{Name}` tokens with the supplied values.
///
/// `replacements` keys may be given with or without braces. Tokens with no
/// replacement are left untouched.
pub fn fill_template(template: &str, replacements: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            replacements
                .iter()
                .find(|(key, _)| key.trim_start_matches('{').trim_end_matches('}') == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Placeholder tokens appearing in `template`, in order, with repeats.
pub fn placeholders_in(template: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .find_iter(template)
        .map(|m| m.as_str())
        .collect()
}
