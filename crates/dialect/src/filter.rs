//! Where-clause compiler: comparison operator → SQL fragment.

use sqlforge_core::{CompareOperator, DbType};

use crate::dialect::Dialect;

/// Separator between source and parameter name in a bound parameter name.
const SEPARATOR: &str = "_";

/// Deterministic bound parameter name for a `(source, param_name)` pair.
///
/// `("Users", "Name")` → `Users_Name`. Doubled separators produced by names
/// that already end or start with one are collapsed.
pub fn bound_parameter_name(source: &str, param_name: &str) -> String {
    let mut name = format!("{}{}{}", source, SEPARATOR, param_name);
    let doubled = SEPARATOR.repeat(2);
    while name.contains(&doubled) {
        name = name.replace(&doubled, SEPARATOR);
    }
    name
}

/// Lower one comparison to a SQL fragment.
///
/// The wildcard literal spliced by `StartsWith`/`EndsWith`/`Contains` carries
/// the dialect's unicode prefix when `db_type` is a wide string type.
/// [`CompareOperator::Unknown`] lowers to an empty fragment.
pub fn compile_where<D: Dialect + ?Sized>(
    dialect: &D,
    operator: CompareOperator,
    source: &str,
    column_full_name: &str,
    param_name: &str,
    db_type: DbType,
) -> String {
    let literal_prefix = if db_type.is_wide_string() {
        dialect.unicode_prefix()
    } else {
        ""
    };
    let wildcard = format!("{}'%'", literal_prefix);
    let cat = dialect.concat_operator();
    let param = format!(
        "{}{}",
        dialect.parameter_prefix(),
        bound_parameter_name(source, param_name)
    );
    let col = column_full_name;

    match operator {
        CompareOperator::StartsWith => format!("{col} LIKE {param} {cat} {wildcard}"),
        CompareOperator::EndsWith => format!("{col} LIKE {wildcard} {cat} {param}"),
        CompareOperator::Contains => {
            format!("{col} LIKE {wildcard} {cat} {param} {cat} {wildcard}")
        }
        CompareOperator::Equal => format!("{col} = {param}"),
        CompareOperator::NotEqual => format!("{col} != {param}"),
        CompareOperator::IsNull => format!("{col} IS NULL"),
        CompareOperator::IsNotNull => format!("{col} IS NOT NULL"),
        CompareOperator::LessThan => format!("{col} < {param}"),
        CompareOperator::LessThanOrEqual => format!("{col} <= {param}"),
        CompareOperator::MoreThan => format!("{col} > {param}"),
        CompareOperator::MoreThanOrEqual => format!("{col} >= {param}"),
        CompareOperator::In => format!("{col} IN ({param})"),
        CompareOperator::NotIn => format!("{col} NOT IN ({param})"),
        CompareOperator::Unknown => String::new(),
    }
}
